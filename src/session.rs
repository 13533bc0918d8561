//! Frame clock orchestration
//!
//! The session is what the host's ticker talks to. Each tick it converts
//! wall-clock milliseconds to frame units, releases reels that are due
//! according to the stop schedule, then updates the machine.

use std::rc::Rc;

use crate::animation::Celebration;
use crate::audio::SoundService;
use crate::consts::*;
use crate::settings::Settings;
use crate::slots::{SlotMachine, SpinSequence, TextureAtlas, TextureProvider};
use crate::ui::SpinButton;

pub struct Session {
    machine: SlotMachine,
    sequence: SpinSequence,
    button: SpinButton,
    celebration: Celebration,
    /// Simulated time since the session started (ms)
    clock_ms: f64,
}

impl Session {
    /// Build a machine, button and celebration from `settings`
    pub fn new(settings: &Settings, sound: Rc<dyn SoundService>) -> Self {
        let mut settings = settings.clone();
        settings.validate();

        let textures: Rc<dyn TextureProvider> =
            Rc::new(TextureAtlas::for_alphabet(&settings.machine.symbols));
        let mut machine =
            SlotMachine::from_settings(&settings.machine, settings.seed, textures, sound);

        let button = SpinButton::new();
        let celebration = Celebration::new();
        machine.set_spin_trigger(Box::new(button.clone()));
        machine.set_win_animation(Box::new(celebration.clone()));

        log::info!(
            "Session ready ({} timing: {:.0} ms + {:.0} ms/reel)",
            settings.timing_preset.as_str(),
            settings.timing.base_delay_ms,
            settings.timing.stagger_ms
        );

        Self {
            machine,
            sequence: SpinSequence::new(settings.timing),
            button,
            celebration,
            clock_ms: 0.0,
        }
    }

    pub fn machine(&self) -> &SlotMachine {
        &self.machine
    }

    /// Mutable machine access, e.g. to install a win evaluator
    pub fn machine_mut(&mut self) -> &mut SlotMachine {
        &mut self.machine
    }

    pub fn button(&self) -> &SpinButton {
        &self.button
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Whether a spin is still in flight
    pub fn is_busy(&self) -> bool {
        self.machine.is_spinning()
    }

    /// Player pressed spin. Returns `true` if a spin started.
    pub fn request_spin(&mut self) -> bool {
        if !self.button.is_enabled() {
            log::debug!("Spin button disabled, request ignored");
            return false;
        }
        if !self.machine.spin() {
            return false;
        }
        self.sequence.begin();
        true
    }

    /// Advance by one host frame of `delta_ms` milliseconds
    pub fn tick(&mut self, delta_ms: f32) {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.clock_ms += delta_ms as f64;

        self.sequence.advance(delta_ms, &mut self.machine);
        self.machine.update(delta_ms / FRAME_MS);
    }
}

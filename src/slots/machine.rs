//! Multi-reel machine
//!
//! `Idle → Spinning → Idle`. `spin()` is the only way in; the way out is
//! taken inside `update()` once every reel has settled, which is also when
//! the spin sound stops, the spin button unlocks and the win check runs.

use std::rc::Rc;

use super::reel::{RandomSymbol, Reel};
use super::symbols::{SymbolId, TextureProvider};
use crate::animation::WinAnimation;
use crate::audio::SoundService;
use crate::consts::*;
use crate::settings::MachineSettings;
use crate::ui::SpinTrigger;

/// Settled symbols, one row of visible ids per reel
pub type SymbolGrid = Vec<Vec<SymbolId>>;

/// Decides whether a settled grid is a win
pub trait WinEvaluator {
    fn evaluate(&mut self, grid: &[Vec<SymbolId>]) -> bool;
}

impl<F> WinEvaluator for F
where
    F: FnMut(&[Vec<SymbolId>]) -> bool,
{
    fn evaluate(&mut self, grid: &[Vec<SymbolId>]) -> bool {
        self(grid)
    }
}

/// Placeholder evaluator until real pay rules exist
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWin;

impl WinEvaluator for NoWin {
    fn evaluate(&mut self, _grid: &[Vec<SymbolId>]) -> bool {
        false
    }
}

/// Seed for reel `index`, derived from the machine seed
fn reel_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

pub struct SlotMachine {
    reels: Vec<Reel>,
    is_spinning: bool,
    reel_sound_playing: bool,
    sound: Rc<dyn SoundService>,
    spin_trigger: Option<Box<dyn SpinTrigger>>,
    win_animation: Option<Box<dyn WinAnimation>>,
    win_evaluator: Box<dyn WinEvaluator>,
    spins: u64,
}

impl SlotMachine {
    /// Machine over prebuilt reels
    pub fn new(reels: Vec<Reel>, sound: Rc<dyn SoundService>) -> Self {
        Self {
            reels,
            is_spinning: false,
            reel_sound_playing: false,
            sound,
            spin_trigger: None,
            win_animation: None,
            win_evaluator: Box::new(NoWin),
            spins: 0,
        }
    }

    /// Machine with randomly filled reels laid out per `settings`
    pub fn from_settings(
        settings: &MachineSettings,
        seed: u64,
        textures: Rc<dyn TextureProvider>,
        sound: Rc<dyn SoundService>,
    ) -> Self {
        let reels = (0..settings.reel_count.max(1))
            .map(|i| {
                let strategy = RandomSymbol::new(
                    reel_seed(seed, i),
                    settings.symbols.clone(),
                    textures.clone(),
                );
                Reel::new(settings.symbols_per_reel, settings.symbol_size, Box::new(strategy))
            })
            .collect();
        log::info!(
            "Slot machine ready: {} reels x {} symbols ({} px)",
            settings.reel_count.max(1),
            settings.symbols_per_reel,
            settings.symbol_size
        );
        Self::new(reels, sound)
    }

    pub fn set_spin_trigger(&mut self, trigger: Box<dyn SpinTrigger>) {
        self.spin_trigger = Some(trigger);
    }

    pub fn set_win_animation(&mut self, animation: Box<dyn WinAnimation>) {
        self.win_animation = Some(animation);
    }

    pub fn set_win_evaluator(&mut self, evaluator: Box<dyn WinEvaluator>) {
        self.win_evaluator = evaluator;
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn is_spinning(&self) -> bool {
        self.is_spinning
    }

    pub fn reel_sound_playing(&self) -> bool {
        self.reel_sound_playing
    }

    pub fn win_animation(&self) -> Option<&dyn WinAnimation> {
        self.win_animation.as_deref()
    }

    /// Spins started since construction
    pub fn spin_count(&self) -> u64 {
        self.spins
    }

    /// Start a spin. Returns `false` (and does nothing) if one is in flight.
    pub fn spin(&mut self) -> bool {
        if self.is_spinning {
            log::debug!("Spin ignored, machine already spinning");
            return false;
        }

        self.is_spinning = true;
        self.spins += 1;
        log::info!("Spin #{} started", self.spins);

        if !self.reel_sound_playing {
            self.sound.play(REEL_SPIN_SOUND);
            self.reel_sound_playing = true;
        }
        if let Some(trigger) = self.spin_trigger.as_mut() {
            trigger.set_enabled(false);
        }
        if let Some(animation) = self.win_animation.as_mut() {
            animation.set_visible(false);
        }
        for reel in &mut self.reels {
            reel.start_spin();
        }
        true
    }

    /// Release one reel so it starts decelerating
    pub fn stop_reel(&mut self, index: usize) {
        match self.reels.get_mut(index) {
            Some(reel) => reel.stop_spin(),
            None => log::warn!("No reel {index} to stop ({} reels)", self.reels.len()),
        }
    }

    /// Release every reel at once
    pub fn stop_all(&mut self) {
        for reel in &mut self.reels {
            reel.stop_spin();
        }
    }

    /// Advance every reel, then settle the spin if they have all stopped
    pub fn update(&mut self, delta: f32) {
        for reel in &mut self.reels {
            reel.update(delta);
        }

        if self.is_spinning && self.reels.iter().all(Reel::is_stopped) {
            self.finish_spin();
        }
    }

    fn finish_spin(&mut self) {
        self.is_spinning = false;

        if self.reel_sound_playing {
            self.sound.stop(REEL_SPIN_SOUND);
            self.reel_sound_playing = false;
        }
        if let Some(trigger) = self.spin_trigger.as_mut() {
            trigger.set_enabled(true);
        }

        let grid = self.symbol_grid();
        let won = self.win_evaluator.evaluate(&grid);
        log::info!("Spin #{} settled: {}", self.spins, if won { "win" } else { "no win" });
        self.check_win(won);
    }

    /// Play the win cues if `won`
    pub fn check_win(&mut self, won: bool) {
        if !won {
            return;
        }
        self.sound.play(WIN_SOUND);
        if let Some(animation) = self.win_animation.as_mut() {
            animation.set_visible(true);
            animation.play_animation(WIN_TRACK, WIN_ANIMATION, false);
        }
    }

    /// Visible symbols of every reel, left to right
    pub fn symbol_grid(&self) -> SymbolGrid {
        self.reels.iter().map(Reel::symbol_ids).collect()
    }
}

//! Recording collaborators for machine tests

use std::cell::RefCell;
use std::rc::Rc;

use super::machine::SlotMachine;
use crate::animation::WinAnimation;
use crate::audio::SoundService;
use crate::settings::MachineSettings;
use crate::slots::symbols::{SymbolAlphabet, TextureAtlas, TextureProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCall {
    Play(String),
    Stop(String),
}

/// Sound service that only remembers what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingSound {
    calls: RefCell<Vec<SoundCall>>,
}

impl RecordingSound {
    pub fn calls(&self) -> Vec<SoundCall> {
        self.calls.borrow().clone()
    }

    pub fn plays(&self, alias: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SoundCall::Play(a) if a == alias))
            .count()
    }

    pub fn stops(&self, alias: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SoundCall::Stop(a) if a == alias))
            .count()
    }
}

impl SoundService for RecordingSound {
    fn play(&self, alias: &str) {
        self.calls.borrow_mut().push(SoundCall::Play(alias.to_string()));
    }

    fn stop(&self, alias: &str) {
        self.calls.borrow_mut().push(SoundCall::Stop(alias.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimCall {
    Visible(bool),
    Play(usize, String, bool),
}

/// Win animation that logs every call; clones share the log
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimation {
    calls: Rc<RefCell<Vec<AnimCall>>>,
}

impl RecordingAnimation {
    pub fn calls(&self) -> Vec<AnimCall> {
        self.calls.borrow().clone()
    }

    pub fn plays(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, AnimCall::Play(..)))
            .count()
    }
}

impl WinAnimation for RecordingAnimation {
    fn set_visible(&mut self, visible: bool) {
        self.calls.borrow_mut().push(AnimCall::Visible(visible));
    }

    fn play_animation(&mut self, track: usize, name: &str, looped: bool) {
        self.calls
            .borrow_mut()
            .push(AnimCall::Play(track, name.to_string(), looped));
    }
}

/// Reference-geometry machine (6 x 150 px per reel) with a recording sound
pub fn test_machine(reel_count: usize) -> (SlotMachine, Rc<RecordingSound>) {
    let settings = MachineSettings {
        reel_count,
        ..Default::default()
    };
    let textures: Rc<dyn TextureProvider> =
        Rc::new(TextureAtlas::for_alphabet(&SymbolAlphabet::default()));
    let sound = Rc::new(RecordingSound::default());
    let machine = SlotMachine::from_settings(&settings, 42, textures, sound.clone());
    (machine, sound)
}

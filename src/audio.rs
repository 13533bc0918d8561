//! Named sound cues
//!
//! The machine only ever asks to play or stop a sound by alias. `SoundBank`
//! is the registry behind that: aliases are added once from configuration,
//! and playback state is tracked per alias until the bank is disposed.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::settings::{AudioSettings, SoundAsset};

/// Capability: fire-and-forget playback by alias
///
/// Unknown aliases are logged and ignored, never reported as errors.
pub trait SoundService {
    fn play(&self, alias: &str);
    fn stop(&self, alias: &str);
}

/// A registered sound
#[derive(Debug, Clone)]
struct SoundEntry {
    url: String,
    looping: bool,
    playing: bool,
}

/// Alias → sound registry with explicit lifecycle
#[derive(Debug)]
pub struct SoundBank {
    sounds: RefCell<HashMap<String, SoundEntry>>,
    master_volume: Cell<f32>,
    sfx_volume: Cell<f32>,
    muted: Cell<bool>,
    disposed: Cell<bool>,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::new(&AudioSettings::default())
    }
}

impl SoundBank {
    /// Create a bank and register every configured sound
    pub fn new(config: &AudioSettings) -> Self {
        let bank = Self {
            sounds: RefCell::new(HashMap::new()),
            master_volume: Cell::new(config.master_volume.clamp(0.0, 1.0)),
            sfx_volume: Cell::new(config.sfx_volume.clamp(0.0, 1.0)),
            muted: Cell::new(config.muted),
            disposed: Cell::new(false),
        };
        for SoundAsset { alias, url, looping } in &config.sounds {
            bank.add(alias, url, *looping);
        }
        bank
    }

    /// Register a sound. Duplicate aliases keep the first registration.
    pub fn add(&self, alias: &str, url: &str, looping: bool) {
        if self.disposed.get() {
            log::warn!("Sound bank disposed, ignoring add: {alias}");
            return;
        }
        let mut sounds = self.sounds.borrow_mut();
        if sounds.contains_key(alias) {
            log::warn!("Sound already exists: {alias}");
            return;
        }
        sounds.insert(
            alias.to_string(),
            SoundEntry {
                url: url.to_string(),
                looping,
                playing: false,
            },
        );
        log::info!("Sound added: {alias} from {url}");
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.sounds.borrow().contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.sounds.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.borrow().is_empty()
    }

    /// Whether `alias` is currently playing
    pub fn is_playing(&self, alias: &str) -> bool {
        self.sounds
            .borrow()
            .get(alias)
            .is_some_and(|entry| entry.playing)
    }

    /// Source URL registered for `alias`
    pub fn url(&self, alias: &str) -> Option<String> {
        self.sounds.borrow().get(alias).map(|entry| entry.url.clone())
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&self, vol: f32) {
        self.master_volume.set(vol.clamp(0.0, 1.0));
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&self, vol: f32) {
        self.sfx_volume.set(vol.clamp(0.0, 1.0));
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted.get() {
            0.0
        } else {
            self.master_volume.get() * self.sfx_volume.get()
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Stop everything and drop the registry. Later calls are ignored.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let mut sounds = self.sounds.borrow_mut();
        for (alias, _) in sounds.iter().filter(|(_, entry)| entry.playing) {
            log::info!("Stopped sound: {alias} (dispose)");
        }
        sounds.clear();
        log::info!("Sound bank disposed");
    }
}

impl SoundService for SoundBank {
    fn play(&self, alias: &str) {
        if self.disposed.get() {
            log::warn!("Sound bank disposed, ignoring play: {alias}");
            return;
        }
        let mut sounds = self.sounds.borrow_mut();
        let Some(entry) = sounds.get_mut(alias) else {
            log::warn!("Sound not found: {alias}");
            return;
        };

        // Track state even when silent so stop() stays balanced
        entry.playing = true;
        let vol = self.effective_volume();
        if vol <= 0.0 {
            log::debug!("Playing sound (muted): {alias}");
        } else if entry.looping {
            log::info!("Playing sound: {alias} (loop, volume {vol:.2})");
        } else {
            log::info!("Playing sound: {alias} (volume {vol:.2})");
        }
    }

    fn stop(&self, alias: &str) {
        let mut sounds = self.sounds.borrow_mut();
        match sounds.get_mut(alias) {
            Some(entry) => {
                entry.playing = false;
                log::info!("Stopped sound: {alias}");
            }
            None => log::warn!("Sound not found: {alias}"),
        }
    }
}

//! Machine settings
//!
//! Loaded from a JSON file; every field falls back to the reference
//! configuration so partial files stay valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::slots::{StopSchedule, SymbolAlphabet};

/// Errors from reading or writing a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reel stop timing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimingPreset {
    /// Every reel released together
    Reference,
    /// Left-to-right stops
    #[default]
    Staggered,
    /// Short spins, quick stops
    Turbo,
}

impl TimingPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimingPreset::Reference => "Reference",
            TimingPreset::Staggered => "Staggered",
            TimingPreset::Turbo => "Turbo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reference" | "ref" => Some(TimingPreset::Reference),
            "staggered" => Some(TimingPreset::Staggered),
            "turbo" | "fast" => Some(TimingPreset::Turbo),
            _ => None,
        }
    }

    /// Stop schedule for this preset
    pub fn schedule(&self) -> StopSchedule {
        match self {
            TimingPreset::Reference => StopSchedule::new(2000.0, 0.0),
            TimingPreset::Staggered => StopSchedule::new(1000.0, 250.0),
            TimingPreset::Turbo => StopSchedule::new(400.0, 100.0),
        }
    }
}

/// Reel geometry and symbol set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    pub reel_count: usize,
    /// Symbols visible per reel
    pub symbols_per_reel: usize,
    /// Symbol width and height (pixels)
    pub symbol_size: f32,
    pub symbols: SymbolAlphabet,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            reel_count: REEL_COUNT,
            symbols_per_reel: SYMBOLS_PER_REEL,
            symbol_size: SYMBOL_SIZE,
            symbols: SymbolAlphabet::default(),
        }
    }
}

/// One sound to register at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundAsset {
    pub alias: String,
    pub url: String,
    #[serde(default)]
    pub looping: bool,
}

/// Audio preferences and sound table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    pub sounds: Vec<SoundAsset>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            sounds: vec![
                SoundAsset {
                    alias: REEL_SPIN_SOUND.to_string(),
                    url: format!("assets/sounds/{REEL_SPIN_SOUND}.webm"),
                    looping: true,
                },
                SoundAsset {
                    alias: WIN_SOUND.to_string(),
                    url: format!("assets/sounds/{WIN_SOUND}.webm"),
                    looping: false,
                },
            ],
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub machine: MachineSettings,
    /// Preset the stop schedule came from
    pub timing_preset: TimingPreset,
    /// Reel stop timing (overrides the preset when present in the file)
    pub timing: StopSchedule,
    pub audio: AudioSettings,
    /// Seed for symbol draws
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let timing_preset = TimingPreset::default();
        Self {
            machine: MachineSettings::default(),
            timing_preset,
            timing: timing_preset.schedule(),
            audio: AudioSettings::default(),
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Create settings from a timing preset
    pub fn from_preset(preset: TimingPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a timing preset (replaces the stop schedule)
    pub fn apply_preset(&mut self, preset: TimingPreset) {
        self.timing_preset = preset;
        self.timing = preset.schedule();
    }

    /// Clamp values that would make the machine degenerate
    pub fn validate(&mut self) {
        let machine = &mut self.machine;
        if machine.reel_count == 0 {
            log::warn!("reel_count must be at least 1, using 1");
            machine.reel_count = 1;
        }
        if machine.symbols_per_reel == 0 {
            log::warn!("symbols_per_reel must be at least 1, using 1");
            machine.symbols_per_reel = 1;
        }
        if !(machine.symbol_size.is_finite() && machine.symbol_size > 0.0) {
            log::warn!("Invalid symbol_size {}, using {SYMBOL_SIZE}", machine.symbol_size);
            machine.symbol_size = SYMBOL_SIZE;
        }
        if machine.symbols.is_empty() {
            log::warn!("Empty symbol alphabet, using the default symbols");
            machine.symbols = SymbolAlphabet::default();
        }
        machine.symbols.truncate_to_max();
        self.timing = self.timing.sanitized();
        self.audio.master_volume = self.audio.master_volume.clamp(0.0, 1.0);
        self.audio.sfx_volume = self.audio.sfx_volume.clamp(0.0, 1.0);
    }

    /// Read and validate settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.validate();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

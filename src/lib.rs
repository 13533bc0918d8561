//! Reel Rush - slot machine reel animation
//!
//! Core modules:
//! - `slots`: Reel physics, the multi-reel machine and the stop schedule
//! - `session`: Frame clock orchestration of a machine
//! - `audio`: Named sound cues
//! - `animation`, `ui`: Win celebration and spin button handles
//! - `settings`: Data-driven machine configuration

pub mod animation;
pub mod audio;
pub mod session;
pub mod settings;
pub mod slots;
pub mod ui;

pub use audio::{SoundBank, SoundService};
pub use session::Session;
pub use settings::{Settings, SettingsError};
pub use slots::{Reel, SlotMachine};

/// Reel and machine tuning constants
pub mod consts {
    /// Reel speed right after `start_spin` (pixels per frame)
    pub const SPIN_SPEED: f32 = 50.0;
    /// Per-update speed multiplier once a reel is told to stop
    pub const SLOWDOWN_RATE: f32 = 0.95;
    /// Below this speed a stopping reel halts and snaps to the grid
    pub const SNAP_THRESHOLD: f32 = 0.5;
    /// Below this speed a non-spinning reel reports stopped
    pub const STOPPED_THRESHOLD: f32 = 0.1;

    /// Duration of one frame at the reference 60 fps (ms)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Longest frame the session will simulate in one tick (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Reference machine geometry
    pub const REEL_COUNT: usize = 4;
    pub const SYMBOLS_PER_REEL: usize = 6;
    pub const SYMBOL_SIZE: f32 = 150.0;

    /// Sound aliases
    pub const REEL_SPIN_SOUND: &str = "Reel spin";
    pub const WIN_SOUND: &str = "win";

    /// Win animation track and state name
    pub const WIN_TRACK: usize = 0;
    pub const WIN_ANIMATION: &str = "start";
}

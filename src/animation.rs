//! Win celebration animation handle

use std::cell::RefCell;
use std::rc::Rc;

/// Capability: a skeletal animation that can be shown and driven by name
pub trait WinAnimation {
    fn set_visible(&mut self, visible: bool);
    fn play_animation(&mut self, track: usize, name: &str, looped: bool);
}

/// Animation set on one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub name: String,
    pub looped: bool,
}

#[derive(Debug, Default)]
struct CelebrationState {
    visible: bool,
    tracks: Vec<Option<TrackEntry>>,
    plays: u32,
}

/// Shared handle to the win celebration.
///
/// Clones observe the same state, so the scene can keep one while the
/// machine owns another.
#[derive(Debug, Clone, Default)]
pub struct Celebration {
    state: Rc<RefCell<CelebrationState>>,
}

impl Celebration {
    /// Hidden celebration with nothing playing
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Animation currently set on `track`
    pub fn current(&self, track: usize) -> Option<TrackEntry> {
        self.state.borrow().tracks.get(track).cloned().flatten()
    }

    /// Total `play_animation` calls so far
    pub fn plays(&self) -> u32 {
        self.state.borrow().plays
    }
}

impl WinAnimation for Celebration {
    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    fn play_animation(&mut self, track: usize, name: &str, looped: bool) {
        let mut state = self.state.borrow_mut();
        if state.tracks.len() <= track {
            state.tracks.resize(track + 1, None);
        }
        state.tracks[track] = Some(TrackEntry {
            name: name.to_string(),
            looped,
        });
        state.plays += 1;
        log::debug!("Animation '{name}' on track {track} (loop: {looped})");
    }
}

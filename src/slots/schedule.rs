//! Staggered reel stops
//!
//! Reels don't decide when to stop; whoever runs the spin does. Reel `i` is
//! released `base_delay_ms + i * stagger_ms` after the spin started.

use serde::{Deserialize, Serialize};

use super::machine::SlotMachine;

/// When each reel is told to stop, relative to the start of the spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopSchedule {
    pub base_delay_ms: f32,
    pub stagger_ms: f32,
}

impl Default for StopSchedule {
    fn default() -> Self {
        Self::new(1000.0, 250.0)
    }
}

impl StopSchedule {
    pub fn new(base_delay_ms: f32, stagger_ms: f32) -> Self {
        Self {
            base_delay_ms,
            stagger_ms,
        }
    }

    /// Copy with negative or non-finite delays replaced by zero
    pub fn sanitized(self) -> Self {
        let clean = |ms: f32| if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        Self::new(clean(self.base_delay_ms), clean(self.stagger_ms))
    }

    /// Elapsed time at which reel `index` is released
    pub fn stop_time_ms(&self, index: usize) -> f32 {
        self.base_delay_ms + index as f32 * self.stagger_ms
    }
}

/// Progress of one spin through its stop schedule
#[derive(Debug, Clone)]
pub struct SpinSequence {
    schedule: StopSchedule,
    /// Time since the spin started, `None` when no spin is being sequenced
    elapsed_ms: Option<f32>,
    next_reel: usize,
}

impl SpinSequence {
    pub fn new(schedule: StopSchedule) -> Self {
        Self {
            schedule: schedule.sanitized(),
            elapsed_ms: None,
            next_reel: 0,
        }
    }

    pub fn schedule(&self) -> StopSchedule {
        self.schedule
    }

    /// Start sequencing a fresh spin
    pub fn begin(&mut self) {
        self.elapsed_ms = Some(0.0);
        self.next_reel = 0;
    }

    /// Whether some reels still have to be released
    pub fn is_active(&self) -> bool {
        self.elapsed_ms.is_some()
    }

    pub fn elapsed_ms(&self) -> Option<f32> {
        self.elapsed_ms
    }

    /// Number of reels already released this spin
    pub fn released(&self) -> usize {
        self.next_reel
    }

    /// Advance the clock and release every reel whose stop time has passed
    pub fn advance(&mut self, delta_ms: f32, machine: &mut SlotMachine) {
        let Some(elapsed) = self.elapsed_ms.as_mut() else {
            return;
        };
        if delta_ms.is_finite() && delta_ms > 0.0 {
            *elapsed += delta_ms;
        }
        let elapsed = *elapsed;

        let reel_count = machine.reels().len();
        while self.next_reel < reel_count && self.schedule.stop_time_ms(self.next_reel) <= elapsed {
            log::debug!("Releasing reel {} at {elapsed:.0} ms", self.next_reel);
            machine.stop_reel(self.next_reel);
            self.next_reel += 1;
        }

        if self.next_reel >= reel_count {
            self.elapsed_ms = None;
        }
    }
}

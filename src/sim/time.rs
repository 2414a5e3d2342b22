//! Game time and one-shot deadlines
//!
//! Timers are plain timestamps compared against the clock every frame, so
//! cancelling one is just dropping it (or the component that holds it).

use serde::{Deserialize, Serialize};

/// Milliseconds since the game started
pub type Millis = u64;

/// Frame-advanced game clock
#[derive(Debug, Clone, Default)]
pub struct Clock {
    elapsed_secs: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt` seconds (negative values are ignored)
    pub fn advance(&mut self, dt: f32) {
        self.elapsed_secs += f64::from(dt.max(0.0));
    }

    /// Current game time in milliseconds
    pub fn now(&self) -> Millis {
        (self.elapsed_secs * 1000.0).round() as Millis
    }
}

/// A stored future timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deadline {
    at: Option<Millis>,
}

impl Deadline {
    /// A deadline that is not armed
    pub const fn idle() -> Self {
        Self { at: None }
    }

    /// A deadline `duration` after `start`
    pub fn armed(start: Millis, duration: Millis) -> Self {
        Self {
            at: Some(start.saturating_add(duration)),
        }
    }

    pub fn arm(&mut self, now: Millis, duration: Millis) {
        *self = Self::armed(now, duration);
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    pub fn at(&self) -> Option<Millis> {
        self.at
    }

    /// Armed and `now` has reached the deadline
    pub fn is_due(&self, now: Millis) -> bool {
        self.at.is_some_and(|at| now >= at)
    }

    /// Armed and `now` is strictly past the deadline
    pub fn has_lapsed(&self, now: Millis) -> bool {
        self.at.is_some_and(|at| now > at)
    }
}

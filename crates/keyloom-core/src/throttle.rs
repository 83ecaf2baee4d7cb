//! Bounded-attempts-per-window rate gate.
//!
//! Gates phone-number submission before any gateway call is made. The gate is
//! a plain value owned by the current flow state; callers pass "now"
//! explicitly so the gate never reads a global clock.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempt gate permitting at most `max_attempts` within a rolling `window`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throttle {
    max_attempts: u32,
    window: Duration,
    window_start: Option<Timestamp>,
    attempts: u32,
}

impl Throttle {
    /// Create a fresh gate with no recorded attempts.
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            window_start: None,
            attempts: 0,
        }
    }

    /// Record an attempt at `now`. Returns `false` once the attempt count
    /// within the current window exceeds `max_attempts`. A window older than
    /// `window` is discarded and a new one started.
    pub fn process(&mut self, now: Timestamp) -> bool {
        match self.window_start {
            Some(start) if now.saturating_since(start) <= self.window => {
                self.attempts = self.attempts.saturating_add(1);
                self.attempts <= self.max_attempts
            }
            _ => {
                self.window_start = Some(now);
                self.attempts = 1;
                true
            }
        }
    }

    /// Clear the window so the next `process` call succeeds immediately.
    pub fn reset(&mut self) {
        self.window_start = None;
        self.attempts = 0;
    }

    /// Attempts recorded in the current window.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

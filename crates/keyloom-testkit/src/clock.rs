//! Manually advanced test clock.

use async_trait::async_trait;
use keyloom_core::effects::ClockEffects;
use keyloom_core::Timestamp;
use parking_lot::Mutex;
use std::time::Duration;

/// A clock that only moves when the test says so.
///
/// Starts at a fixed instant so throttle windows and lockout deadlines are
/// reproducible across runs.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    /// A clock frozen at `start`.
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// The clock's current reading.
    pub fn timestamp(&self) -> Timestamp {
        *self.now.lock()
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now = *now + delta;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2022-01-01T00:00:00Z
        Self::starting_at(Timestamp::from_millis(1_640_995_200_000))
    }
}

#[async_trait]
impl ClockEffects for FixedClock {
    async fn now(&self) -> Timestamp {
        self.timestamp()
    }
}

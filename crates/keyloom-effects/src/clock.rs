//! System wall-clock handler.

use async_trait::async_trait;
use keyloom_core::effects::ClockEffects;
use keyloom_core::Timestamp;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Production clock delegating to system time.
///
/// Stateless; the only place outside tests where wall-clock time enters the
/// engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClockEffects for SystemClock {
    async fn now(&self) -> Timestamp {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Timestamp::from_millis(since_epoch.as_millis() as u64)
    }
}

//! Wall-clock capability.

use crate::time::Timestamp;
use async_trait::async_trait;

/// Capability: read the current wall-clock time.
///
/// Transitions take "now" from here rather than from a global clock so that
/// throttle windows and lockout deadlines are testable with a fixed clock.
#[async_trait]
pub trait ClockEffects: Send + Sync {
    /// Current wall-clock time.
    async fn now(&self) -> Timestamp;
}

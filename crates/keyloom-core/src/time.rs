//! Epoch-millisecond timestamps.
//!
//! Flows never read a global clock; "now" always enters a transition through
//! the provider's [`crate::effects::ClockEffects`] capability, so transitions
//! stay pure and lockout timing is testable with a fixed clock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// A wall-clock instant as milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Construct from milliseconds since the Unix epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Construct from whole seconds since the Unix epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1_000)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Elapsed time since `earlier`, saturating to zero if `earlier` is in
    /// the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_duration_advances_millis() {
        let t = Timestamp::from_secs(10);
        assert_eq!((t + Duration::from_secs(5)).as_millis(), 15_000);
    }

    #[test]
    fn saturating_since_clamps_to_zero() {
        let earlier = Timestamp::from_millis(1_000);
        let later = Timestamp::from_millis(4_500);
        assert_eq!(later.saturating_since(earlier), Duration::from_millis(3_500));
        assert_eq!(earlier.saturating_since(later), Duration::ZERO);
    }

    #[test]
    fn ordering_follows_epoch() {
        assert!(Timestamp::from_millis(1) < Timestamp::from_millis(2));
    }
}

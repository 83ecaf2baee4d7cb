//! Deterministic test doubles for the Keyloom onboarding flows.
//!
//! Every handler here returns fixed, predictable values so flow tests can
//! assert on exact state contents. Failure injection is per-handler: tests
//! arm the next error through `fail_*_with` and the mock returns it on every
//! subsequent call until rearmed.
//!
//! Mocks use blocking `parking_lot` locks rather than async ones: handlers
//! do no real I/O, the critical sections are a few loads and stores, and the
//! synchronous API keeps test setup free of `.await` noise.

#![forbid(unsafe_code)]

mod clock;
mod mocks;
mod provider;

pub use clock::FixedClock;
pub use mocks::{
    MemoryBackupStore, MockThresholdFacade, RecordingGateway, StaticAuthService, StaticMnemonic,
    StaticSigner,
};
pub use provider::TestProvider;

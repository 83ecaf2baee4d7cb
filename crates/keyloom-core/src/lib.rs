//! # Keyloom Core - Layer 1: Domain Types and Flow Engine
//!
//! Foundation crate for the Keyloom wallet-onboarding state machines.
//!
//! ## Purpose
//!
//! Layer 1 crate providing:
//! - The generic transition interpreter ([`machine::StateMachine`],
//!   [`machine::FlowInterpreter`])
//! - The flow error taxonomy ([`errors::FlowError`])
//! - Effect (provider capability) trait definitions ([`effects`])
//! - Value types shared by every flow: [`time::Timestamp`],
//!   [`throttle::Throttle`], zeroizing secrets ([`secret`])
//! - The progress/resume contract ([`progress::FlowProgress`])
//!
//! ## What Belongs Here
//!
//! - Pure types and trait definitions with no I/O
//! - The interpreter, which performs I/O only through the provider handed
//!   to each transition
//!
//! ## What Does NOT Belong Here
//!
//! - Effect handler implementations (belong in keyloom-effects)
//! - Concrete flow state graphs (belong in keyloom-onboarding)
//! - Mock handlers (belong in keyloom-testkit)

#![forbid(unsafe_code)]

/// Flow error taxonomy
pub mod errors;

/// Provider capability trait definitions
pub mod effects;

/// Generic state machine trait and flow interpreter
pub mod machine;

/// Progress/resume contract for flow states
pub mod progress;

/// Zeroizing secret value types
pub mod secret;

/// Bounded-attempts-per-window rate gate
pub mod throttle;

/// Epoch-millisecond timestamps
pub mod time;

pub use errors::{FlowError, FlowResult};
pub use machine::{FlowInterpreter, StateMachine};
pub use progress::{composite_step, FlowProgress, PHASE_STRIDE};
pub use secret::{KeyShare, SeedPhrase};
pub use throttle::Throttle;
pub use time::Timestamp;

//! # Keyloom Onboarding - Layer 5: Wallet Creation and Restore Flows
//!
//! Concrete state machines for provisioning and recovering a self-custodial
//! wallet's master key material.
//!
//! ## Flows
//!
//! Leaf flows, each an exhaustive state enum with its own event enum and
//! terminal result:
//! - [`signin`]: social sign-in plus threshold-key provisioning
//! - [`phone`]: phone-number binding with OTP, throttling, and cooldowns
//! - [`security`]: local PIN/biometry setup
//!
//! Composites wrap exactly one active leaf plus accumulated context and
//! promote terminal leaf results into their own transitions:
//! - [`create`]: sign-in -> phone binding -> security setup
//! - [`restore`]: backup store / seed phrase / custom (phone) / social entry
//!   points converging on reconstructed key material
//!
//! Leaves never know about composites; a composite forwards the wrapped
//! event type to the active leaf's `accept` and rejects events for any other
//! phase with `InvalidEvent`.
//!
//! All flows run on [`keyloom_core::FlowInterpreter`] with the capability
//! bundle in [`provider::OnboardingProvider`].

#![forbid(unsafe_code)]

/// Create-wallet composite flow
pub mod create;

/// Cross-step flow data and wallet value types
pub mod flow_data;

/// Phone-binding leaf flow
pub mod phone;

/// Provider capability bundle
pub mod provider;

/// Restore-wallet composite flow
pub mod restore;

/// Security-setup leaf flow
pub mod security;

/// Social sign-in leaf flow
pub mod signin;

pub use create::{CreateWalletEvent, CreateWalletResult, CreateWalletState};
pub use flow_data::{
    PhoneFlowData, ProvisionedWallet, RestoredWallet, SignedUpWallet, WalletMetadata,
};
pub use phone::{BlockReason, PhoneBindingEvent, PhoneBindingResult, PhoneBindingState};
pub use provider::OnboardingProvider;
pub use restore::{RestoreWalletEvent, RestoreWalletResult, RestoreWalletState};
pub use security::{SecuritySetupEvent, SecuritySetupResult, SecuritySetupState};
pub use signin::{SocialSignInEvent, SocialSignInResult, SocialSignInState};

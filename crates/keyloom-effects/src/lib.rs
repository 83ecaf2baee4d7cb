//! # Keyloom Effects - Layer 3: Production Effect Handlers
//!
//! Stateless production implementations of the capability traits defined in
//! `keyloom-core`. This crate holds handlers that need only local resources
//! (system clock, entropy, key derivation); the auth service, threshold
//! facade, gateway, and backup store are integrations owned by the embedding
//! application.
//!
//! **Layer Constraint**: NO mock handlers - those belong in keyloom-testkit.

#![forbid(unsafe_code)]

/// System wall-clock handler
pub mod clock;

/// BIP-39 mnemonic generation and validation
pub mod mnemonic;

/// Seed-derived ed25519 payload signer
pub mod signer;

pub use clock::SystemClock;
pub use mnemonic::Bip39MnemonicSource;
pub use signer::SeedPayloadSigner;

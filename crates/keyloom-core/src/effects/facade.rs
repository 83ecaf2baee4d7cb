//! Threshold-signature facade capability.
//!
//! The facade hides the distributed key reconstruction protocol. The engine
//! only needs its coded error surface: one code marks an identity that
//! already has a wallet behind it, one marks an identity with none.

use crate::secret::{KeyShare, SeedPhrase};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Facade error code: this identity already has provisioned key material.
pub const ACCOUNT_ALREADY_USED: i64 = 1009;

/// Facade error code: no key material exists behind this identity.
pub const IDENTITY_NOT_PROVISIONED: i64 = 1012;

/// Intermediate key derived by the facade from an identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorusKey {
    /// Opaque encoded key material.
    pub value: String,
}

/// Key material produced by provisioning a fresh wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpOutcome {
    /// Reconstructed Ethereum public key.
    pub eth_public_key: String,
    /// Share to be kept on this device.
    pub device_share: KeyShare,
    /// Share to be escrowed behind the phone number.
    pub custom_share: KeyShare,
    /// Opaque facade metadata blob for later restores.
    pub metadata: String,
}

/// Key material reconstructed for an existing wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInOutcome {
    /// Recovered mnemonic.
    pub seed_phrase: SeedPhrase,
    /// Reconstructed Ethereum public key.
    pub eth_public_key: String,
}

/// Coded error returned by the threshold facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("facade error {code}: {message}")]
pub struct FacadeError {
    /// Facade-defined error code.
    pub code: i64,
    /// Human-readable description.
    pub message: String,
}

impl FacadeError {
    /// Construct a coded facade error.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Capability: threshold key reconstruction behind a social identity.
#[async_trait]
pub trait ThresholdFacadeEffects: Send + Sync {
    /// Prepare the facade for use. Must be called before any key operation.
    async fn initialize(&self) -> Result<(), FacadeError>;

    /// Exchange an identity token for the intermediate key.
    async fn obtain_torus_key(&self, token_id: &str) -> Result<TorusKey, FacadeError>;

    /// Provision fresh key material for a new identity, splitting
    /// `private_input` into shares. Fails with [`ACCOUNT_ALREADY_USED`] if
    /// the identity already owns a wallet.
    async fn sign_up(
        &self,
        torus_key: &TorusKey,
        private_input: &SeedPhrase,
    ) -> Result<SignUpOutcome, FacadeError>;

    /// Reconstruct existing key material from the identity key plus the
    /// locally held device share. Fails with [`IDENTITY_NOT_PROVISIONED`]
    /// if the identity never provisioned a wallet.
    async fn sign_in(
        &self,
        torus_key: &TorusKey,
        device_share: &KeyShare,
    ) -> Result<SignInOutcome, FacadeError>;

    /// Reconstruct existing key material from the device share plus the
    /// custom share recovered through phone verification.
    async fn recover(
        &self,
        device_share: &KeyShare,
        custom_share: &KeyShare,
    ) -> Result<SignInOutcome, FacadeError>;

    /// Derive the wallet public key directly from a full mnemonic.
    async fn derive_wallet(&self, seed_phrase: &SeedPhrase) -> Result<String, FacadeError>;
}

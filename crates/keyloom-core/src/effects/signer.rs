//! Gateway-payload signing capability.
//!
//! The gateway authenticates wallet-binding requests with a signature by a
//! key re-derived from the seed phrase. Key derivation and signing stay
//! behind this trait so the flows never touch raw key bytes.

use crate::secret::SeedPhrase;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from payload signing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("payload signing failed: {message}")]
pub struct SignerError {
    /// Failure description.
    pub message: String,
}

impl SignerError {
    /// Construct a signer error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Capability: sign a gateway payload with the key derived from a seed.
#[async_trait]
pub trait PayloadSignerEffects: Send + Sync {
    /// Re-derive the signing key from `seed_phrase` and sign `payload`.
    async fn sign(&self, seed_phrase: &SeedPhrase, payload: &[u8]) -> Result<Vec<u8>, SignerError>;
}

//! Mnemonic generation and validation capability.

use crate::secret::SeedPhrase;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from mnemonic handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum MnemonicError {
    /// The entered text is not a valid BIP-39 phrase.
    #[error("invalid mnemonic phrase: {message}")]
    InvalidPhrase {
        /// Validation failure description.
        message: String,
    },
    /// Entropy generation failed.
    #[error("mnemonic generation failed: {message}")]
    Generation {
        /// Generation failure description.
        message: String,
    },
}

/// Capability: generate and validate BIP-39 mnemonics.
#[async_trait]
pub trait MnemonicEffects: Send + Sync {
    /// Generate a fresh mnemonic from secure entropy.
    async fn generate_phrase(&self) -> Result<SeedPhrase, MnemonicError>;

    /// Validate user-entered words, normalizing them into a [`SeedPhrase`].
    async fn validate_phrase(&self, phrase: &str) -> Result<SeedPhrase, MnemonicError>;
}

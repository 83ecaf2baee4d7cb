//! BIP-39 mnemonic generation and validation.

use async_trait::async_trait;
use bip39::{Language, Mnemonic};
use keyloom_core::effects::{MnemonicEffects, MnemonicError};
use keyloom_core::SeedPhrase;

/// Production mnemonic source backed by the BIP-39 English wordlist.
#[derive(Debug, Clone, Copy)]
pub struct Bip39MnemonicSource {
    word_count: usize,
}

impl Bip39MnemonicSource {
    /// Source generating 24-word phrases (256 bits of entropy).
    pub fn new() -> Self {
        Self { word_count: 24 }
    }

    /// Source generating phrases of `word_count` words (12, 15, 18, 21, 24).
    pub fn with_word_count(word_count: usize) -> Self {
        Self { word_count }
    }
}

impl Default for Bip39MnemonicSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MnemonicEffects for Bip39MnemonicSource {
    async fn generate_phrase(&self) -> Result<SeedPhrase, MnemonicError> {
        let mnemonic = Mnemonic::generate_in(Language::English, self.word_count).map_err(|e| {
            MnemonicError::Generation {
                message: e.to_string(),
            }
        })?;
        Ok(SeedPhrase::new(mnemonic.to_string()))
    }

    async fn validate_phrase(&self, phrase: &str) -> Result<SeedPhrase, MnemonicError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase).map_err(|e| {
            MnemonicError::InvalidPhrase {
                message: e.to_string(),
            }
        })?;
        Ok(SeedPhrase::new(mnemonic.to_string()))
    }
}

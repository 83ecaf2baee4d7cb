//! Seed-derived ed25519 payload signer.
//!
//! Re-derives a signing key from the mnemonic every call and signs the
//! gateway payload. The derived key lives only for the duration of the call
//! and is zeroized with its intermediates.

use async_trait::async_trait;
use bip39::{Language, Mnemonic};
use ed25519_dalek::{Signer, SigningKey};
use hkdf::Hkdf;
use keyloom_core::effects::{PayloadSignerEffects, SignerError};
use keyloom_core::SeedPhrase;
use sha2::Sha256;
use zeroize::Zeroize;

/// Domain-separation info for the gateway signing key derivation.
const GATEWAY_KEY_INFO: &[u8] = b"keyloom/gateway-signing-key/v1";

/// Production payload signer: BIP-39 seed -> HKDF-SHA256 -> ed25519.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedPayloadSigner;

impl SeedPayloadSigner {
    /// Create a new payload signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadSignerEffects for SeedPayloadSigner {
    async fn sign(&self, seed_phrase: &SeedPhrase, payload: &[u8]) -> Result<Vec<u8>, SignerError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, seed_phrase.expose())
            .map_err(|e| SignerError::new(format!("invalid seed phrase: {e}")))?;

        let mut seed = mnemonic.to_seed("");
        let hkdf = Hkdf::<Sha256>::new(None, &seed);
        let mut key_bytes = [0u8; 32];
        hkdf.expand(GATEWAY_KEY_INFO, &mut key_bytes)
            .map_err(|e| SignerError::new(format!("key derivation failed: {e}")))?;
        seed.zeroize();

        let signing_key = SigningKey::from_bytes(&key_bytes);
        key_bytes.zeroize();

        Ok(signing_key.sign(payload).to_bytes().to_vec())
    }
}

//! Cross-step flow data and wallet value types.
//!
//! These are plain values owned by the current state; transitions move them
//! forward (or clone-and-replace), never mutate them in place for other
//! readers.

use keyloom_core::effects::{PhoneNumber, SocialProvider};
use keyloom_core::{KeyShare, SeedPhrase, Throttle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempts permitted per phone-number sending window.
pub const PHONE_SEND_MAX_ATTEMPTS: u32 = 5;

/// Rolling window for phone-number sending attempts.
pub const PHONE_SEND_WINDOW: Duration = Duration::from_secs(600);

/// Wallet metadata assembled at the end of phone binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletMetadata {
    /// Device display name.
    pub device_name: String,
    /// Email behind the social identity.
    pub email: String,
    /// Which social provider provisioned the wallet.
    pub auth_provider: SocialProvider,
    /// Verified phone number.
    pub phone_number: PhoneNumber,
}

/// Payload accumulated before phone binding and threaded through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneFlowData {
    /// Mnemonic generated at sign-up; signs gateway payloads.
    pub seed_phrase: SeedPhrase,
    /// Reconstructed Ethereum public key.
    pub eth_public_key: String,
    /// Share to be escrowed behind the phone number.
    pub custom_share: KeyShare,
    /// Email behind the social identity.
    pub email: String,
    /// Device display name.
    pub device_name: String,
    /// Which social provider provisioned the wallet.
    pub auth_provider: SocialProvider,
    /// Gate on phone-number submission.
    pub sending_throttle: Throttle,
}

impl PhoneFlowData {
    /// Seed the payload from a completed sign-in, with a fresh throttle.
    pub fn new(
        seed_phrase: SeedPhrase,
        eth_public_key: String,
        custom_share: KeyShare,
        email: String,
        device_name: String,
        auth_provider: SocialProvider,
    ) -> Self {
        Self {
            seed_phrase,
            eth_public_key,
            custom_share,
            email,
            device_name,
            auth_provider,
            sending_throttle: Throttle::new(PHONE_SEND_MAX_ATTEMPTS, PHONE_SEND_WINDOW),
        }
    }
}

/// Key material and identity produced by a successful sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUpWallet {
    /// Email behind the social identity.
    pub email: String,
    /// Which social provider provisioned the wallet.
    pub auth_provider: SocialProvider,
    /// Mnemonic used as the sign-up private input.
    pub seed_phrase: SeedPhrase,
    /// Reconstructed Ethereum public key.
    pub eth_public_key: String,
    /// Share kept on this device.
    pub device_share: KeyShare,
    /// Share to be escrowed behind the phone number.
    pub custom_share: KeyShare,
    /// Facade metadata blob for later restores.
    pub facade_metadata: String,
}

/// Fully provisioned wallet, ready for security setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedWallet {
    /// The wallet's mnemonic.
    pub seed_phrase: SeedPhrase,
    /// Reconstructed Ethereum public key.
    pub eth_public_key: String,
    /// Share kept on this device.
    pub device_share: KeyShare,
    /// Share escrowed behind the phone number.
    pub custom_share: KeyShare,
    /// Facade metadata blob for later restores.
    pub facade_metadata: String,
    /// Metadata assembled during phone binding.
    pub metadata: WalletMetadata,
}

/// Wallet material reconstructed by a restore path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoredWallet {
    /// The recovered mnemonic.
    pub seed_phrase: SeedPhrase,
    /// Reconstructed Ethereum public key.
    pub eth_public_key: String,
    /// Device share, when the path produced one.
    pub device_share: Option<KeyShare>,
    /// Email behind the identity, when the path knows it.
    pub email: Option<String>,
}

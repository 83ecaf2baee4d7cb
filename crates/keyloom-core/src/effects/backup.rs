//! Device/cloud backup-store capability.
//!
//! The secure storage itself (device keychain, iCloud keychain) is an
//! external collaborator; this trait is the narrow read surface the restore
//! flow consumes.

use crate::secret::{KeyShare, SeedPhrase};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One wallet found in the backup store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletBackup {
    /// The backed-up mnemonic.
    pub seed_phrase: SeedPhrase,
    /// Ethereum public key of the backed-up wallet.
    pub eth_public_key: String,
    /// Display name, if the user set one.
    pub name: Option<String>,
}

/// Errors from the backup store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum BackupError {
    /// The store holds no backups for this account.
    #[error("no wallet backups found")]
    NotFound,
    /// The store could not be read.
    #[error("backup store unavailable: {message}")]
    Unavailable {
        /// Failure description.
        message: String,
    },
}

/// Capability: read wallet backups and the locally stored device share.
#[async_trait]
pub trait BackupStoreEffects: Send + Sync {
    /// List wallets backed up to the cloud keychain.
    async fn restore(&self) -> Result<Vec<WalletBackup>, BackupError>;

    /// The threshold device share kept in local secure storage.
    async fn local_device_share(&self) -> Result<KeyShare, BackupError>;
}

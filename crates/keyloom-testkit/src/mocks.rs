//! Mock effect handlers with fixed return values and failure injection.

use async_trait::async_trait;
use bip39::{Language, Mnemonic};
use keyloom_core::effects::{
    AuthCredential, AuthError, AuthServiceEffects, BackupError, BackupStoreEffects,
    ConfirmRegisterWalletRequest, ConfirmRestoreWalletRequest, FacadeError, GatewayEffects,
    GatewayError, MnemonicEffects, MnemonicError, PayloadSignerEffects, RegisterWalletRequest,
    RestoreWalletRequest, RestoredWalletPayload, SignInOutcome, SignUpOutcome, SignerError,
    SocialProvider, ThresholdFacadeEffects, TorusKey, WalletBackup,
};
use keyloom_core::{KeyShare, SeedPhrase};
use parking_lot::Mutex;

/// Valid 12-word mnemonic used by every mock that hands out a seed phrase.
pub(crate) const TEST_PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn test_seed() -> SeedPhrase {
    SeedPhrase::new(TEST_PHRASE)
}

/// Auth service that issues the same credential for every provider.
#[derive(Debug, Default)]
pub struct StaticAuthService;

#[async_trait]
impl AuthServiceEffects for StaticAuthService {
    async fn auth(&self, _provider: SocialProvider) -> Result<AuthCredential, AuthError> {
        Ok(AuthCredential {
            token_id: "t1".to_string(),
            email: "a@b.com".to_string(),
        })
    }
}

/// Threshold facade returning canned key material.
///
/// `sign_up` and `sign_in` failures are armed independently; an armed
/// `sign_in` failure also applies to `recover`, since both reconstruct.
#[derive(Debug, Default)]
pub struct MockThresholdFacade {
    sign_up_failure: Mutex<Option<FacadeError>>,
    sign_in_failure: Mutex<Option<FacadeError>>,
}

impl MockThresholdFacade {
    /// Make every subsequent `sign_up` call fail with `err`.
    pub fn fail_sign_up_with(&self, err: FacadeError) {
        *self.sign_up_failure.lock() = Some(err);
    }

    /// Make every subsequent `sign_in` (and `recover`) call fail with `err`.
    pub fn fail_sign_in_with(&self, err: FacadeError) {
        *self.sign_in_failure.lock() = Some(err);
    }
}

#[async_trait]
impl ThresholdFacadeEffects for MockThresholdFacade {
    async fn initialize(&self) -> Result<(), FacadeError> {
        Ok(())
    }

    async fn obtain_torus_key(&self, token_id: &str) -> Result<TorusKey, FacadeError> {
        Ok(TorusKey {
            value: format!("torus:{token_id}"),
        })
    }

    async fn sign_up(
        &self,
        _torus_key: &TorusKey,
        _private_input: &SeedPhrase,
    ) -> Result<SignUpOutcome, FacadeError> {
        if let Some(err) = self.sign_up_failure.lock().clone() {
            return Err(err);
        }
        Ok(SignUpOutcome {
            eth_public_key: "0xdead".to_string(),
            device_share: KeyShare::new("d1"),
            custom_share: KeyShare::new("c1"),
            metadata: "{}".to_string(),
        })
    }

    async fn sign_in(
        &self,
        _torus_key: &TorusKey,
        _device_share: &KeyShare,
    ) -> Result<SignInOutcome, FacadeError> {
        if let Some(err) = self.sign_in_failure.lock().clone() {
            return Err(err);
        }
        Ok(SignInOutcome {
            seed_phrase: test_seed(),
            eth_public_key: "0xdead".to_string(),
        })
    }

    async fn recover(
        &self,
        _device_share: &KeyShare,
        _custom_share: &KeyShare,
    ) -> Result<SignInOutcome, FacadeError> {
        if let Some(err) = self.sign_in_failure.lock().clone() {
            return Err(err);
        }
        Ok(SignInOutcome {
            seed_phrase: test_seed(),
            eth_public_key: "0xdead".to_string(),
        })
    }

    async fn derive_wallet(&self, _seed_phrase: &SeedPhrase) -> Result<String, FacadeError> {
        Ok("0xdead".to_string())
    }
}

/// Gateway that counts calls per endpoint and succeeds by default.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    register_calls: Mutex<usize>,
    confirm_calls: Mutex<usize>,
    restore_calls: Mutex<usize>,
    register_failure: Mutex<Option<GatewayError>>,
    confirm_failure: Mutex<Option<GatewayError>>,
    restore_failure: Mutex<Option<GatewayError>>,
    confirm_restore_failure: Mutex<Option<GatewayError>>,
}

impl RecordingGateway {
    /// How many times `register_wallet` was called.
    pub fn register_calls(&self) -> usize {
        *self.register_calls.lock()
    }

    /// How many times `confirm_register_wallet` was called.
    pub fn confirm_calls(&self) -> usize {
        *self.confirm_calls.lock()
    }

    /// How many times `restore_wallet` was called.
    pub fn restore_calls(&self) -> usize {
        *self.restore_calls.lock()
    }

    /// Make every subsequent `register_wallet` call fail with `err`.
    pub fn fail_register_with(&self, err: GatewayError) {
        *self.register_failure.lock() = Some(err);
    }

    /// Make every subsequent `confirm_register_wallet` call fail with `err`.
    pub fn fail_confirm_with(&self, err: GatewayError) {
        *self.confirm_failure.lock() = Some(err);
    }

    /// Make every subsequent `restore_wallet` call fail with `err`.
    pub fn fail_restore_with(&self, err: GatewayError) {
        *self.restore_failure.lock() = Some(err);
    }

    /// Make every subsequent `confirm_restore_wallet` call fail with `err`.
    pub fn fail_confirm_restore_with(&self, err: GatewayError) {
        *self.confirm_restore_failure.lock() = Some(err);
    }
}

#[async_trait]
impl GatewayEffects for RecordingGateway {
    async fn register_wallet(&self, _request: RegisterWalletRequest) -> Result<(), GatewayError> {
        *self.register_calls.lock() += 1;
        match self.register_failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn confirm_register_wallet(
        &self,
        _request: ConfirmRegisterWalletRequest,
    ) -> Result<(), GatewayError> {
        *self.confirm_calls.lock() += 1;
        match self.confirm_failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn restore_wallet(&self, _request: RestoreWalletRequest) -> Result<(), GatewayError> {
        *self.restore_calls.lock() += 1;
        match self.restore_failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn confirm_restore_wallet(
        &self,
        _request: ConfirmRestoreWalletRequest,
    ) -> Result<RestoredWalletPayload, GatewayError> {
        if let Some(err) = self.confirm_restore_failure.lock().clone() {
            return Err(err);
        }
        Ok(RestoredWalletPayload {
            custom_share: KeyShare::new("c1"),
            metadata: "{}".to_string(),
        })
    }
}

/// Mnemonic source that always generates the same valid phrase.
///
/// Validation is real BIP-39 parsing, so tests exercise the invalid-phrase
/// path with genuinely invalid input.
#[derive(Debug, Default)]
pub struct StaticMnemonic;

#[async_trait]
impl MnemonicEffects for StaticMnemonic {
    async fn generate_phrase(&self) -> Result<SeedPhrase, MnemonicError> {
        Ok(test_seed())
    }

    async fn validate_phrase(&self, phrase: &str) -> Result<SeedPhrase, MnemonicError> {
        let parsed = Mnemonic::parse_in_normalized(Language::English, phrase).map_err(|err| {
            MnemonicError::InvalidPhrase {
                message: err.to_string(),
            }
        })?;
        Ok(SeedPhrase::new(parsed.to_string()))
    }
}

/// Signer producing a fixed-length placeholder signature.
#[derive(Debug, Default)]
pub struct StaticSigner;

#[async_trait]
impl PayloadSignerEffects for StaticSigner {
    async fn sign(
        &self,
        _seed_phrase: &SeedPhrase,
        _payload: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        Ok(vec![7u8; 64])
    }
}

/// In-memory backup store seeded with one wallet.
#[derive(Debug)]
pub struct MemoryBackupStore {
    backups: Mutex<Vec<WalletBackup>>,
}

impl MemoryBackupStore {
    /// Empty the store so `restore` reports nothing found.
    pub fn clear_backups(&self) {
        self.backups.lock().clear();
    }
}

impl Default for MemoryBackupStore {
    fn default() -> Self {
        Self {
            backups: Mutex::new(vec![WalletBackup {
                seed_phrase: test_seed(),
                eth_public_key: "0xdead".to_string(),
                name: Some("Main wallet".to_string()),
            }]),
        }
    }
}

#[async_trait]
impl BackupStoreEffects for MemoryBackupStore {
    async fn restore(&self) -> Result<Vec<WalletBackup>, BackupError> {
        Ok(self.backups.lock().clone())
    }

    async fn local_device_share(&self) -> Result<KeyShare, BackupError> {
        Ok(KeyShare::new("d1"))
    }
}

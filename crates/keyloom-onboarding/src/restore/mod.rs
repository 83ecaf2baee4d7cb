//! Restore-wallet composite flow.
//!
//! A parallel composite: from the entry selection the user may restore from
//! the backup store, from an entered seed phrase, through phone verification
//! of the escrowed custom share, or through social sign-in. Every path
//! converges on reconstructed key material, then security setup, then the
//! terminal result. Abandoning one entry point returns to the selection
//! state rather than ending the flow.

use crate::flow_data::RestoredWallet;
use crate::provider::OnboardingProvider;
use crate::security::{SecuritySetupEvent, SecuritySetupResult, SecuritySetupState};
use async_trait::async_trait;
use keyloom_core::effects::WalletBackup;
use keyloom_core::{
    composite_step, FlowError, FlowProgress, FlowResult, StateMachine, PHASE_STRIDE,
};
use serde::{Deserialize, Serialize};

/// Custom (phone-based) restore leaf
pub mod custom;

/// Seed-phrase restore leaf
pub mod seed;

/// Social restore leaf
pub mod social;

pub use custom::{RestoreCustomEvent, RestoreCustomResult, RestoreCustomState};
pub use seed::{RestoreSeedEvent, RestoreSeedResult, RestoreSeedState};
pub use social::{RestoreSocialEvent, RestoreSocialResult, RestoreSocialState};

/// States of the restore-wallet composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreWalletState {
    /// Choosing an entry point.
    Restore {
        /// Device display name, captured at flow start.
        device_name: String,
    },
    /// Choosing among the wallets found in the backup store.
    ChooseBackup {
        /// Device display name.
        device_name: String,
        /// Backups found in the store.
        wallets: Vec<WalletBackup>,
    },
    /// Seed-phrase entry point.
    RestoreSeed {
        /// Device display name.
        device_name: String,
        /// Active leaf state.
        inner: RestoreSeedState,
    },
    /// Phone-verification entry point.
    RestoreCustom {
        /// Device display name.
        device_name: String,
        /// Active leaf state.
        inner: RestoreCustomState,
    },
    /// Social sign-in entry point.
    RestoreSocial {
        /// Device display name.
        device_name: String,
        /// Active leaf state.
        inner: RestoreSocialState,
    },
    /// Key material reconstructed; local security setup.
    SecuritySetup {
        /// The reconstructed wallet awaiting a PIN.
        wallet: RestoredWallet,
        /// Active leaf state.
        inner: SecuritySetupState,
    },
    /// Terminal.
    Finish(RestoreWalletResult),
}

/// Entry-selection events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreEntryEvent {
    /// Read the backup store and list its wallets.
    RestoreFromBackup,
    /// Pick one of the listed backups.
    SelectBackup {
        /// Index into the listed backups.
        index: usize,
    },
    /// Enter a seed phrase instead.
    StartSeed,
    /// Verify the phone number instead.
    StartCustom,
    /// Sign in socially instead.
    StartSocial,
    /// Abandon the restore flow.
    Back,
}

impl RestoreEntryEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::RestoreFromBackup => "restore_from_backup",
            Self::SelectBackup { .. } => "select_backup",
            Self::StartSeed => "start_seed",
            Self::StartCustom => "start_custom",
            Self::StartSocial => "start_social",
            Self::Back => "back",
        }
    }
}

/// Events accepted by the restore-wallet composite, one wrapper per phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreWalletEvent {
    /// Event for the entry-selection phase.
    Restore(RestoreEntryEvent),
    /// Event for the seed-phrase entry point.
    RestoreSeed(RestoreSeedEvent),
    /// Event for the phone-verification entry point.
    RestoreCustom(RestoreCustomEvent),
    /// Event for the social entry point.
    RestoreSocial(RestoreSocialEvent),
    /// Event for the security-setup phase.
    SecuritySetup(SecuritySetupEvent),
}

impl RestoreWalletEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Restore(event) => event.name(),
            Self::RestoreSeed(_) => "restore_seed",
            Self::RestoreCustom(_) => "restore_custom",
            Self::RestoreSocial(_) => "restore_social",
            Self::SecuritySetup(_) => "security_setup",
        }
    }
}

/// Terminal outcomes of the restore-wallet composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreWalletResult {
    /// Wallet reconstructed and secured.
    Restored {
        /// The reconstructed wallet.
        wallet: RestoredWallet,
        /// The confirmed PIN.
        pincode: String,
        /// Whether biometric unlock was enabled.
        with_biometry: bool,
    },
    /// User abandoned the flow.
    BreakProcess,
}

impl RestoreWalletState {
    /// Initial state for a fresh restore flow.
    pub fn new(device_name: impl Into<String>) -> Self {
        Self::Restore {
            device_name: device_name.into(),
        }
    }

    fn converge(wallet: RestoredWallet) -> Self {
        Self::SecuritySetup {
            wallet,
            inner: SecuritySetupState::CreatePincode,
        }
    }
}

#[async_trait]
impl StateMachine for RestoreWalletState {
    type Event = RestoreWalletEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: RestoreWalletEvent,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (Self::Restore { device_name }, RestoreWalletEvent::Restore(event)) => match event {
                RestoreEntryEvent::RestoreFromBackup => {
                    let wallets = provider.backup.restore().await?;
                    if wallets.is_empty() {
                        return Err(keyloom_core::effects::BackupError::NotFound.into());
                    }
                    Ok(Self::ChooseBackup {
                        device_name: device_name.clone(),
                        wallets,
                    })
                }
                RestoreEntryEvent::StartSeed => Ok(Self::RestoreSeed {
                    device_name: device_name.clone(),
                    inner: RestoreSeedState::EnterSeed,
                }),
                RestoreEntryEvent::StartCustom => Ok(Self::RestoreCustom {
                    device_name: device_name.clone(),
                    inner: RestoreCustomState::initial(),
                }),
                RestoreEntryEvent::StartSocial => Ok(Self::RestoreSocial {
                    device_name: device_name.clone(),
                    inner: RestoreSocialState::Selection,
                }),
                RestoreEntryEvent::Back => Ok(Self::Finish(RestoreWalletResult::BreakProcess)),
                event => Err(FlowError::invalid_event(self.name(), event.name())),
            },
            (
                Self::ChooseBackup {
                    device_name,
                    wallets,
                },
                RestoreWalletEvent::Restore(event),
            ) => match event {
                RestoreEntryEvent::SelectBackup { index } => match wallets.get(index) {
                    Some(backup) => Ok(Self::converge(RestoredWallet {
                        seed_phrase: backup.seed_phrase.clone(),
                        eth_public_key: backup.eth_public_key.clone(),
                        device_share: None,
                        email: None,
                    })),
                    None => Err(FlowError::invalid_event(self.name(), "select_backup")),
                },
                RestoreEntryEvent::Back => Ok(Self::Restore {
                    device_name: device_name.clone(),
                }),
                event => Err(FlowError::invalid_event(self.name(), event.name())),
            },
            (
                Self::RestoreSeed { device_name, inner },
                RestoreWalletEvent::RestoreSeed(event),
            ) => match inner.accept(event, provider).await? {
                RestoreSeedState::Finish(result) => match result {
                    RestoreSeedResult::Success {
                        seed_phrase,
                        eth_public_key,
                    } => Ok(Self::converge(RestoredWallet {
                        seed_phrase,
                        eth_public_key,
                        device_share: None,
                        email: None,
                    })),
                    RestoreSeedResult::BreakProcess => Ok(Self::Restore {
                        device_name: device_name.clone(),
                    }),
                },
                next => Ok(Self::RestoreSeed {
                    device_name: device_name.clone(),
                    inner: next,
                }),
            },
            (
                Self::RestoreCustom { device_name, inner },
                RestoreWalletEvent::RestoreCustom(event),
            ) => match inner.accept(event, provider).await? {
                RestoreCustomState::Finish(result) => match result {
                    RestoreCustomResult::Success { custom_share, .. } => {
                        let device_share = provider.backup.local_device_share().await?;
                        let outcome = provider
                            .facade
                            .recover(&device_share, &custom_share)
                            .await?;
                        Ok(Self::converge(RestoredWallet {
                            seed_phrase: outcome.seed_phrase,
                            eth_public_key: outcome.eth_public_key,
                            device_share: Some(device_share),
                            email: None,
                        }))
                    }
                    RestoreCustomResult::BreakProcess => Ok(Self::Restore {
                        device_name: device_name.clone(),
                    }),
                },
                next => Ok(Self::RestoreCustom {
                    device_name: device_name.clone(),
                    inner: next,
                }),
            },
            (
                Self::RestoreSocial { device_name, inner },
                RestoreWalletEvent::RestoreSocial(event),
            ) => match inner.accept(event, provider).await? {
                RestoreSocialState::Finish(result) => match result {
                    RestoreSocialResult::Success {
                        seed_phrase,
                        eth_public_key,
                        device_share,
                        email,
                    } => Ok(Self::converge(RestoredWallet {
                        seed_phrase,
                        eth_public_key,
                        device_share: Some(device_share),
                        email: Some(email),
                    })),
                    RestoreSocialResult::BreakProcess => Ok(Self::Restore {
                        device_name: device_name.clone(),
                    }),
                },
                next => Ok(Self::RestoreSocial {
                    device_name: device_name.clone(),
                    inner: next,
                }),
            },
            (
                Self::SecuritySetup { wallet, inner },
                RestoreWalletEvent::SecuritySetup(event),
            ) => match inner.accept(event, provider).await? {
                SecuritySetupState::Finish(result) => match result {
                    SecuritySetupResult::Success {
                        pincode,
                        with_biometry,
                    } => Ok(Self::Finish(RestoreWalletResult::Restored {
                        wallet: wallet.clone(),
                        pincode,
                        with_biometry,
                    })),
                    SecuritySetupResult::BreakProcess => {
                        Ok(Self::Finish(RestoreWalletResult::BreakProcess))
                    }
                },
                next => Ok(Self::SecuritySetup {
                    wallet: wallet.clone(),
                    inner: next,
                }),
            },
            (state, event) => Err(FlowError::invalid_event(state.name(), event.name())),
        }
    }
}

impl FlowProgress for RestoreWalletState {
    fn step(&self) -> u32 {
        match self {
            Self::Restore { .. } => composite_step(1, 1),
            Self::ChooseBackup { .. } => composite_step(1, 2),
            Self::RestoreSeed { inner, .. } => composite_step(2, inner.step()),
            Self::RestoreCustom { inner, .. } => composite_step(2, inner.step()),
            Self::RestoreSocial { inner, .. } => composite_step(2, inner.step()),
            Self::SecuritySetup { inner, .. } => composite_step(3, inner.step()),
            Self::Finish(_) => 4 * PHASE_STRIDE,
        }
    }

    fn continuable(&self) -> bool {
        match self {
            Self::RestoreSeed { inner, .. } => inner.continuable(),
            Self::RestoreCustom { inner, .. } => inner.continuable(),
            Self::RestoreSocial { inner, .. } => inner.continuable(),
            Self::SecuritySetup { inner, .. } => inner.continuable(),
            _ => true,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Restore { .. } => "restore_wallet.restore",
            Self::ChooseBackup { .. } => "restore_wallet.choose_backup",
            Self::RestoreSeed { .. } => "restore_wallet.restore_seed",
            Self::RestoreCustom { .. } => "restore_wallet.restore_custom",
            Self::RestoreSocial { .. } => "restore_wallet.restore_social",
            Self::SecuritySetup { .. } => "restore_wallet.security_setup",
            Self::Finish(_) => "restore_wallet.finish",
        }
    }
}

//! Social restore leaf.
//!
//! Re-authenticates the social identity and reconstructs existing key
//! material from the identity key plus the locally held device share. The
//! facade's "identity never provisioned" code is modeled as the
//! `NoWalletFound` state, mirroring how the sign-in leaf models its
//! "already provisioned" twin.

use crate::provider::OnboardingProvider;
use async_trait::async_trait;
use keyloom_core::effects::{SocialProvider, IDENTITY_NOT_PROVISIONED};
use keyloom_core::{FlowError, FlowProgress, FlowResult, KeyShare, SeedPhrase, StateMachine};
use serde::{Deserialize, Serialize};

/// States of the social-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreSocialState {
    /// Choosing a social provider.
    Selection,
    /// The identity has no wallet behind it; retry or step back.
    NoWalletFound {
        /// Provider of the empty identity.
        provider: SocialProvider,
        /// Email of the empty identity.
        email: String,
    },
    /// Terminal.
    Finish(RestoreSocialResult),
}

/// Events accepted by the social-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreSocialEvent {
    /// Sign in with the chosen provider and reconstruct.
    SignIn(SocialProvider),
    /// Step back.
    Back,
}

impl RestoreSocialEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SignIn(_) => "sign_in",
            Self::Back => "back",
        }
    }
}

/// Terminal outcomes of the social-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreSocialResult {
    /// Key material reconstructed.
    Success {
        /// The recovered mnemonic.
        seed_phrase: SeedPhrase,
        /// Reconstructed Ethereum public key.
        eth_public_key: String,
        /// Device share used for the reconstruction.
        device_share: KeyShare,
        /// Email behind the identity.
        email: String,
    },
    /// User abandoned this entry point.
    BreakProcess,
}

impl RestoreSocialState {
    async fn reconstruct(
        kind: SocialProvider,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        let credential = provider.auth.auth(kind).await?;
        provider.facade.initialize().await?;
        let torus_key = provider.facade.obtain_torus_key(&credential.token_id).await?;
        let device_share = provider.backup.local_device_share().await?;
        match provider.facade.sign_in(&torus_key, &device_share).await {
            Ok(outcome) => Ok(Self::Finish(RestoreSocialResult::Success {
                seed_phrase: outcome.seed_phrase,
                eth_public_key: outcome.eth_public_key,
                device_share,
                email: credential.email,
            })),
            Err(err) if err.code == IDENTITY_NOT_PROVISIONED => {
                tracing::debug!(%kind, "identity has no wallet behind it");
                Ok(Self::NoWalletFound {
                    provider: kind,
                    email: credential.email,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl StateMachine for RestoreSocialState {
    type Event = RestoreSocialEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: RestoreSocialEvent,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (Self::Selection, RestoreSocialEvent::SignIn(kind)) => {
                Self::reconstruct(kind, provider).await
            }
            (Self::Selection, RestoreSocialEvent::Back) => {
                Ok(Self::Finish(RestoreSocialResult::BreakProcess))
            }
            (Self::NoWalletFound { .. }, RestoreSocialEvent::SignIn(kind)) => {
                Self::reconstruct(kind, provider).await
            }
            (Self::NoWalletFound { .. }, RestoreSocialEvent::Back) => Ok(Self::Selection),
            (state, event) => Err(FlowError::invalid_event(state.name(), event.name())),
        }
    }
}

impl FlowProgress for RestoreSocialState {
    fn step(&self) -> u32 {
        match self {
            Self::Selection => 1,
            Self::NoWalletFound { .. } => 2,
            Self::Finish(_) => 3,
        }
    }

    fn continuable(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Selection => "restore_social.selection",
            Self::NoWalletFound { .. } => "restore_social.no_wallet_found",
            Self::Finish(_) => "restore_social.finish",
        }
    }
}

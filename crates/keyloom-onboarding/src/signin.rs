//! Social sign-in leaf flow.
//!
//! Authenticates against a social provider, then provisions threshold key
//! material through the facade with a freshly generated mnemonic as the
//! private input. A facade error with code [`ACCOUNT_ALREADY_USED`] is not a
//! failure: it is the modeled `AccountAlreadyUsed` state, from which the
//! user may retry with another provider or switch to the restore flow.

use crate::flow_data::SignedUpWallet;
use crate::provider::OnboardingProvider;
use async_trait::async_trait;
use keyloom_core::effects::{SocialProvider, ACCOUNT_ALREADY_USED};
use keyloom_core::{FlowError, FlowProgress, FlowResult, StateMachine};
use serde::{Deserialize, Serialize};

/// States of the sign-in leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SocialSignInState {
    /// Choosing a social provider.
    Selection,
    /// Credential obtained, awaiting confirmation to provision keys.
    InProgress {
        /// Provider-issued identity token.
        token_id: String,
        /// Email behind the identity.
        email: String,
        /// Chosen provider.
        provider: SocialProvider,
    },
    /// The identity already has a wallet; retry or switch to restore.
    AccountAlreadyUsed {
        /// Provider of the colliding identity.
        provider: SocialProvider,
        /// Email of the colliding identity.
        email: String,
    },
    /// Terminal.
    Finish(SocialSignInResult),
}

/// Events accepted by the sign-in leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SocialSignInEvent {
    /// Start sign-in with the chosen provider.
    SignIn(SocialProvider),
    /// Confirm the obtained credential and provision key material.
    SignInConfirm {
        /// Provider-issued identity token.
        token_id: String,
        /// Email behind the identity.
        email: String,
        /// Chosen provider.
        provider: SocialProvider,
    },
    /// Switch to the restore flow for an already-used identity.
    Restore {
        /// Provider of the colliding identity.
        provider: SocialProvider,
        /// Email of the colliding identity.
        email: String,
    },
    /// Step back.
    Back,
}

impl SocialSignInEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SignIn(_) => "sign_in",
            Self::SignInConfirm { .. } => "sign_in_confirm",
            Self::Restore { .. } => "restore",
            Self::Back => "back",
        }
    }
}

/// Terminal outcomes of the sign-in leaf. Consumed exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SocialSignInResult {
    /// Key material provisioned.
    Successful(SignedUpWallet),
    /// User chose to restore an existing wallet instead.
    SwitchToRestoreFlow,
    /// User abandoned the flow.
    BreakProcess,
}

impl SocialSignInState {
    /// Run the provider sign-in and move to `InProgress`.
    async fn start_sign_in(
        provider_kind: SocialProvider,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        let credential = provider.auth.auth(provider_kind).await?;
        Ok(Self::InProgress {
            token_id: credential.token_id,
            email: credential.email,
            provider: provider_kind,
        })
    }
}

#[async_trait]
impl StateMachine for SocialSignInState {
    type Event = SocialSignInEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: SocialSignInEvent,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (Self::Selection, SocialSignInEvent::SignIn(kind)) => {
                Self::start_sign_in(kind, provider).await
            }
            (Self::Selection, SocialSignInEvent::Back) => {
                Ok(Self::Finish(SocialSignInResult::BreakProcess))
            }
            (
                Self::InProgress { .. },
                SocialSignInEvent::SignInConfirm {
                    token_id,
                    email,
                    provider: kind,
                },
            ) => {
                provider.facade.initialize().await?;
                let torus_key = provider.facade.obtain_torus_key(&token_id).await?;
                let seed_phrase = provider.mnemonic.generate_phrase().await?;
                match provider.facade.sign_up(&torus_key, &seed_phrase).await {
                    Ok(outcome) => Ok(Self::Finish(SocialSignInResult::Successful(
                        SignedUpWallet {
                            email,
                            auth_provider: kind,
                            seed_phrase,
                            eth_public_key: outcome.eth_public_key,
                            device_share: outcome.device_share,
                            custom_share: outcome.custom_share,
                            facade_metadata: outcome.metadata,
                        },
                    ))),
                    Err(err) if err.code == ACCOUNT_ALREADY_USED => {
                        tracing::debug!(%kind, "identity already provisioned, offering restore");
                        Ok(Self::AccountAlreadyUsed {
                            provider: kind,
                            email,
                        })
                    }
                    Err(err) => Err(err.into()),
                }
            }
            (Self::InProgress { .. }, SocialSignInEvent::Back) => Ok(Self::Selection),
            (Self::AccountAlreadyUsed { .. }, SocialSignInEvent::SignIn(kind)) => {
                Self::start_sign_in(kind, provider).await
            }
            (
                Self::AccountAlreadyUsed { .. },
                SocialSignInEvent::Restore { .. },
            ) => Ok(Self::Finish(SocialSignInResult::SwitchToRestoreFlow)),
            (Self::AccountAlreadyUsed { .. }, SocialSignInEvent::Back) => Ok(Self::Selection),
            (state, event) => Err(FlowError::invalid_event(state.name(), event.name())),
        }
    }
}

impl FlowProgress for SocialSignInState {
    fn step(&self) -> u32 {
        match self {
            Self::Selection => 1,
            Self::InProgress { .. } => 2,
            Self::AccountAlreadyUsed { .. } => 3,
            Self::Finish(_) => 4,
        }
    }

    fn continuable(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Selection => "social_sign_in.selection",
            Self::InProgress { .. } => "social_sign_in.in_progress",
            Self::AccountAlreadyUsed { .. } => "social_sign_in.account_already_used",
            Self::Finish(_) => "social_sign_in.finish",
        }
    }
}

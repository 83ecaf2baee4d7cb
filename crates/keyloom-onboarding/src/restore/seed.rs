//! Seed-phrase restore leaf.
//!
//! Validates user-entered words as a BIP-39 phrase and derives the wallet
//! public key through the facade. Invalid phrases propagate as errors (state
//! unchanged) so the UI can re-submit.

use crate::provider::OnboardingProvider;
use async_trait::async_trait;
use keyloom_core::{FlowError, FlowProgress, FlowResult, SeedPhrase, StateMachine};
use serde::{Deserialize, Serialize};

/// States of the seed-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreSeedState {
    /// Entering the mnemonic.
    EnterSeed,
    /// Terminal.
    Finish(RestoreSeedResult),
}

/// Events accepted by the seed-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreSeedEvent {
    /// Submit the entered words.
    EnterSeedPhrase {
        /// The words as entered.
        phrase: String,
    },
    /// Step back.
    Back,
}

impl RestoreSeedEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::EnterSeedPhrase { .. } => "enter_seed_phrase",
            Self::Back => "back",
        }
    }
}

/// Terminal outcomes of the seed-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreSeedResult {
    /// Phrase validated and wallet derived.
    Success {
        /// The validated mnemonic.
        seed_phrase: SeedPhrase,
        /// Derived Ethereum public key.
        eth_public_key: String,
    },
    /// User abandoned this entry point.
    BreakProcess,
}

#[async_trait]
impl StateMachine for RestoreSeedState {
    type Event = RestoreSeedEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: RestoreSeedEvent,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (Self::EnterSeed, RestoreSeedEvent::EnterSeedPhrase { phrase }) => {
                let seed_phrase = provider.mnemonic.validate_phrase(&phrase).await?;
                let eth_public_key = provider.facade.derive_wallet(&seed_phrase).await?;
                Ok(Self::Finish(RestoreSeedResult::Success {
                    seed_phrase,
                    eth_public_key,
                }))
            }
            (Self::EnterSeed, RestoreSeedEvent::Back) => {
                Ok(Self::Finish(RestoreSeedResult::BreakProcess))
            }
            (state, event) => Err(FlowError::invalid_event(state.name(), event.name())),
        }
    }
}

impl FlowProgress for RestoreSeedState {
    fn step(&self) -> u32 {
        match self {
            Self::EnterSeed => 1,
            Self::Finish(_) => 2,
        }
    }

    fn continuable(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        match self {
            Self::EnterSeed => "restore_seed.enter_seed",
            Self::Finish(_) => "restore_seed.finish",
        }
    }
}

//! Create-wallet composite flow.
//!
//! Sequences sign-in -> phone binding -> security setup. Each composite
//! state wraps exactly one active leaf plus the context accumulated from
//! prior leaves; the wrapped event type is forwarded to the leaf's `accept`,
//! non-terminal leaf states are re-wrapped with context carried forward
//! unchanged, and terminal leaf results are promoted into the composite's
//! own transitions. An event for any other phase is rejected with
//! `InvalidEvent`, so a phone-binding event can never reach the
//! security-setup phase.

use crate::flow_data::{PhoneFlowData, ProvisionedWallet};
use crate::phone::{PhoneBindingEvent, PhoneBindingResult, PhoneBindingState};
use crate::provider::OnboardingProvider;
use crate::security::{SecuritySetupEvent, SecuritySetupResult, SecuritySetupState};
use crate::signin::{SocialSignInEvent, SocialSignInResult, SocialSignInState};
use async_trait::async_trait;
use keyloom_core::{
    composite_step, FlowError, FlowProgress, FlowResult, KeyShare, StateMachine, PHASE_STRIDE,
};
use serde::{Deserialize, Serialize};

/// States of the create-wallet composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CreateWalletState {
    /// Phase 1: social sign-in and key provisioning.
    SocialSignIn {
        /// Device display name, captured at flow start.
        device_name: String,
        /// Active leaf state.
        inner: SocialSignInState,
    },
    /// Phase 2: phone binding. Secrets needed by the leaf travel inside its
    /// flow data; only the context the later phases need stays out here.
    BindingPhoneNumber {
        /// Share kept on this device, held for the finished wallet.
        device_share: KeyShare,
        /// Facade metadata blob, held for the finished wallet.
        facade_metadata: String,
        /// Active leaf state.
        inner: PhoneBindingState,
    },
    /// Phase 3: local security setup.
    SecuritySetup {
        /// The fully provisioned wallet awaiting a PIN.
        wallet: ProvisionedWallet,
        /// Active leaf state.
        inner: SecuritySetupState,
    },
    /// Terminal.
    Finish(CreateWalletResult),
}

/// Events accepted by the create-wallet composite, one wrapper per phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CreateWalletEvent {
    /// Event for the sign-in phase.
    SocialSignIn(SocialSignInEvent),
    /// Event for the phone-binding phase.
    BindingPhoneNumber(PhoneBindingEvent),
    /// Event for the security-setup phase.
    SecuritySetup(SecuritySetupEvent),
}

impl CreateWalletEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SocialSignIn(_) => "social_sign_in",
            Self::BindingPhoneNumber(_) => "binding_phone_number",
            Self::SecuritySetup(_) => "security_setup",
        }
    }
}

/// Terminal outcomes of the create-wallet composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CreateWalletResult {
    /// Wallet created, bound, and secured.
    NewWallet {
        /// The finished wallet.
        wallet: ProvisionedWallet,
        /// The confirmed PIN.
        pincode: String,
        /// Whether biometric unlock was enabled.
        with_biometry: bool,
    },
    /// User chose to restore an existing wallet instead.
    SwitchToRestoreFlow,
    /// User abandoned the flow.
    BreakProcess,
}

impl CreateWalletState {
    /// Initial state for a fresh creation flow.
    pub fn new(device_name: impl Into<String>) -> Self {
        Self::SocialSignIn {
            device_name: device_name.into(),
            inner: SocialSignInState::Selection,
        }
    }
}

#[async_trait]
impl StateMachine for CreateWalletState {
    type Event = CreateWalletEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: CreateWalletEvent,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (
                Self::SocialSignIn { device_name, inner },
                CreateWalletEvent::SocialSignIn(event),
            ) => match inner.accept(event, provider).await? {
                SocialSignInState::Finish(result) => match result {
                    SocialSignInResult::Successful(wallet) => Ok(Self::BindingPhoneNumber {
                        device_share: wallet.device_share,
                        facade_metadata: wallet.facade_metadata,
                        inner: PhoneBindingState::initial(PhoneFlowData::new(
                            wallet.seed_phrase,
                            wallet.eth_public_key,
                            wallet.custom_share,
                            wallet.email,
                            device_name.clone(),
                            wallet.auth_provider,
                        )),
                    }),
                    SocialSignInResult::SwitchToRestoreFlow => {
                        Ok(Self::Finish(CreateWalletResult::SwitchToRestoreFlow))
                    }
                    SocialSignInResult::BreakProcess => {
                        Ok(Self::Finish(CreateWalletResult::BreakProcess))
                    }
                },
                next => Ok(Self::SocialSignIn {
                    device_name: device_name.clone(),
                    inner: next,
                }),
            },
            (
                Self::BindingPhoneNumber {
                    device_share,
                    facade_metadata,
                    inner,
                },
                CreateWalletEvent::BindingPhoneNumber(event),
            ) => match inner.accept(event, provider).await? {
                PhoneBindingState::Finish(result) => match result {
                    PhoneBindingResult::Success { metadata, data } => Ok(Self::SecuritySetup {
                        wallet: ProvisionedWallet {
                            seed_phrase: data.seed_phrase,
                            eth_public_key: data.eth_public_key,
                            device_share: device_share.clone(),
                            custom_share: data.custom_share,
                            facade_metadata: facade_metadata.clone(),
                            metadata,
                        },
                        inner: SecuritySetupState::CreatePincode,
                    }),
                    PhoneBindingResult::BreakProcess => {
                        Ok(Self::Finish(CreateWalletResult::BreakProcess))
                    }
                },
                next => Ok(Self::BindingPhoneNumber {
                    device_share: device_share.clone(),
                    facade_metadata: facade_metadata.clone(),
                    inner: next,
                }),
            },
            (
                Self::SecuritySetup { wallet, inner },
                CreateWalletEvent::SecuritySetup(event),
            ) => match inner.accept(event, provider).await? {
                SecuritySetupState::Finish(result) => match result {
                    SecuritySetupResult::Success {
                        pincode,
                        with_biometry,
                    } => Ok(Self::Finish(CreateWalletResult::NewWallet {
                        wallet: wallet.clone(),
                        pincode,
                        with_biometry,
                    })),
                    SecuritySetupResult::BreakProcess => {
                        Ok(Self::Finish(CreateWalletResult::BreakProcess))
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

impl FlowProgress for CreateWalletState {
    fn step(&self) -> u32 {
        match self {
            Self::SocialSignIn { inner, .. } => composite_step(1, inner.step()),
            Self::BindingPhoneNumber { inner, .. } => composite_step(2, inner.step()),
            Self::SecuritySetup { inner, .. } => composite_step(3, inner.step()),
            Self::Finish(_) => 4 * PHASE_STRIDE,
        }
    }

    fn continuable(&self) -> bool {
        match self {
            Self::SocialSignIn { inner, .. } => inner.continuable(),
            Self::BindingPhoneNumber { inner, .. } => inner.continuable(),
            Self::SecuritySetup { inner, .. } => inner.continuable(),
            Self::Finish(_) => true,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::SocialSignIn { .. } => "create_wallet.social_sign_in",
            Self::BindingPhoneNumber { .. } => "create_wallet.binding_phone_number",
            Self::SecuritySetup { .. } => "create_wallet.security_setup",
            Self::Finish(_) => "create_wallet.finish",
        }
    }
}

//! Security-setup leaf flow.
//!
//! Local PIN (and optional biometry) provisioning. Pure: no provider I/O.
//! The composites consume its terminal result exactly like the other
//! leaves'.

use crate::provider::OnboardingProvider;
use async_trait::async_trait;
use keyloom_core::{FlowError, FlowProgress, FlowResult, StateMachine};
use serde::{Deserialize, Serialize};

/// States of the security-setup leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SecuritySetupState {
    /// Choosing a PIN.
    CreatePincode,
    /// Re-entering the PIN to confirm it.
    ConfirmPincode {
        /// The PIN chosen in the previous step.
        pincode: String,
    },
    /// Terminal.
    Finish(SecuritySetupResult),
}

/// Events accepted by the security-setup leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SecuritySetupEvent {
    /// First entry of the chosen PIN.
    SetPincode {
        /// The PIN as entered.
        pincode: String,
    },
    /// Confirmation entry of the PIN.
    ConfirmPincode {
        /// The PIN as re-entered.
        pincode: String,
        /// Whether biometric unlock should also be enabled.
        with_biometry: bool,
    },
    /// Step back.
    Back,
}

impl SecuritySetupEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SetPincode { .. } => "set_pincode",
            Self::ConfirmPincode { .. } => "confirm_pincode",
            Self::Back => "back",
        }
    }
}

/// Terminal outcomes of the security-setup leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SecuritySetupResult {
    /// PIN confirmed.
    Success {
        /// The confirmed PIN.
        pincode: String,
        /// Whether biometric unlock was enabled.
        with_biometry: bool,
    },
    /// User abandoned the flow.
    BreakProcess,
}

#[async_trait]
impl StateMachine for SecuritySetupState {
    type Event = SecuritySetupEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: SecuritySetupEvent,
        _provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (Self::CreatePincode, SecuritySetupEvent::SetPincode { pincode }) => {
                Ok(Self::ConfirmPincode { pincode })
            }
            (Self::CreatePincode, SecuritySetupEvent::Back) => {
                Ok(Self::Finish(SecuritySetupResult::BreakProcess))
            }
            (
                Self::ConfirmPincode { pincode },
                SecuritySetupEvent::ConfirmPincode {
                    pincode: confirmation,
                    with_biometry,
                },
            ) => {
                if confirmation == *pincode {
                    Ok(Self::Finish(SecuritySetupResult::Success {
                        pincode: confirmation,
                        with_biometry,
                    }))
                } else {
                    // Mismatch restarts PIN entry from scratch.
                    Ok(Self::CreatePincode)
                }
            }
            (Self::ConfirmPincode { .. }, SecuritySetupEvent::Back) => Ok(Self::CreatePincode),
            (state, event) => Err(FlowError::invalid_event(state.name(), event.name())),
        }
    }
}

impl FlowProgress for SecuritySetupState {
    fn step(&self) -> u32 {
        match self {
            Self::CreatePincode => 1,
            Self::ConfirmPincode { .. } => 2,
            Self::Finish(_) => 3,
        }
    }

    fn continuable(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        match self {
            Self::CreatePincode => "security_setup.create_pincode",
            Self::ConfirmPincode { .. } => "security_setup.confirm_pincode",
            Self::Finish(_) => "security_setup.finish",
        }
    }
}

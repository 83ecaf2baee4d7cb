//! Phone-binding leaf flow.
//!
//! Issues and verifies an OTP against the gateway, gated by a client-side
//! throttle and the gateway's own cooldowns. Failure policy, decided at the
//! leaf boundary immediately after each gateway call:
//!
//! - one of the enumerated internal codes -> `Broken(code)`, a dead end
//! - a cooldown error -> `Block(now + cooldown, reason)`, recoverable once
//!   the deadline passes
//! - anything else propagates unmodified, state unchanged
//!
//! Re-submitting the same phone number after it was already sent
//! short-circuits straight to `EnterOtp` without touching the gateway.

use crate::flow_data::{PhoneFlowData, WalletMetadata};
use crate::provider::OnboardingProvider;
use async_trait::async_trait;
use keyloom_core::effects::{
    is_broken_code, ConfirmRegisterWalletRequest, GatewayError, OtpChannel, PhoneNumber,
    RegisterWalletRequest,
};
use keyloom_core::{FlowError, FlowProgress, FlowResult, StateMachine, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client-side lockout applied when the sending throttle is exhausted.
pub const THROTTLE_BLOCK_TIME: Duration = Duration::from_secs(600);

/// Which operation a `Block` state is locking out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// Phone-number submission is locked out.
    BlockEnterPhoneNumber,
    /// OTP verification is locked out.
    BlockEnterOtp,
    /// OTP resending is locked out.
    BlockResend,
}

/// States of the phone-binding leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhoneBindingState {
    /// Entering (or re-entering) the phone number.
    EnterPhoneNumber {
        /// Number previously submitted, if any.
        initial_phone_number: Option<PhoneNumber>,
        /// Whether an OTP was already sent to `initial_phone_number`.
        did_send: bool,
        /// Resend count carried across a step back from `EnterOtp`.
        resend_counter: Option<u32>,
        /// Accumulated flow payload.
        data: PhoneFlowData,
    },
    /// Awaiting the one-time password. The code itself only ever arrives via
    /// the `EnterOtp` event, never in state.
    EnterOtp {
        /// How many times the OTP was resent.
        resend_counter: u32,
        /// Channel the OTP was delivered on.
        channel: OtpChannel,
        /// Number the OTP was delivered to.
        phone_number: PhoneNumber,
        /// Accumulated flow payload.
        data: PhoneFlowData,
    },
    /// Timed lockout; `BlockFinish` is legal only once `until` has passed.
    Block {
        /// Deadline after which the flow may resume.
        until: Timestamp,
        /// Which operation tripped the lockout.
        reason: BlockReason,
        /// Number the lockout applies to.
        phone_number: PhoneNumber,
        /// Accumulated flow payload.
        data: PhoneFlowData,
    },
    /// Unrecoverable gateway failure. Not continuable; the only exit is
    /// `Back`, which abandons the flow.
    Broken {
        /// The gateway code that ended the attempt.
        code: i64,
    },
    /// Terminal.
    Finish(PhoneBindingResult),
}

/// Events accepted by the phone-binding leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhoneBindingEvent {
    /// Submit a phone number for OTP delivery.
    EnterPhoneNumber {
        /// Number to deliver the OTP to.
        phone_number: PhoneNumber,
        /// Requested delivery channel.
        channel: OtpChannel,
    },
    /// Submit the received one-time password.
    EnterOtp {
        /// The code as entered.
        code: String,
    },
    /// Ask for the OTP to be delivered again.
    ResendOtp,
    /// Acknowledge an elapsed lockout.
    BlockFinish,
    /// Abandon the flow from a lockout.
    Home,
    /// Step back.
    Back,
}

impl PhoneBindingEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::EnterPhoneNumber { .. } => "enter_phone_number",
            Self::EnterOtp { .. } => "enter_otp",
            Self::ResendOtp => "resend_otp",
            Self::BlockFinish => "block_finish",
            Self::Home => "home",
            Self::Back => "back",
        }
    }
}

/// Terminal outcomes of the phone-binding leaf.
///
/// `Success` hands the loaned secrets back to the enclosing composite so no
/// second live copy exists while the leaf runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhoneBindingResult {
    /// Phone bound; wallet metadata assembled.
    Success {
        /// Metadata for the finished wallet.
        metadata: WalletMetadata,
        /// Payload carried through the leaf, returned to the composite.
        data: PhoneFlowData,
    },
    /// User abandoned the flow.
    BreakProcess,
}

/// Deterministic byte payload the gateway expects to be signed.
fn registration_payload(eth_address: &str, phone: &PhoneNumber, timestamp: Timestamp) -> Vec<u8> {
    format!("{eth_address}:{phone}:{}", timestamp.as_millis()).into_bytes()
}

/// Classify a gateway failure into a state, or propagate it.
fn classify_gateway_error(
    err: GatewayError,
    now: Timestamp,
    reason: BlockReason,
    phone_number: PhoneNumber,
    data: PhoneFlowData,
) -> FlowResult<PhoneBindingState> {
    match err {
        GatewayError::Coded { code } if is_broken_code(code) => {
            tracing::warn!(code, "gateway reported unrecoverable error");
            Ok(PhoneBindingState::Broken { code })
        }
        GatewayError::Cooldown { cooldown } => {
            tracing::debug!(?reason, ?cooldown, "gateway imposed cooldown");
            Ok(PhoneBindingState::Block {
                until: now + cooldown,
                reason,
                phone_number,
                data,
            })
        }
        other => Err(other.into()),
    }
}

impl PhoneBindingState {
    /// Initial state for a freshly seeded leaf.
    pub fn initial(data: PhoneFlowData) -> Self {
        Self::EnterPhoneNumber {
            initial_phone_number: None,
            did_send: false,
            resend_counter: None,
            data,
        }
    }

    /// Send (or re-send) the OTP for `phone_number`, classifying failures.
    async fn send_otp(
        data: PhoneFlowData,
        phone_number: PhoneNumber,
        channel: OtpChannel,
        resend_counter: u32,
        reason: BlockReason,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        let now = provider.clock.now().await;
        let payload = registration_payload(&data.eth_public_key, &phone_number, now);
        let signature = provider.signer.sign(&data.seed_phrase, &payload).await?;
        let request = RegisterWalletRequest {
            signature,
            eth_address: data.eth_public_key.clone(),
            phone: phone_number.clone(),
            channel,
            timestamp: now,
        };
        match provider.gateway.register_wallet(request).await {
            Ok(()) => Ok(Self::EnterOtp {
                resend_counter,
                channel,
                phone_number,
                data,
            }),
            Err(err) => classify_gateway_error(err, now, reason, phone_number, data),
        }
    }
}

#[async_trait]
impl StateMachine for PhoneBindingState {
    type Event = PhoneBindingEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: PhoneBindingEvent,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (
                Self::EnterPhoneNumber {
                    initial_phone_number,
                    did_send,
                    resend_counter,
                    data,
                },
                PhoneBindingEvent::EnterPhoneNumber {
                    phone_number,
                    channel,
                },
            ) => {
                // Same number already sent: straight back to OTP entry, no
                // new gateway call.
                if *did_send && initial_phone_number.as_ref() == Some(&phone_number) {
                    return Ok(Self::EnterOtp {
                        resend_counter: resend_counter.unwrap_or(0),
                        channel,
                        phone_number,
                        data: data.clone(),
                    });
                }

                let now = provider.clock.now().await;
                let mut data = data.clone();
                if !data.sending_throttle.process(now) {
                    data.sending_throttle.reset();
                    return Ok(Self::Block {
                        until: now + THROTTLE_BLOCK_TIME,
                        reason: BlockReason::BlockEnterPhoneNumber,
                        phone_number,
                        data,
                    });
                }

                Self::send_otp(
                    data,
                    phone_number,
                    channel,
                    0,
                    BlockReason::BlockEnterPhoneNumber,
                    provider,
                )
                .await
            }
            (Self::EnterPhoneNumber { .. }, PhoneBindingEvent::Back) => {
                Ok(Self::Finish(PhoneBindingResult::BreakProcess))
            }
            (
                Self::EnterOtp {
                    phone_number, data, ..
                },
                PhoneBindingEvent::EnterOtp { code },
            ) => {
                let now = provider.clock.now().await;
                let payload = registration_payload(&data.eth_public_key, phone_number, now);
                let signature = provider.signer.sign(&data.seed_phrase, &payload).await?;
                let request = ConfirmRegisterWalletRequest {
                    signature,
                    eth_address: data.eth_public_key.clone(),
                    phone: phone_number.clone(),
                    otp_code: code,
                    timestamp: now,
                };
                match provider.gateway.confirm_register_wallet(request).await {
                    Ok(()) => Ok(Self::Finish(PhoneBindingResult::Success {
                        metadata: WalletMetadata {
                            device_name: data.device_name.clone(),
                            email: data.email.clone(),
                            auth_provider: data.auth_provider,
                            phone_number: phone_number.clone(),
                        },
                        data: data.clone(),
                    })),
                    Err(err) => classify_gateway_error(
                        err,
                        now,
                        BlockReason::BlockEnterOtp,
                        phone_number.clone(),
                        data.clone(),
                    ),
                }
            }
            (
                Self::EnterOtp {
                    resend_counter,
                    channel,
                    phone_number,
                    data,
                },
                PhoneBindingEvent::ResendOtp,
            ) => {
                Self::send_otp(
                    data.clone(),
                    phone_number.clone(),
                    *channel,
                    resend_counter + 1,
                    BlockReason::BlockResend,
                    provider,
                )
                .await
            }
            (
                Self::EnterOtp {
                    resend_counter,
                    phone_number,
                    data,
                    ..
                },
                PhoneBindingEvent::Back,
            ) => Ok(Self::EnterPhoneNumber {
                initial_phone_number: Some(phone_number.clone()),
                did_send: true,
                resend_counter: Some(*resend_counter),
                data: data.clone(),
            }),
            (
                Self::Block {
                    until,
                    phone_number,
                    data,
                    ..
                },
                PhoneBindingEvent::BlockFinish,
            ) => {
                let now = provider.clock.now().await;
                if now < *until {
                    return Err(FlowError::invalid_event(self.name(), "block_finish"));
                }
                let mut data = data.clone();
                data.sending_throttle.reset();
                Ok(Self::EnterPhoneNumber {
                    initial_phone_number: Some(phone_number.clone()),
                    did_send: false,
                    resend_counter: None,
                    data,
                })
            }
            (Self::Block { .. }, PhoneBindingEvent::Home) => {
                Ok(Self::Finish(PhoneBindingResult::BreakProcess))
            }
            (Self::Broken { .. }, PhoneBindingEvent::Back) => {
                Ok(Self::Finish(PhoneBindingResult::BreakProcess))
            }
            (state, event) => Err(FlowError::invalid_event(state.name(), event.name())),
        }
    }
}

impl FlowProgress for PhoneBindingState {
    fn step(&self) -> u32 {
        match self {
            Self::EnterPhoneNumber { .. } => 1,
            Self::EnterOtp { .. } => 2,
            Self::Block { .. } => 3,
            Self::Broken { .. } => 4,
            Self::Finish(_) => 5,
        }
    }

    fn continuable(&self) -> bool {
        !matches!(self, Self::Broken { .. })
    }

    fn name(&self) -> &'static str {
        match self {
            Self::EnterPhoneNumber { .. } => "phone_binding.enter_phone_number",
            Self::EnterOtp { .. } => "phone_binding.enter_otp",
            Self::Block { .. } => "phone_binding.block",
            Self::Broken { .. } => "phone_binding.broken",
            Self::Finish(_) => "phone_binding.finish",
        }
    }
}

//! Custom (phone-based) restore leaf.
//!
//! Recovers the escrowed custom share through the gateway's restore
//! endpoints with the same OTP discipline as phone binding: a client-side
//! sending throttle, the fixed table of unrecoverable gateway codes, and
//! server-supplied cooldowns. No payload signature is required here: the
//! wallet key does not exist yet on this device.

use crate::phone::{BlockReason, THROTTLE_BLOCK_TIME};
use crate::provider::OnboardingProvider;
use async_trait::async_trait;
use keyloom_core::effects::{
    is_broken_code, ConfirmRestoreWalletRequest, GatewayError, OtpChannel, PhoneNumber,
    RestoreWalletRequest,
};
use keyloom_core::{FlowError, FlowProgress, FlowResult, KeyShare, StateMachine, Throttle, Timestamp};
use serde::{Deserialize, Serialize};

use crate::flow_data::{PHONE_SEND_MAX_ATTEMPTS, PHONE_SEND_WINDOW};

/// States of the custom-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreCustomState {
    /// Entering the phone number the custom share is escrowed behind.
    EnterPhoneNumber {
        /// Number previously submitted, if any.
        initial_phone_number: Option<PhoneNumber>,
        /// Whether an OTP was already sent to `initial_phone_number`.
        did_send: bool,
        /// Resend count carried across a step back from `EnterOtp`.
        resend_counter: Option<u32>,
        /// Gate on restore submission.
        throttle: Throttle,
    },
    /// Awaiting the one-time password.
    EnterOtp {
        /// How many times the OTP was resent.
        resend_counter: u32,
        /// Channel the OTP was delivered on.
        channel: OtpChannel,
        /// Number the OTP was delivered to.
        phone_number: PhoneNumber,
        /// Gate on restore submission.
        throttle: Throttle,
    },
    /// Timed lockout.
    Block {
        /// Deadline after which the flow may resume.
        until: Timestamp,
        /// Which operation tripped the lockout.
        reason: BlockReason,
        /// Number the lockout applies to.
        phone_number: PhoneNumber,
        /// Gate on restore submission.
        throttle: Throttle,
    },
    /// Unrecoverable gateway failure; not continuable.
    Broken {
        /// The gateway code that ended the attempt.
        code: i64,
    },
    /// Terminal.
    Finish(RestoreCustomResult),
}

/// Events accepted by the custom-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreCustomEvent {
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

impl RestoreCustomEvent {
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

/// Terminal outcomes of the custom-restore leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestoreCustomResult {
    /// Escrowed material released.
    Success {
        /// The recovered custom share.
        custom_share: KeyShare,
        /// Facade metadata blob stored at registration time.
        metadata: String,
    },
    /// User abandoned this entry point.
    BreakProcess,
}

fn classify(
    err: GatewayError,
    now: Timestamp,
    reason: BlockReason,
    phone_number: PhoneNumber,
    throttle: Throttle,
) -> FlowResult<RestoreCustomState> {
    match err {
        GatewayError::Coded { code } if is_broken_code(code) => {
            tracing::warn!(code, "gateway reported unrecoverable error");
            Ok(RestoreCustomState::Broken { code })
        }
        GatewayError::Cooldown { cooldown } => Ok(RestoreCustomState::Block {
            until: now + cooldown,
            reason,
            phone_number,
            throttle,
        }),
        other => Err(other.into()),
    }
}

impl RestoreCustomState {
    /// Initial state for a fresh custom restore.
    pub fn initial() -> Self {
        Self::EnterPhoneNumber {
            initial_phone_number: None,
            did_send: false,
            resend_counter: None,
            throttle: Throttle::new(PHONE_SEND_MAX_ATTEMPTS, PHONE_SEND_WINDOW),
        }
    }

    async fn send_otp(
        throttle: Throttle,
        phone_number: PhoneNumber,
        channel: OtpChannel,
        resend_counter: u32,
        reason: BlockReason,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        let now = provider.clock.now().await;
        let request = RestoreWalletRequest {
            phone: phone_number.clone(),
            channel,
            timestamp: now,
        };
        match provider.gateway.restore_wallet(request).await {
            Ok(()) => Ok(Self::EnterOtp {
                resend_counter,
                channel,
                phone_number,
                throttle,
            }),
            Err(err) => classify(err, now, reason, phone_number, throttle),
        }
    }
}

#[async_trait]
impl StateMachine for RestoreCustomState {
    type Event = RestoreCustomEvent;
    type Provider = OnboardingProvider;

    async fn accept(
        &self,
        event: RestoreCustomEvent,
        provider: &OnboardingProvider,
    ) -> FlowResult<Self> {
        match (self, event) {
            (
                Self::EnterPhoneNumber {
                    initial_phone_number,
                    did_send,
                    resend_counter,
                    throttle,
                },
                RestoreCustomEvent::EnterPhoneNumber {
                    phone_number,
                    channel,
                },
            ) => {
                if *did_send && initial_phone_number.as_ref() == Some(&phone_number) {
                    return Ok(Self::EnterOtp {
                        resend_counter: resend_counter.unwrap_or(0),
                        channel,
                        phone_number,
                        throttle: throttle.clone(),
                    });
                }

                let now = provider.clock.now().await;
                let mut throttle = throttle.clone();
                if !throttle.process(now) {
                    throttle.reset();
                    return Ok(Self::Block {
                        until: now + THROTTLE_BLOCK_TIME,
                        reason: BlockReason::BlockEnterPhoneNumber,
                        phone_number,
                        throttle,
                    });
                }

                Self::send_otp(
                    throttle,
                    phone_number,
                    channel,
                    0,
                    BlockReason::BlockEnterPhoneNumber,
                    provider,
                )
                .await
            }
            (Self::EnterPhoneNumber { .. }, RestoreCustomEvent::Back) => {
                Ok(Self::Finish(RestoreCustomResult::BreakProcess))
            }
            (
                Self::EnterOtp {
                    phone_number,
                    throttle,
                    ..
                },
                RestoreCustomEvent::EnterOtp { code },
            ) => {
                let now = provider.clock.now().await;
                let request = ConfirmRestoreWalletRequest {
                    phone: phone_number.clone(),
                    otp_code: code,
                    timestamp: now,
                };
                match provider.gateway.confirm_restore_wallet(request).await {
                    Ok(payload) => Ok(Self::Finish(RestoreCustomResult::Success {
                        custom_share: payload.custom_share,
                        metadata: payload.metadata,
                    })),
                    Err(err) => classify(
                        err,
                        now,
                        BlockReason::BlockEnterOtp,
                        phone_number.clone(),
                        throttle.clone(),
                    ),
                }
            }
            (
                Self::EnterOtp {
                    resend_counter,
                    channel,
                    phone_number,
                    throttle,
                },
                RestoreCustomEvent::ResendOtp,
            ) => {
                Self::send_otp(
                    throttle.clone(),
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
                    throttle,
                    ..
                },
                RestoreCustomEvent::Back,
            ) => Ok(Self::EnterPhoneNumber {
                initial_phone_number: Some(phone_number.clone()),
                did_send: true,
                resend_counter: Some(*resend_counter),
                throttle: throttle.clone(),
            }),
            (
                Self::Block {
                    until,
                    phone_number,
                    throttle,
                    ..
                },
                RestoreCustomEvent::BlockFinish,
            ) => {
                let now = provider.clock.now().await;
                if now < *until {
                    return Err(FlowError::invalid_event(self.name(), "block_finish"));
                }
                let mut throttle = throttle.clone();
                throttle.reset();
                Ok(Self::EnterPhoneNumber {
                    initial_phone_number: Some(phone_number.clone()),
                    did_send: false,
                    resend_counter: None,
                    throttle,
                })
            }
            (Self::Block { .. }, RestoreCustomEvent::Home) => {
                Ok(Self::Finish(RestoreCustomResult::BreakProcess))
            }
            (Self::Broken { .. }, RestoreCustomEvent::Back) => {
                Ok(Self::Finish(RestoreCustomResult::BreakProcess))
            }
            (state, event) => Err(FlowError::invalid_event(state.name(), event.name())),
        }
    }
}

impl FlowProgress for RestoreCustomState {
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
            Self::EnterPhoneNumber { .. } => "restore_custom.enter_phone_number",
            Self::EnterOtp { .. } => "restore_custom.enter_otp",
            Self::Block { .. } => "restore_custom.block",
            Self::Broken { .. } => "restore_custom.broken",
            Self::Finish(_) => "restore_custom.finish",
        }
    }
}

//! Phone-binding leaf flow tests.

use assert_matches::assert_matches;
use keyloom_core::effects::{
    GatewayError, OtpChannel, PhoneNumber, SocialProvider, BROKEN_GATEWAY_CODES,
};
use keyloom_core::{FlowError, FlowInterpreter, KeyShare, SeedPhrase, StateMachine};
use keyloom_onboarding::phone::THROTTLE_BLOCK_TIME;
use keyloom_onboarding::{
    BlockReason, PhoneBindingEvent, PhoneBindingResult, PhoneBindingState, PhoneFlowData,
};
use keyloom_testkit::TestProvider;
use std::time::Duration;

fn sample_data() -> PhoneFlowData {
    PhoneFlowData::new(
        SeedPhrase::new("abandon ability able about above absent"),
        "0xdead".to_string(),
        KeyShare::new("c1"),
        "a@b.com".to_string(),
        "test-device".to_string(),
        SocialProvider::Google,
    )
}

fn number() -> PhoneNumber {
    PhoneNumber::new("+15551230000")
}

fn enter_number() -> PhoneBindingEvent {
    PhoneBindingEvent::EnterPhoneNumber {
        phone_number: number(),
        channel: OtpChannel::Sms,
    }
}

#[tokio::test]
async fn submitting_number_sends_otp_and_moves_to_enter_otp() {
    let test = TestProvider::new();
    let next = PhoneBindingState::initial(sample_data())
        .accept(enter_number(), &test.provider)
        .await
        .unwrap();
    assert_matches!(
        next,
        PhoneBindingState::EnterOtp { resend_counter: 0, channel: OtpChannel::Sms, .. }
    );
    assert_eq!(test.gateway.register_calls(), 1);
}

#[tokio::test]
async fn same_number_resubmission_skips_the_gateway() {
    let test = TestProvider::new();
    let state = PhoneBindingState::EnterPhoneNumber {
        initial_phone_number: Some(number()),
        did_send: true,
        resend_counter: Some(2),
        data: sample_data(),
    };
    let next = state.accept(enter_number(), &test.provider).await.unwrap();
    assert_matches!(next, PhoneBindingState::EnterOtp { resend_counter: 2, .. });
    assert_eq!(test.gateway.register_calls(), 0);
}

#[tokio::test]
async fn exhausted_throttle_blocks_and_resets() {
    let test = TestProvider::new();
    let mut state = PhoneBindingState::initial(sample_data());
    // Force distinct numbers so the short-circuit never applies.
    for i in 0..5 {
        let event = PhoneBindingEvent::EnterPhoneNumber {
            phone_number: PhoneNumber::new(format!("+1555123000{i}")),
            channel: OtpChannel::Sms,
        };
        state = state.accept(event, &test.provider).await.unwrap();
        state = state
            .accept(PhoneBindingEvent::Back, &test.provider)
            .await
            .unwrap();
    }
    let blocked = state.accept(enter_number(), &test.provider).await.unwrap();
    assert_matches!(
        blocked,
        PhoneBindingState::Block {
            reason: BlockReason::BlockEnterPhoneNumber,
            until,
            ref data,
            ..
        } => {
            assert_eq!(until, test.clock.timestamp() + THROTTLE_BLOCK_TIME);
            assert_eq!(data.sending_throttle.attempts(), 0);
        }
    );
    // The blocked submission never reached the gateway.
    assert_eq!(test.gateway.register_calls(), 5);
}

#[tokio::test]
async fn every_broken_code_is_classified_exactly() {
    for code in BROKEN_GATEWAY_CODES {
        let test = TestProvider::new();
        test.gateway
            .fail_register_with(GatewayError::Coded { code });
        let next = PhoneBindingState::initial(sample_data())
            .accept(enter_number(), &test.provider)
            .await
            .unwrap();
        assert_matches!(next, PhoneBindingState::Broken { code: got } if got == code);
    }
}

#[tokio::test]
async fn cooldown_blocks_until_server_deadline() {
    let test = TestProvider::new();
    test.gateway.fail_register_with(GatewayError::Cooldown {
        cooldown: Duration::from_secs(120),
    });
    let next = PhoneBindingState::initial(sample_data())
        .accept(enter_number(), &test.provider)
        .await
        .unwrap();
    assert_matches!(
        next,
        PhoneBindingState::Block { reason: BlockReason::BlockEnterPhoneNumber, until, .. }
            if until == test.clock.timestamp() + Duration::from_secs(120)
    );
}

#[tokio::test]
async fn unknown_gateway_codes_propagate() {
    let test = TestProvider::new();
    test.gateway
        .fail_register_with(GatewayError::Coded { code: -31000 });
    let err = PhoneBindingState::initial(sample_data())
        .accept(enter_number(), &test.provider)
        .await
        .unwrap_err();
    assert_matches!(err, FlowError::Gateway(GatewayError::Coded { code: -31000 }));
}

#[tokio::test]
async fn otp_confirmation_finishes_with_metadata() {
    let test = TestProvider::new();
    let state = PhoneBindingState::EnterOtp {
        resend_counter: 0,
        channel: OtpChannel::Sms,
        phone_number: number(),
        data: sample_data(),
    };
    let next = state
        .accept(
            PhoneBindingEvent::EnterOtp {
                code: "123456".to_string(),
            },
            &test.provider,
        )
        .await
        .unwrap();
    assert_matches!(
        next,
        PhoneBindingState::Finish(PhoneBindingResult::Success { metadata, .. }) => {
            assert_eq!(metadata.email, "a@b.com");
            assert_eq!(metadata.phone_number, number());
        }
    );
    assert_eq!(test.gateway.confirm_calls(), 1);
}

#[tokio::test]
async fn wrong_otp_cooldown_blocks_with_enter_otp_reason() {
    let test = TestProvider::new();
    test.gateway.fail_confirm_with(GatewayError::Cooldown {
        cooldown: Duration::from_secs(60),
    });
    let state = PhoneBindingState::EnterOtp {
        resend_counter: 0,
        channel: OtpChannel::Sms,
        phone_number: number(),
        data: sample_data(),
    };
    let next = state
        .accept(
            PhoneBindingEvent::EnterOtp {
                code: "000000".to_string(),
            },
            &test.provider,
        )
        .await
        .unwrap();
    assert_matches!(
        next,
        PhoneBindingState::Block { reason: BlockReason::BlockEnterOtp, .. }
    );
}

#[tokio::test]
async fn resend_increments_counter_and_classifies_with_resend_reason() {
    let test = TestProvider::new();
    let state = PhoneBindingState::EnterOtp {
        resend_counter: 1,
        channel: OtpChannel::Sms,
        phone_number: number(),
        data: sample_data(),
    };
    let next = state
        .accept(PhoneBindingEvent::ResendOtp, &test.provider)
        .await
        .unwrap();
    assert_matches!(next, PhoneBindingState::EnterOtp { resend_counter: 2, .. });

    test.gateway.fail_register_with(GatewayError::Cooldown {
        cooldown: Duration::from_secs(30),
    });
    let blocked = state
        .accept(PhoneBindingEvent::ResendOtp, &test.provider)
        .await
        .unwrap();
    assert_matches!(
        blocked,
        PhoneBindingState::Block { reason: BlockReason::BlockResend, .. }
    );
}

#[tokio::test]
async fn block_finish_is_invalid_before_the_deadline() {
    let test = TestProvider::new();
    let until = test.clock.timestamp() + Duration::from_secs(300);
    let state = PhoneBindingState::Block {
        until,
        reason: BlockReason::BlockEnterPhoneNumber,
        phone_number: number(),
        data: sample_data(),
    };

    let err = state
        .accept(PhoneBindingEvent::BlockFinish, &test.provider)
        .await
        .unwrap_err();
    assert_matches!(err, FlowError::InvalidEvent { .. });

    test.clock.advance(Duration::from_secs(300));
    let next = state
        .accept(PhoneBindingEvent::BlockFinish, &test.provider)
        .await
        .unwrap();
    assert_matches!(
        next,
        PhoneBindingState::EnterPhoneNumber { did_send: false, ref data, .. } => {
            assert_eq!(data.sending_throttle.attempts(), 0);
        }
    );
}

#[tokio::test]
async fn block_home_aborts() {
    let test = TestProvider::new();
    let state = PhoneBindingState::Block {
        until: test.clock.timestamp(),
        reason: BlockReason::BlockEnterOtp,
        phone_number: number(),
        data: sample_data(),
    };
    let next = state
        .accept(PhoneBindingEvent::Home, &test.provider)
        .await
        .unwrap();
    assert_matches!(next, PhoneBindingState::Finish(PhoneBindingResult::BreakProcess));
}

#[tokio::test]
async fn broken_is_a_dead_end_except_back() {
    let test = TestProvider::new();
    let state = PhoneBindingState::Broken { code: -32700 };

    let err = state
        .accept(enter_number(), &test.provider)
        .await
        .unwrap_err();
    assert_matches!(err, FlowError::InvalidEvent { .. });

    let next = state
        .accept(PhoneBindingEvent::Back, &test.provider)
        .await
        .unwrap();
    assert_matches!(next, PhoneBindingState::Finish(PhoneBindingResult::BreakProcess));
}

#[tokio::test]
async fn broken_cannot_be_resumed() {
    let err =
        FlowInterpreter::resume(PhoneBindingState::Broken { code: -32052 }).unwrap_err();
    assert_matches!(err, FlowError::NotResumable { .. });
}

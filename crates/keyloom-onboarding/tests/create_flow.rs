//! End-to-end creation flow through the interpreter.

use assert_matches::assert_matches;
use keyloom_core::effects::{OtpChannel, PhoneNumber, SocialProvider};
use keyloom_core::{FlowInterpreter, FlowProgress};
use keyloom_onboarding::{
    CreateWalletEvent, CreateWalletResult, CreateWalletState, PhoneBindingEvent,
    SecuritySetupEvent, SocialSignInEvent,
};
use keyloom_testkit::TestProvider;

fn happy_path_events() -> Vec<CreateWalletEvent> {
    vec![
        CreateWalletEvent::SocialSignIn(SocialSignInEvent::SignIn(SocialProvider::Google)),
        CreateWalletEvent::SocialSignIn(SocialSignInEvent::SignInConfirm {
            token_id: "t1".to_string(),
            email: "a@b.com".to_string(),
            provider: SocialProvider::Google,
        }),
        CreateWalletEvent::BindingPhoneNumber(PhoneBindingEvent::EnterPhoneNumber {
            phone_number: PhoneNumber::new("+15551230000"),
            channel: OtpChannel::Sms,
        }),
        CreateWalletEvent::BindingPhoneNumber(PhoneBindingEvent::EnterOtp {
            code: "123456".to_string(),
        }),
        CreateWalletEvent::SecuritySetup(SecuritySetupEvent::SetPincode {
            pincode: "482916".to_string(),
        }),
        CreateWalletEvent::SecuritySetup(SecuritySetupEvent::ConfirmPincode {
            pincode: "482916".to_string(),
            with_biometry: true,
        }),
    ]
}

#[tokio::test]
async fn happy_path_produces_a_new_wallet() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(CreateWalletState::new("test-device"));

    for event in happy_path_events() {
        interpreter.send(event, &test.provider).await.unwrap();
    }

    assert_matches!(
        interpreter.current(),
        CreateWalletState::Finish(CreateWalletResult::NewWallet { wallet, pincode, with_biometry: true }) => {
            assert_eq!(pincode, "482916");
            assert_eq!(wallet.eth_public_key, "0xdead");
            assert_eq!(wallet.device_share.expose(), "d1");
            assert_eq!(wallet.custom_share.expose(), "c1");
            assert_eq!(wallet.metadata.device_name, "test-device");
            assert_eq!(wallet.metadata.email, "a@b.com");
            assert_eq!(wallet.metadata.phone_number, PhoneNumber::new("+15551230000"));
        }
    );

    // One OTP sent, one confirmed.
    assert_eq!(test.gateway.register_calls(), 1);
    assert_eq!(test.gateway.confirm_calls(), 1);
}

#[tokio::test]
async fn progress_is_monotone_across_phases() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(CreateWalletState::new("test-device"));

    let mut steps = vec![interpreter.current().step()];
    for event in happy_path_events() {
        let state = interpreter.send(event, &test.provider).await.unwrap();
        steps.push(state.step());
    }

    for pair in steps.windows(2) {
        assert!(pair[0] < pair[1], "step regressed: {} -> {}", pair[0], pair[1]);
    }
    assert_eq!(steps.last().copied(), Some(400));
}

#[tokio::test]
async fn subscribers_observe_every_accepted_transition() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(CreateWalletState::new("test-device"));
    let mut rx = interpreter.subscribe();

    let events = happy_path_events();
    let expected = events.len();
    for event in events {
        interpreter.send(event, &test.provider).await.unwrap();
    }

    let mut observed = Vec::new();
    while rx.has_changed().unwrap() {
        observed.push(rx.borrow_and_update().name());
    }
    // watch coalesces; at minimum the terminal state is visible.
    assert!(observed.len() <= expected);
    assert_eq!(interpreter.current().name(), "create_wallet.finish");
}

#[tokio::test]
async fn failed_transition_leaves_the_flow_where_it_was() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(CreateWalletState::new("test-device"));

    // Phone-binding event during sign-in is rejected, state stays put.
    let err = interpreter
        .send(
            CreateWalletEvent::BindingPhoneNumber(PhoneBindingEvent::ResendOtp),
            &test.provider,
        )
        .await
        .unwrap_err();
    assert_matches!(err, keyloom_core::FlowError::InvalidEvent { .. });
    assert_eq!(interpreter.current().name(), "create_wallet.social_sign_in");
    assert_eq!(test.gateway.register_calls(), 0);
}

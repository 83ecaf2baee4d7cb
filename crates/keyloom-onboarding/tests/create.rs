//! Create-wallet composite flow tests.

use assert_matches::assert_matches;
use keyloom_core::effects::SocialProvider;
use keyloom_core::{FlowError, FlowProgress, StateMachine};
use keyloom_onboarding::{
    CreateWalletEvent, CreateWalletResult, CreateWalletState, PhoneBindingEvent, PhoneBindingState,
    SecuritySetupEvent, SocialSignInEvent, SocialSignInState,
};
use keyloom_testkit::TestProvider;

#[tokio::test]
async fn wrong_phase_events_are_rejected() {
    let test = TestProvider::new();
    let state = CreateWalletState::new("test-device");

    let err = state
        .accept(
            CreateWalletEvent::SecuritySetup(SecuritySetupEvent::Back),
            &test.provider,
        )
        .await
        .unwrap_err();
    assert_matches!(err, FlowError::InvalidEvent { .. });

    let err = state
        .accept(
            CreateWalletEvent::BindingPhoneNumber(PhoneBindingEvent::ResendOtp),
            &test.provider,
        )
        .await
        .unwrap_err();
    assert_matches!(err, FlowError::InvalidEvent { .. });
}

#[tokio::test]
async fn sign_in_success_seeds_the_phone_leaf() {
    let test = TestProvider::new();
    let state = CreateWalletState::new("test-device")
        .accept(
            CreateWalletEvent::SocialSignIn(SocialSignInEvent::SignIn(SocialProvider::Google)),
            &test.provider,
        )
        .await
        .unwrap();
    // Non-terminal leaf state is re-wrapped.
    assert_matches!(
        state,
        CreateWalletState::SocialSignIn { ref device_name, inner: SocialSignInState::InProgress { .. } }
            if device_name == "test-device"
    );

    let state = state
        .accept(
            CreateWalletEvent::SocialSignIn(SocialSignInEvent::SignInConfirm {
                token_id: "t1".to_string(),
                email: "a@b.com".to_string(),
                provider: SocialProvider::Google,
            }),
            &test.provider,
        )
        .await
        .unwrap();
    assert_matches!(
        state,
        CreateWalletState::BindingPhoneNumber { device_share, inner, .. } => {
            assert_eq!(device_share.expose(), "d1");
            assert_matches!(
                inner,
                PhoneBindingState::EnterPhoneNumber {
                    initial_phone_number: None,
                    did_send: false,
                    resend_counter: None,
                    data,
                } => {
                    assert_eq!(data.email, "a@b.com");
                    assert_eq!(data.device_name, "test-device");
                    assert_eq!(data.eth_public_key, "0xdead");
                }
            );
        }
    );
}

#[tokio::test]
async fn sign_in_break_terminates_the_composite() {
    let test = TestProvider::new();
    let state = CreateWalletState::new("test-device")
        .accept(
            CreateWalletEvent::SocialSignIn(SocialSignInEvent::Back),
            &test.provider,
        )
        .await
        .unwrap();
    assert_matches!(
        state,
        CreateWalletState::Finish(CreateWalletResult::BreakProcess)
    );
}

#[test]
fn broken_phone_leaf_makes_the_composite_non_continuable() {
    let state = CreateWalletState::BindingPhoneNumber {
        device_share: keyloom_core::KeyShare::new("d1"),
        facade_metadata: "{}".to_string(),
        inner: PhoneBindingState::Broken { code: -32700 },
    };
    assert!(!state.continuable());
}

//! End-to-end restore flow, one scenario per entry point.

use assert_matches::assert_matches;
use keyloom_core::effects::{GatewayError, OtpChannel, PhoneNumber, SocialProvider};
use keyloom_core::{FlowInterpreter, FlowProgress};
use keyloom_onboarding::restore::{
    RestoreCustomEvent, RestoreCustomState, RestoreEntryEvent, RestoreSeedEvent,
    RestoreSocialEvent,
};
use keyloom_onboarding::{
    RestoreWalletEvent, RestoreWalletResult, RestoreWalletState, SecuritySetupEvent,
};
use keyloom_testkit::TestProvider;

async fn finish_security_setup(
    interpreter: &FlowInterpreter<RestoreWalletState>,
    test: &TestProvider,
) -> RestoreWalletState {
    interpreter
        .send(
            RestoreWalletEvent::SecuritySetup(SecuritySetupEvent::SetPincode {
                pincode: "482916".to_string(),
            }),
            &test.provider,
        )
        .await
        .unwrap();
    interpreter
        .send(
            RestoreWalletEvent::SecuritySetup(SecuritySetupEvent::ConfirmPincode {
                pincode: "482916".to_string(),
                with_biometry: false,
            }),
            &test.provider,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn backup_entry_point_restores_a_listed_wallet() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(RestoreWalletState::new("test-device"));

    interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::RestoreFromBackup),
            &test.provider,
        )
        .await
        .unwrap();
    interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::SelectBackup { index: 0 }),
            &test.provider,
        )
        .await
        .unwrap();

    let terminal = finish_security_setup(&interpreter, &test).await;
    assert_matches!(
        terminal,
        RestoreWalletState::Finish(RestoreWalletResult::Restored { wallet, .. }) => {
            assert_eq!(wallet.eth_public_key, "0xdead");
            assert!(wallet.device_share.is_none());
        }
    );
}

#[tokio::test]
async fn seed_entry_point_restores_from_entered_words() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(RestoreWalletState::new("test-device"));

    interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::StartSeed),
            &test.provider,
        )
        .await
        .unwrap();
    interpreter
        .send(
            RestoreWalletEvent::RestoreSeed(RestoreSeedEvent::EnterSeedPhrase {
                phrase: test.mnemonic_phrase(),
            }),
            &test.provider,
        )
        .await
        .unwrap();

    let terminal = finish_security_setup(&interpreter, &test).await;
    assert_matches!(
        terminal,
        RestoreWalletState::Finish(RestoreWalletResult::Restored { wallet, .. })
            if wallet.eth_public_key == "0xdead"
    );
}

#[tokio::test]
async fn custom_entry_point_recovers_with_both_shares() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(RestoreWalletState::new("test-device"));

    interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::StartCustom),
            &test.provider,
        )
        .await
        .unwrap();
    interpreter
        .send(
            RestoreWalletEvent::RestoreCustom(RestoreCustomEvent::EnterPhoneNumber {
                phone_number: PhoneNumber::new("+15551230000"),
                channel: OtpChannel::Sms,
            }),
            &test.provider,
        )
        .await
        .unwrap();
    assert_eq!(test.gateway.restore_calls(), 1);

    interpreter
        .send(
            RestoreWalletEvent::RestoreCustom(RestoreCustomEvent::EnterOtp {
                code: "123456".to_string(),
            }),
            &test.provider,
        )
        .await
        .unwrap();

    let terminal = finish_security_setup(&interpreter, &test).await;
    // Recovery combined the local device share with the released custom share.
    assert_matches!(
        terminal,
        RestoreWalletState::Finish(RestoreWalletResult::Restored { wallet, .. }) => {
            assert_eq!(wallet.eth_public_key, "0xdead");
            assert_eq!(wallet.device_share.as_ref().map(|s| s.expose()), Some("d1"));
        }
    );
}

#[tokio::test]
async fn social_entry_point_reconstructs_and_keeps_the_email() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(RestoreWalletState::new("test-device"));

    interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::StartSocial),
            &test.provider,
        )
        .await
        .unwrap();
    interpreter
        .send(
            RestoreWalletEvent::RestoreSocial(RestoreSocialEvent::SignIn(SocialProvider::Apple)),
            &test.provider,
        )
        .await
        .unwrap();

    let terminal = finish_security_setup(&interpreter, &test).await;
    assert_matches!(
        terminal,
        RestoreWalletState::Finish(RestoreWalletResult::Restored { wallet, .. })
            if wallet.email.as_deref() == Some("a@b.com")
    );
}

#[tokio::test]
async fn broken_custom_leaf_blocks_resume() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(RestoreWalletState::new("test-device"));

    interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::StartCustom),
            &test.provider,
        )
        .await
        .unwrap();
    test.gateway
        .fail_restore_with(GatewayError::Coded { code: -32603 });
    let state = interpreter
        .send(
            RestoreWalletEvent::RestoreCustom(RestoreCustomEvent::EnterPhoneNumber {
                phone_number: PhoneNumber::new("+15551230000"),
                channel: OtpChannel::Sms,
            }),
            &test.provider,
        )
        .await
        .unwrap();

    assert_matches!(
        state,
        RestoreWalletState::RestoreCustom { ref inner, .. }
            if matches!(inner, RestoreCustomState::Broken { code: -32603 })
    );
    assert!(!state.continuable());
    assert_matches!(
        FlowInterpreter::resume(state).unwrap_err(),
        keyloom_core::FlowError::NotResumable { .. }
    );
}

#[tokio::test]
async fn abandoned_entry_point_returns_to_selection() {
    let test = TestProvider::new();
    let interpreter = FlowInterpreter::new(RestoreWalletState::new("test-device"));

    interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::StartSeed),
            &test.provider,
        )
        .await
        .unwrap();
    let state = interpreter
        .send(
            RestoreWalletEvent::RestoreSeed(RestoreSeedEvent::Back),
            &test.provider,
        )
        .await
        .unwrap();
    assert_eq!(state.name(), "restore_wallet.restore");

    // The flow is still alive: another entry point can be started.
    let state = interpreter
        .send(
            RestoreWalletEvent::Restore(RestoreEntryEvent::StartSocial),
            &test.provider,
        )
        .await
        .unwrap();
    assert_eq!(state.name(), "restore_wallet.restore_social");
}

//! Seed-phrase restore leaf tests.

use assert_matches::assert_matches;
use keyloom_core::effects::MnemonicError;
use keyloom_core::{FlowError, StateMachine};
use keyloom_onboarding::restore::{RestoreSeedEvent, RestoreSeedResult, RestoreSeedState};
use keyloom_testkit::TestProvider;

#[tokio::test]
async fn valid_phrase_derives_wallet() {
    let test = TestProvider::new();
    let next = RestoreSeedState::EnterSeed
        .accept(
            RestoreSeedEvent::EnterSeedPhrase {
                phrase: test.mnemonic_phrase(),
            },
            &test.provider,
        )
        .await
        .unwrap();
    assert_matches!(
        next,
        RestoreSeedState::Finish(RestoreSeedResult::Success { eth_public_key, .. })
            if eth_public_key == "0xdead"
    );
}

#[tokio::test]
async fn invalid_phrase_propagates_and_state_stays() {
    let test = TestProvider::new();
    let err = RestoreSeedState::EnterSeed
        .accept(
            RestoreSeedEvent::EnterSeedPhrase {
                phrase: "definitely not twelve valid words".to_string(),
            },
            &test.provider,
        )
        .await
        .unwrap_err();
    assert_matches!(err, FlowError::Mnemonic(MnemonicError::InvalidPhrase { .. }));
}

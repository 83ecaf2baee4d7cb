//! Pre-wired provider bundle for flow tests.

use crate::clock::FixedClock;
use crate::mocks::{
    MemoryBackupStore, MockThresholdFacade, RecordingGateway, StaticAuthService, StaticMnemonic,
    StaticSigner, TEST_PHRASE,
};
use keyloom_onboarding::OnboardingProvider;
use std::sync::Arc;

/// A full [`OnboardingProvider`] backed by mocks, with handles kept on the
/// side so tests can inject failures and advance the clock.
pub struct TestProvider {
    /// The provider to hand to `accept`.
    pub provider: OnboardingProvider,
    /// Auth service handle.
    pub auth: Arc<StaticAuthService>,
    /// Facade handle, for failure injection.
    pub facade: Arc<MockThresholdFacade>,
    /// Gateway handle, for call counts and failure injection.
    pub gateway: Arc<RecordingGateway>,
    /// Clock handle, for advancing time.
    pub clock: Arc<FixedClock>,
    /// Backup store handle.
    pub backup: Arc<MemoryBackupStore>,
}

impl TestProvider {
    /// A fresh bundle with all mocks in their default state.
    pub fn new() -> Self {
        let auth = Arc::new(StaticAuthService);
        let facade = Arc::new(MockThresholdFacade::default());
        let gateway = Arc::new(RecordingGateway::default());
        let clock = Arc::new(FixedClock::default());
        let backup = Arc::new(MemoryBackupStore::default());
        let provider = OnboardingProvider {
            auth: auth.clone(),
            facade: facade.clone(),
            gateway: gateway.clone(),
            clock: clock.clone(),
            mnemonic: Arc::new(StaticMnemonic),
            signer: Arc::new(StaticSigner),
            backup: backup.clone(),
        };
        Self {
            provider,
            auth,
            facade,
            gateway,
            clock,
            backup,
        }
    }

    /// The valid mnemonic every mock hands out.
    pub fn mnemonic_phrase(&self) -> String {
        TEST_PHRASE.to_string()
    }
}

impl Default for TestProvider {
    fn default() -> Self {
        Self::new()
    }
}

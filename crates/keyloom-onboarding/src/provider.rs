//! Provider capability bundle for the onboarding flows.

use keyloom_core::effects::{
    AuthServiceEffects, BackupStoreEffects, ClockEffects, GatewayEffects, MnemonicEffects,
    PayloadSignerEffects, ThresholdFacadeEffects,
};
use std::sync::Arc;

/// The capabilities a transition may call out to.
///
/// Stateless from the engine's perspective: handlers are shared trait
/// objects, injected per transition call, and the flows hold no reference to
/// them between transitions.
#[derive(Clone)]
pub struct OnboardingProvider {
    /// Social identity provider sign-in.
    pub auth: Arc<dyn AuthServiceEffects>,
    /// Threshold-signature facade.
    pub facade: Arc<dyn ThresholdFacadeEffects>,
    /// Backend API gateway.
    pub gateway: Arc<dyn GatewayEffects>,
    /// Wall clock.
    pub clock: Arc<dyn ClockEffects>,
    /// Mnemonic generation and validation.
    pub mnemonic: Arc<dyn MnemonicEffects>,
    /// Gateway payload signer.
    pub signer: Arc<dyn PayloadSignerEffects>,
    /// Device/cloud backup store.
    pub backup: Arc<dyn BackupStoreEffects>,
}

//! Provider capability trait definitions.
//!
//! These traits are the only doorway between a flow transition and the
//! outside world. Production handlers live in `keyloom-effects`; mock
//! handlers live in `keyloom-testkit`. A flow receives them bundled in a
//! provider value injected per transition call.

pub mod auth;
pub mod backup;
pub mod clock;
pub mod facade;
pub mod gateway;
pub mod mnemonic;
pub mod signer;

pub use auth::{AuthCredential, AuthError, AuthServiceEffects, SocialProvider};
pub use backup::{BackupError, BackupStoreEffects, WalletBackup};
pub use clock::ClockEffects;
pub use facade::{
    FacadeError, SignInOutcome, SignUpOutcome, ThresholdFacadeEffects, TorusKey,
    ACCOUNT_ALREADY_USED, IDENTITY_NOT_PROVISIONED,
};
pub use gateway::{
    is_broken_code, ConfirmRegisterWalletRequest, ConfirmRestoreWalletRequest, GatewayEffects,
    GatewayError, OtpChannel, PhoneNumber, RegisterWalletRequest, RestoreWalletRequest,
    RestoredWalletPayload, BROKEN_GATEWAY_CODES,
};
pub use mnemonic::{MnemonicEffects, MnemonicError};
pub use signer::{PayloadSignerEffects, SignerError};

//! Unified flow error taxonomy.
//!
//! Classification happens at the leaf boundary: recoverable outcomes become
//! *states* (`Block`, `Broken`, `AccountAlreadyUsed`), never errors. What
//! remains here is either a caller bug (`InvalidEvent`, `NotResumable`) or
//! an unclassified provider failure that terminates the transition with the
//! state unchanged.

use crate::effects::{AuthError, BackupError, FacadeError, GatewayError, MnemonicError, SignerError};
use serde::{Deserialize, Serialize};

/// Error produced by a flow transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FlowError {
    /// The event is not legal in the current state. Always a caller/UI
    /// contract bug, never shown to the end user.
    #[error("event `{event}` is not valid in state `{state}`")]
    InvalidEvent {
        /// Name of the rejecting state.
        state: String,
        /// Name of the rejected event.
        event: String,
    },

    /// Attempted to resume a flow from a state that is not continuable.
    #[error("state `{state}` is not continuable and cannot be resumed")]
    NotResumable {
        /// Name of the non-continuable state.
        state: String,
    },

    /// Unclassified auth-service failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Unclassified threshold-facade failure.
    #[error(transparent)]
    Facade(#[from] FacadeError),

    /// Unclassified gateway failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Mnemonic generation or validation failure.
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    /// Payload signing failure.
    #[error(transparent)]
    Signer(#[from] SignerError),

    /// Backup store failure.
    #[error(transparent)]
    Backup(#[from] BackupError),
}

impl FlowError {
    /// Reject an event as illegal for the current state, logging the
    /// violation for production diagnosis.
    pub fn invalid_event(state: &'static str, event: &'static str) -> Self {
        tracing::warn!(state, event, "event not valid in current state");
        Self::InvalidEvent {
            state: state.to_string(),
            event: event.to_string(),
        }
    }

    /// Refuse to resume from a non-continuable state.
    pub fn not_resumable(state: &'static str) -> Self {
        Self::NotResumable {
            state: state.to_string(),
        }
    }
}

/// Standard result type for flow transitions.
pub type FlowResult<T> = std::result::Result<T, FlowError>;

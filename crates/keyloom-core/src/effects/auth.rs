//! Social/OAuth sign-in capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported social identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialProvider {
    /// Sign in with Apple.
    Apple,
    /// Sign in with Google.
    Google,
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apple => f.write_str("apple"),
            Self::Google => f.write_str("google"),
        }
    }
}

/// Identity token obtained from a successful social sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCredential {
    /// Provider-issued identity token.
    pub token_id: String,
    /// Email address attached to the identity.
    pub email: String,
}

/// Errors surfaced by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AuthError {
    /// The user dismissed the provider's sign-in sheet.
    #[error("sign-in cancelled by user")]
    Cancelled,
    /// The provider rejected the sign-in attempt.
    #[error("auth provider error: {message}")]
    Provider {
        /// Provider-supplied failure description.
        message: String,
    },
    /// The provider could not be reached.
    #[error("auth network error: {message}")]
    Network {
        /// Transport failure description.
        message: String,
    },
}

/// Capability: authenticate against a social identity provider.
#[async_trait]
pub trait AuthServiceEffects: Send + Sync {
    /// Run the provider's sign-in and return the issued credential.
    async fn auth(&self, provider: SocialProvider) -> Result<AuthCredential, AuthError>;
}

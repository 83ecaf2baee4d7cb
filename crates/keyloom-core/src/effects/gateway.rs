//! Backend API-gateway capability.
//!
//! The gateway issues and verifies phone OTPs and escrows the custom share.
//! Its failure surface is three-way: a fixed set of internal codes that mean
//! the attempt is unrecoverable, an explicit cooldown carrying a duration,
//! and transport noise. The phone flows classify the first two into states;
//! everything else propagates.

use crate::secret::KeyShare;
use crate::time::Timestamp;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Gateway-internal error codes that end the current attempt for good.
pub const BROKEN_GATEWAY_CODES: [i64; 7] = [
    -32058, -32700, -32600, -32601, -32602, -32603, -32052,
];

/// Whether `code` is one of the enumerated unrecoverable gateway codes.
pub fn is_broken_code(code: i64) -> bool {
    BROKEN_GATEWAY_CODES.contains(&code)
}

/// Delivery channel for one-time passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpChannel {
    /// Text message.
    Sms,
    /// Voice call.
    Call,
}

/// An E.164-ish phone number, treated as opaque by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Wrap a phone number string.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// The number as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request to bind a phone number to a freshly created wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWalletRequest {
    /// Signature over the request payload by the wallet's derived key.
    pub signature: Vec<u8>,
    /// Ethereum address being registered.
    pub eth_address: String,
    /// Number the OTP should be delivered to.
    pub phone: PhoneNumber,
    /// Delivery channel.
    pub channel: OtpChannel,
    /// Client timestamp for replay protection.
    pub timestamp: Timestamp,
}

/// Request to confirm a wallet registration with the received OTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRegisterWalletRequest {
    /// Signature over the request payload by the wallet's derived key.
    pub signature: Vec<u8>,
    /// Ethereum address being registered.
    pub eth_address: String,
    /// Number the OTP was delivered to.
    pub phone: PhoneNumber,
    /// The one-time password as entered.
    pub otp_code: String,
    /// Client timestamp for replay protection.
    pub timestamp: Timestamp,
}

/// Request to start a phone-based restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreWalletRequest {
    /// Number the OTP should be delivered to.
    pub phone: PhoneNumber,
    /// Delivery channel.
    pub channel: OtpChannel,
    /// Client timestamp for replay protection.
    pub timestamp: Timestamp,
}

/// Request to confirm a phone-based restore with the received OTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRestoreWalletRequest {
    /// Number the OTP was delivered to.
    pub phone: PhoneNumber,
    /// The one-time password as entered.
    pub otp_code: String,
    /// Client timestamp for replay protection.
    pub timestamp: Timestamp,
}

/// Escrowed material released after a confirmed restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoredWalletPayload {
    /// The custom share escrowed behind the phone number.
    pub custom_share: KeyShare,
    /// Opaque facade metadata blob stored at registration time.
    pub metadata: String,
}

/// Errors surfaced by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum GatewayError {
    /// A gateway-internal coded failure.
    #[error("gateway error {code}")]
    Coded {
        /// Gateway-defined error code.
        code: i64,
    },
    /// The gateway demands a wait before the operation may be retried.
    #[error("gateway cooldown, retry after {cooldown:?}")]
    Cooldown {
        /// Server-supplied minimum wait.
        cooldown: Duration,
    },
    /// The gateway could not be reached.
    #[error("gateway transport error: {message}")]
    Transport {
        /// Transport failure description.
        message: String,
    },
}

/// Capability: the backend API gateway's wallet registration surface.
#[async_trait]
pub trait GatewayEffects: Send + Sync {
    /// Request OTP delivery for a new wallet registration.
    async fn register_wallet(&self, request: RegisterWalletRequest) -> Result<(), GatewayError>;

    /// Confirm a registration with the received OTP.
    async fn confirm_register_wallet(
        &self,
        request: ConfirmRegisterWalletRequest,
    ) -> Result<(), GatewayError>;

    /// Request OTP delivery for a phone-based restore.
    async fn restore_wallet(&self, request: RestoreWalletRequest) -> Result<(), GatewayError>;

    /// Confirm a restore with the received OTP, releasing escrowed material.
    async fn confirm_restore_wallet(
        &self,
        request: ConfirmRestoreWalletRequest,
    ) -> Result<RestoredWalletPayload, GatewayError>;
}

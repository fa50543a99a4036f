//! Token error types.
//!
//! This module defines errors that can occur during token issuance and
//! verification.

use thiserror::Error;

/// Token issuance and verification errors.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TokenError {
    /// Bad input to issuance — empty subject, username, or email.
    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    /// Signing key is missing or below the minimum length threshold.
    ///
    /// Fatal at startup: continuing without a usable key would silently
    /// disable the signature guarantee.
    #[error("Key configuration error: {0}")]
    KeyConfiguration(String),

    /// Malformed token — cannot be decoded.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Required claim is missing or empty.
    #[error("Missing claim: {0}")]
    MissingClaim(String),

    /// Algorithm declared in the token header is not in the allowed list.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature verification failed under every configured key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token's issued-at claim lies in the future beyond the leeway window.
    #[error("Token not yet valid")]
    NotYetValid,
}

impl TokenError {
    /// Creates an [`TokenError::InvalidClaim`] error.
    pub fn invalid_claim(message: impl Into<String>) -> Self {
        Self::InvalidClaim(message.into())
    }

    /// Creates a [`TokenError::KeyConfiguration`] error.
    pub fn key_configuration(message: impl Into<String>) -> Self {
        Self::KeyConfiguration(message.into())
    }

    /// Creates a [`TokenError::MalformedToken`] error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedToken(message.into())
    }

    /// Creates a [`TokenError::MissingClaim`] error naming the absent claim.
    pub fn missing_claim(claim: impl Into<String>) -> Self {
        Self::MissingClaim(claim.into())
    }

    /// Creates an [`TokenError::UnsupportedAlgorithm`] error.
    pub fn unsupported_algorithm(message: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm(message.into())
    }
}

/// Result type alias for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;

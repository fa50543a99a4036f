//! Token algorithm validation.
//!
//! This module provides security checks for the algorithm declared in a
//! token header, ensuring only the configured scheme is accepted.
//!
//! # Security
//!
//! These validators implement security best practices:
//! - Strict algorithm checks to prevent algorithm substitution attacks
//! - The `none` algorithm is always rejected
//! - Only HS256 is accepted — the signing key never leaves the issuing
//!   service, so the symmetric scheme is the configured one

use crate::error::TokenError;

/// Forbidden token algorithms that are never accepted for security reasons.
///
/// `none` means "no signature verification" and is trivially bypassable: a
/// token declaring it would be accepted without any cryptographic check.
pub const FORBIDDEN_ALGORITHMS: &[&str] = &["none"];

/// Accepted token algorithms.
///
/// Currently only HS256 (HMAC-SHA256) is supported end-to-end. The
/// verification pipeline in [`crate::provider::TokenProvider`] only holds
/// symmetric [`crate::signer::Hs256Signer`] keys.
///
/// Per RFC 8725 Section 3.1, validators must reject algorithms they do not
/// fully implement — listing another algorithm here without verification
/// support would produce confusing errors at the signature check stage.
pub const ACCEPTED_ALGORITHMS: &[&str] = &["HS256"];

/// Validate a declared token algorithm against the configured policy.
///
/// Rejecting here, before any signature computation, means a token whose
/// header claims a different (or absent) scheme never reaches the verifier.
///
/// # Errors
///
/// Returns [`TokenError::UnsupportedAlgorithm`] if:
/// - Algorithm is `none`
/// - Algorithm is not in [`ACCEPTED_ALGORITHMS`]
///
/// # Examples
///
/// ```
/// use keygate_tokens::validation::validate_algorithm;
///
/// assert!(validate_algorithm("HS256").is_ok());
/// assert!(validate_algorithm("none").is_err());
/// assert!(validate_algorithm("RS256").is_err());
/// ```
pub fn validate_algorithm(alg: &str) -> Result<(), TokenError> {
    if FORBIDDEN_ALGORITHMS.contains(&alg) {
        return Err(TokenError::unsupported_algorithm(format!(
            "Algorithm '{alg}' is not allowed for security reasons"
        )));
    }

    if !ACCEPTED_ALGORITHMS.contains(&alg) {
        return Err(TokenError::unsupported_algorithm(format!(
            "Algorithm '{alg}' is not in accepted list (only HS256 is supported)"
        )));
    }

    Ok(())
}

//! # Keygate Tokens
//!
//! Stateless signed identity tokens for API authentication.
//!
//! This crate provides:
//! - **Token issuance**: access and refresh tokens carrying identity claims, signed with
//!   HMAC-SHA256
//! - **Token verification**: signature integrity and expiration checks before any claim is trusted
//! - **Key rotation**: tokens signed under recently retired keys verify during a grace window
//!
//! ## Design
//!
//! - Tokens are self-contained (signature + embedded expiration); there is no server-side session
//!   store
//! - Syntactic decoding is separated from cryptographic verification, so malformed input is
//!   rejected before any signature work
//! - Claim accessors operate on a [`VerifiedClaims`] handle that only a successful verification
//!   can produce
//! - Signature comparison is constant-time; the `none` algorithm and anything other than the
//!   configured scheme are rejected outright
//!
//! ## Example
//!
//! ```
//! use keygate_tokens::{TokenConfig, TokenProvider};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TokenConfig::with_key("an-example-32-byte-signing-key!!");
//! let provider = TokenProvider::new(config)?;
//!
//! let token = provider.generate_access_token(
//!     "4e8e52a3-9d27-4a3e-b7c2-0f6f2f1f9a11",
//!     "ada",
//!     "ada@example.com",
//! )?;
//!
//! assert!(provider.validate_token(&token));
//! let claims = provider.verify(&token)?;
//! println!("Authenticated: {}", claims.username());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Token claims and token types.
pub mod claims;
/// Wall-clock abstraction.
pub mod clock;
/// Wire-format encoding and decoding.
pub mod codec;
/// Provider configuration.
pub mod config;
/// Token error types.
pub mod error;
/// Token issuance and verification.
pub mod provider;
/// HMAC-SHA256 signing and verification.
pub mod signer;
/// Test helpers (feature-gated).
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
/// Algorithm validation.
pub mod validation;

// Re-export key types for convenience
pub use claims::{ClaimSet, TokenType};
pub use clock::{Clock, SystemClock};
pub use config::TokenConfig;
pub use error::{Result, TokenError};
pub use provider::{MAX_RETIRED_KEYS, TokenProvider, VerifiedClaims};
pub use validation::{ACCEPTED_ALGORITHMS, FORBIDDEN_ALGORITHMS, validate_algorithm};

//! Shared test utilities for token testing.
//!
//! This module provides common helpers for building providers with known
//! keys, pinning the clock, and crafting raw token strings (for attack
//! testing). It is feature-gated behind `testutil` to prevent leaking into
//! production builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! keygate-tokens = { path = "../tokens", features = ["testutil"] }
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{clock::Clock, config::TokenConfig, provider::TokenProvider};

/// A well-known 32-byte signing key for tests.
pub const TEST_KEY: &str = "test-signing-key-0123456789abcdef";

/// A second, unrelated 32-byte key for cross-key tests.
pub const OTHER_TEST_KEY: &str = "other-signing-key-9876543210fedcb";

/// Clock pinned to a settable instant.
///
/// Starts at the given Unix timestamp and only moves when the test advances
/// it, making expiration deterministic.
#[derive(Debug)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    /// Creates a clock reading `now` seconds since the epoch.
    #[must_use]
    pub fn at(now: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(now)))
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_unix(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Builds a provider with [`TEST_KEY`] and default policy.
///
/// # Panics
///
/// Panics if construction fails (it cannot with a valid key).
#[must_use]
pub fn test_provider() -> TokenProvider {
    TokenProvider::new(TokenConfig::with_key(TEST_KEY)).expect("test key is valid")
}

/// Builds a provider with [`TEST_KEY`] and the given fixed clock.
///
/// # Panics
///
/// Panics if construction fails (it cannot with a valid key).
#[must_use]
pub fn test_provider_at(clock: Arc<FixedClock>) -> TokenProvider {
    TokenProvider::with_clock(TokenConfig::with_key(TEST_KEY), clock).expect("test key is valid")
}

/// Creates a raw token string from arbitrary header and payload JSON.
///
/// The resulting token has the structure `{header_b64}.{payload_b64}.{sig_b64}`
/// with the given (typically bogus) signature bytes. This is useful for
/// testing rejection of malformed or attack tokens (e.g. `alg: "none"`,
/// forged payloads).
///
/// # Panics
///
/// Panics if JSON serialization fails.
pub fn craft_raw_token(
    header_json: &serde_json::Value,
    payload_json: &serde_json::Value,
    signature: &[u8],
) -> String {
    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(header_json).expect("header json"));
    let payload_b64 =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload_json).expect("payload json"));
    let sig_b64 = URL_SAFE_NO_PAD.encode(signature);
    format!("{header_b64}.{payload_b64}.{sig_b64}")
}

/// Asserts that a `Result<T, TokenError>` is an `Err` matching the given
/// [`TokenError`](crate::error::TokenError) variant.
///
/// On failure, prints the expected variant and the actual result.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use keygate_tokens::{assert_token_error, error::TokenError};
///
/// let result: Result<(), TokenError> = Err(TokenError::TokenExpired);
/// assert_token_error!(result, TokenExpired);
/// ```
#[macro_export]
macro_rules! assert_token_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::error::TokenError::$variant { .. })),
            "expected TokenError::{}, got: {:?}",
            stringify!($variant),
            $result,
        );
    };
    ($result:expr, $variant:ident, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::TokenError::$variant { .. })),
            "{}: expected TokenError::{}, got: {:?}",
            $msg,
            stringify!($variant),
            $result,
        );
    };
}

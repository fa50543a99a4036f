//! Token provider configuration.
//!
//! The signing key and lifetime policy are explicit configuration passed
//! into [`TokenProvider::new`](crate::provider::TokenProvider::new) at
//! construction — loaded once at startup, immutable thereafter. There is no
//! global key state.

use serde::Deserialize;

/// Default access token lifetime (15 minutes).
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 900;

/// Default refresh token lifetime (7 days).
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 7 * 24 * 3600;

/// Default clock-skew leeway (30 seconds).
///
/// Verification tolerates this much skew when comparing `now` against
/// `exp` and `iat`, avoiding false rejections across distributed callers
/// with unsynchronized clocks.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Configuration for a [`TokenProvider`](crate::provider::TokenProvider).
///
/// Deserializable from any serde-compatible config source. All policy
/// fields carry defaults; only `signing_key` must be supplied, and the
/// provider constructor rejects keys below the minimum length
/// ([`MIN_KEY_LEN`](crate::signer::MIN_KEY_LEN) bytes).
#[derive(Clone, Deserialize)]
pub struct TokenConfig {
    /// Raw signing key material. Never logged.
    pub signing_key: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: u64,
    /// Clock-skew leeway in seconds, applied to `exp` and `iat` checks.
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

fn default_access_ttl() -> u64 {
    DEFAULT_ACCESS_TTL_SECS
}

fn default_refresh_ttl() -> u64 {
    DEFAULT_REFRESH_TTL_SECS
}

fn default_leeway() -> u64 {
    DEFAULT_LEEWAY_SECS
}

impl TokenConfig {
    /// Builds a config with the given key and default lifetimes.
    #[must_use]
    pub fn with_key(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material must never appear in logs or debug output.
        f.debug_struct("TokenConfig")
            .field("signing_key", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

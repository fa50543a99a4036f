//! Token claims: the identity facts embedded in a signed token.
//!
//! A [`ClaimSet`] is built once at issuance and never mutated afterwards.
//! Timestamps are computed internally from the injected clock so callers
//! can never forge an expiration.

use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    error::{Result, TokenError},
};

/// Distinguishes short-lived access tokens from long-lived refresh tokens.
///
/// Carried in the `typ` payload claim so a refresh token presented where an
/// access token is expected (or vice versa) can be rejected downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential authorizing individual API calls.
    Access,
    /// Long-lived credential used to obtain new access tokens.
    Refresh,
}

impl TokenType {
    /// Wire-format string for this token type (`"access"` / `"refresh"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// The claims carried inside a token.
///
/// Payload structure on the wire:
///
/// ```json
/// {
///   "email": "ada@example.com",
///   "exp": 1234568790,
///   "iat": 1234567890,
///   "sub": "4e8e52a3-9d27-4a3e-b7c2-0f6f2f1f9a11",
///   "typ": "access",
///   "username": "ada"
/// }
/// ```
///
/// Fields are declared in lexicographic key order; `serde_json` serializes
/// struct fields in declaration order, so the same claims always produce the
/// same bytes. Signature verification depends on this determinism.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Contact address. Not validated for RFC-correctness here.
    email: String,
    /// Expiration time (seconds since epoch). Always greater than `iat`.
    exp: u64,
    /// Issued at (seconds since epoch).
    iat: u64,
    /// Subject — unique user identifier (typically a UUID).
    sub: String,
    /// Token type (`access` / `refresh`).
    typ: TokenType,
    /// Display handle.
    username: String,
}

impl ClaimSet {
    /// Builds a claim set for a fresh token.
    ///
    /// `iat` is read from `clock` and `exp` is derived as `iat + ttl_secs`;
    /// callers never supply timestamps. `ttl_secs` must be non-zero so the
    /// `exp > iat` invariant holds.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidClaim`] if `sub`, `username`, or `email`
    /// is empty, or if `ttl_secs` is zero.
    pub fn new(
        sub: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        typ: TokenType,
        ttl_secs: u64,
        clock: &dyn Clock,
    ) -> Result<Self> {
        let sub = sub.into();
        let username = username.into();
        let email = email.into();

        if sub.is_empty() {
            return Err(TokenError::invalid_claim("subject must not be empty"));
        }
        if username.is_empty() {
            return Err(TokenError::invalid_claim("username must not be empty"));
        }
        if email.is_empty() {
            return Err(TokenError::invalid_claim("email must not be empty"));
        }
        if ttl_secs == 0 {
            return Err(TokenError::invalid_claim("token lifetime must be non-zero"));
        }

        let iat = clock.now_unix();
        let exp = iat.saturating_add(ttl_secs);

        Ok(Self { email, exp, iat, sub, typ, username })
    }

    /// Subject — the unique user identifier.
    #[must_use]
    pub fn sub(&self) -> &str {
        &self.sub
    }

    /// Display handle.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Token type.
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.typ
    }

    /// Issued-at timestamp (seconds since epoch).
    #[must_use]
    pub fn issued_at(&self) -> u64 {
        self.iat
    }

    /// Expiration timestamp (seconds since epoch).
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.exp
    }

    /// Checks that the required identity claims are present and non-empty.
    ///
    /// Used by the codec after deserializing an untrusted payload: serde
    /// guarantees the fields exist, but empty strings still need rejecting.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingClaim`] naming the first empty claim.
    pub fn check_required(&self) -> Result<()> {
        if self.sub.is_empty() {
            return Err(TokenError::missing_claim("sub"));
        }
        if self.username.is_empty() {
            return Err(TokenError::missing_claim("username"));
        }
        if self.email.is_empty() {
            return Err(TokenError::missing_claim("email"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;

    /// Clock pinned to a known instant for deterministic timestamps.
    struct TestClock(u64);

    impl Clock for TestClock {
        fn now_unix(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_new_computes_timestamps() {
        let clock = TestClock(1_700_000_000);
        let claims =
            ClaimSet::new("user-1", "ada", "ada@example.com", TokenType::Access, 900, &clock)
                .unwrap();

        assert_eq!(claims.issued_at(), 1_700_000_000);
        assert_eq!(claims.expires_at(), 1_700_000_900);
        assert!(claims.expires_at() > claims.issued_at());
    }

    #[test]
    fn test_new_rejects_empty_subject() {
        let clock = SystemClock;
        let result = ClaimSet::new("", "ada", "ada@example.com", TokenType::Access, 900, &clock);
        assert!(matches!(result, Err(TokenError::InvalidClaim(_))));
    }

    #[test]
    fn test_new_rejects_empty_username() {
        let clock = SystemClock;
        let result = ClaimSet::new("user-1", "", "ada@example.com", TokenType::Access, 900, &clock);
        assert!(matches!(result, Err(TokenError::InvalidClaim(_))));
    }

    #[test]
    fn test_new_rejects_empty_email() {
        let clock = SystemClock;
        let result = ClaimSet::new("user-1", "ada", "", TokenType::Refresh, 900, &clock);
        assert!(matches!(result, Err(TokenError::InvalidClaim(_))));
    }

    #[test]
    fn test_new_rejects_zero_ttl() {
        let clock = SystemClock;
        let result =
            ClaimSet::new("user-1", "ada", "ada@example.com", TokenType::Access, 0, &clock);
        assert!(matches!(result, Err(TokenError::InvalidClaim(_))));
    }

    #[test]
    fn test_token_type_wire_strings() {
        assert_eq!(TokenType::Access.as_str(), "access");
        assert_eq!(TokenType::Refresh.as_str(), "refresh");

        assert_eq!(serde_json::to_string(&TokenType::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
    }

    #[test]
    fn test_serialization_is_key_sorted() {
        let clock = TestClock(1_700_000_000);
        let claims =
            ClaimSet::new("user-1", "ada", "ada@example.com", TokenType::Access, 900, &clock)
                .unwrap();

        let json = serde_json::to_string(&claims).unwrap();
        let key_positions: Vec<usize> = ["\"email\"", "\"exp\"", "\"iat\"", "\"sub\"", "\"typ\"", "\"username\""]
            .iter()
            .map(|k| json.find(*k).expect("key present"))
            .collect();
        assert!(key_positions.windows(2).all(|w| w[0] < w[1]), "keys must be emitted sorted: {json}");
    }

    #[test]
    fn test_check_required_rejects_empty_fields() {
        let payload = r#"{"email":"","exp":2000000000,"iat":1000000000,"sub":"u","typ":"access","username":"ada"}"#;
        let claims: ClaimSet = serde_json::from_str(payload).unwrap();
        assert!(matches!(claims.check_required(), Err(TokenError::MissingClaim(c)) if c == "email"));
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        /// Strategy for valid, non-empty identity triples.
        fn arb_identity() -> impl Strategy<Value = (String, String, String)> {
            ("[a-zA-Z0-9-]{1,36}", "[a-zA-Z0-9_.]{1,32}", "[a-z0-9.@+-]{3,64}")
        }

        proptest! {
            /// Serializing then deserializing any valid claim set must
            /// produce an identical struct.
            #[test]
            fn claim_set_serde_round_trip(
                (sub, username, email) in arb_identity(),
                now in 1_000_000_000u64..2_000_000_000u64,
                ttl in 1u64..100_000_000u64,
            ) {
                let clock = TestClock(now);
                let claims = ClaimSet::new(&sub, &username, &email, TokenType::Access, ttl, &clock)
                    .expect("valid inputs");
                let json = serde_json::to_string(&claims).expect("serialize should succeed");
                let deserialized: ClaimSet =
                    serde_json::from_str(&json).expect("deserialize should succeed");
                prop_assert_eq!(deserialized, claims);
            }

            /// Serialization must be deterministic: the same claims always
            /// produce the same bytes.
            #[test]
            fn claim_set_serialization_deterministic(
                (sub, username, email) in arb_identity(),
                now in 1_000_000_000u64..2_000_000_000u64,
            ) {
                let clock = TestClock(now);
                let claims = ClaimSet::new(&sub, &username, &email, TokenType::Refresh, 900, &clock)
                    .expect("valid inputs");
                let a = serde_json::to_vec(&claims).expect("serialize");
                let b = serde_json::to_vec(&claims).expect("serialize");
                prop_assert_eq!(a, b);
            }

            /// `exp > iat` must hold for every constructible claim set.
            #[test]
            fn exp_always_after_iat(
                (sub, username, email) in arb_identity(),
                now in 0u64..2_000_000_000u64,
                ttl in 1u64..100_000_000u64,
            ) {
                let clock = TestClock(now);
                let claims = ClaimSet::new(&sub, &username, &email, TokenType::Access, ttl, &clock)
                    .expect("valid inputs");
                prop_assert!(claims.expires_at() > claims.issued_at());
            }
        }
    }
}

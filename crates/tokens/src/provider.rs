//! The token provider: issuance and verification of signed identity tokens.
//!
//! [`TokenProvider`] composes the claim set, codec, and signer into the
//! public contract: mint access/refresh tokens on login, verify them on
//! every authenticated request. Tokens are self-contained — signature plus
//! embedded expiration — so there is no server-side session record.
//!
//! # Verification pipeline
//!
//! ```text
//! token arrives → syntactic decode (segments, base64, JSON, claim presence)
//!               → algorithm check against the configured scheme
//!               → signature check: active key first, then retired keys
//!                 in recency order (rotation grace window)
//!               → expiration check with clock-skew leeway
//!               → VerifiedClaims handle
//! ```
//!
//! Claim accessors operate only on [`VerifiedClaims`], a value that can only
//! be produced by a successful verification — callers cannot read a claim
//! out of a token the provider has not checked.
//!
//! # Revocation
//!
//! There is no revocation path in this core. Immediate revocation (e.g. on
//! logout) would require a token-identifier denylist consulted during
//! verification, keyed by a `jti` claim this claim set does not carry; that
//! collaborator lives outside this crate.

use std::{
    collections::VecDeque,
    sync::{Arc, RwLock},
};

use crate::{
    claims::{ClaimSet, TokenType},
    clock::{Clock, SystemClock},
    codec,
    config::TokenConfig,
    error::{Result, TokenError},
    signer::Hs256Signer,
    validation::validate_algorithm,
};

/// Maximum number of retired keys kept for the rotation grace window.
///
/// Verification tries the active key, then retired keys in recency order.
/// Rotating beyond this bound drops the oldest key, after which tokens
/// signed under it stop verifying.
pub const MAX_RETIRED_KEYS: usize = 4;

/// Signing keys: the active key plus recently retired ones.
struct KeyRing {
    active: Hs256Signer,
    /// Most recently retired first.
    retired: VecDeque<Hs256Signer>,
}

impl KeyRing {
    /// Verifies `signature` over `input` against the active key first, then
    /// each retired key in recency order.
    fn verify(&self, input: &[u8], signature: &[u8]) -> bool {
        if self.active.verify(input, signature) {
            return true;
        }
        self.retired.iter().any(|key| key.verify(input, signature))
    }
}

/// Claims that have passed signature and expiration checks.
///
/// The only way to obtain a `VerifiedClaims` is through
/// [`TokenProvider::verify`], so any code holding one can trust its
/// accessors without re-checking the token string.
#[derive(Clone, Debug)]
pub struct VerifiedClaims {
    claims: ClaimSet,
}

impl VerifiedClaims {
    /// Subject — the unique user identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.claims.sub()
    }

    /// Display handle.
    #[must_use]
    pub fn username(&self) -> &str {
        self.claims.username()
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.claims.email()
    }

    /// Token type (`access` / `refresh`).
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.claims.token_type()
    }

    /// Issued-at timestamp (seconds since epoch).
    #[must_use]
    pub fn issued_at(&self) -> u64 {
        self.claims.issued_at()
    }

    /// Expiration timestamp (seconds since epoch).
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.claims.expires_at()
    }

    /// Requires the token to be of the given type.
    ///
    /// Type-gated endpoints use this so a refresh token is never silently
    /// accepted where an access token is expected, or vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidClaim`] on a type mismatch.
    pub fn require_type(&self, expected: TokenType) -> Result<&Self> {
        if self.claims.token_type() != expected {
            return Err(TokenError::invalid_claim(format!(
                "expected {} token, got {}",
                expected.as_str(),
                self.claims.token_type().as_str()
            )));
        }
        Ok(self)
    }
}

/// Issues and verifies signed identity tokens.
///
/// Stateless and safe for unrestricted concurrent use: every operation is a
/// pure, CPU-bound function of its input and the key set. The only mutable
/// state is the key ring, which changes exclusively through
/// [`rotate_key`](Self::rotate_key) and is read-locked during verification.
pub struct TokenProvider {
    keys: RwLock<KeyRing>,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
    leeway_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TokenProvider {
    /// Creates a provider from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::KeyConfiguration`] if the signing key is
    /// missing or shorter than [`MIN_KEY_LEN`](crate::signer::MIN_KEY_LEN)
    /// bytes. This failure should abort startup: continuing would silently
    /// disable the signature guarantee.
    pub fn new(config: TokenConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a provider with an injected clock.
    ///
    /// Production code uses [`new`](Self::new); tests inject a fixed clock
    /// to exercise expiration without sleeping.
    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let active = Hs256Signer::new(config.signing_key.as_bytes())?;
        Ok(Self {
            keys: RwLock::new(KeyRing { active, retired: VecDeque::new() }),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
            leeway_secs: config.leeway_secs,
            clock,
        })
    }

    /// Mints a short-lived access token for the given identity.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidClaim`] if `sub`, `username`, or `email`
    /// is empty. Never fails for well-formed non-empty inputs.
    #[tracing::instrument(skip(self, sub, username, email))]
    pub fn generate_access_token(&self, sub: &str, username: &str, email: &str) -> Result<String> {
        self.issue(sub, username, email, TokenType::Access, self.access_ttl_secs)
    }

    /// Mints a long-lived refresh token for the given identity.
    ///
    /// Signed with the same key as access tokens but distinguished by the
    /// `typ` claim, so one cannot be accepted as the other by type-gated
    /// checks.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidClaim`] if `sub`, `username`, or `email`
    /// is empty.
    #[tracing::instrument(skip(self, sub, username, email))]
    pub fn generate_refresh_token(&self, sub: &str, username: &str, email: &str) -> Result<String> {
        self.issue(sub, username, email, TokenType::Refresh, self.refresh_ttl_secs)
    }

    fn issue(
        &self,
        sub: &str,
        username: &str,
        email: &str,
        typ: TokenType,
        ttl_secs: u64,
    ) -> Result<String> {
        let claims = ClaimSet::new(sub, username, email, typ, ttl_secs, self.clock.as_ref())?;
        let keys = self.keys.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        let token = codec::encode(&claims, &keys.active)?;
        tracing::debug!(typ = typ.as_str(), exp = claims.expires_at(), "token issued");
        Ok(token)
    }

    /// Verifies a token and returns the trusted claims handle.
    ///
    /// Runs the full pipeline: syntactic decode, algorithm check, signature
    /// check against the active key then retired keys in recency order, and
    /// expiration check with clock-skew leeway.
    ///
    /// # Errors
    ///
    /// - [`TokenError::MalformedToken`] / [`TokenError::MissingClaim`] — syntactically broken input
    /// - [`TokenError::UnsupportedAlgorithm`] — declared algorithm differs from the configured one
    ///   (algorithm-substitution attempt)
    /// - [`TokenError::InvalidSignature`] — no configured key produced this signature
    /// - [`TokenError::TokenExpired`] — `now >= exp + leeway`
    /// - [`TokenError::NotYetValid`] — `iat` beyond `now + leeway`
    #[tracing::instrument(skip(self, token))]
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims> {
        let decoded = codec::decode(token)?;

        // Reject declared-algorithm mismatches before any crypto work.
        validate_algorithm(&decoded.header.alg)?;

        let signature_ok = {
            let keys = self.keys.read().unwrap_or_else(std::sync::PoisonError::into_inner);
            keys.verify(decoded.signing_input.as_bytes(), &decoded.signature)
        };
        if !signature_ok {
            return Err(TokenError::InvalidSignature);
        }

        // Only after the signature checks out are the claims worth reading.
        let now = self.clock.now_unix();
        if now >= decoded.claims.expires_at().saturating_add(self.leeway_secs) {
            return Err(TokenError::TokenExpired);
        }
        if decoded.claims.issued_at() > now.saturating_add(self.leeway_secs) {
            return Err(TokenError::NotYetValid);
        }

        Ok(VerifiedClaims { claims: decoded.claims })
    }

    /// Returns whether a token is currently valid.
    ///
    /// This is the boolean boundary: every failure kind — empty input,
    /// malformed segments, signature mismatch, expiration — collapses to
    /// `false`, never an error or panic, so calling code has exactly one
    /// check to perform before trusting a token. Attacker-supplied garbage
    /// is an expected input here.
    ///
    /// Repeated calls on the same token string within its validity window
    /// yield the same result; there is no one-time-use state.
    #[tracing::instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "token validation failed");
                false
            },
        }
    }

    /// Extracts the subject from a verified token.
    ///
    /// By contract this should only be called after
    /// [`validate_token`](Self::validate_token) returned `true`; it runs the
    /// full verification again and propagates the error rather than
    /// returning stale or forged data. Prefer holding the
    /// [`VerifiedClaims`] from [`verify`](Self::verify) when reading more
    /// than one claim.
    ///
    /// # Errors
    ///
    /// Propagates every error [`verify`](Self::verify) can return.
    pub fn user_id_from_token(&self, token: &str) -> Result<String> {
        Ok(self.verify(token)?.subject().to_owned())
    }

    /// Extracts the username from a verified token.
    ///
    /// # Errors
    ///
    /// Propagates every error [`verify`](Self::verify) can return.
    pub fn username_from_token(&self, token: &str) -> Result<String> {
        Ok(self.verify(token)?.username().to_owned())
    }

    /// Extracts the email from a verified token.
    ///
    /// # Errors
    ///
    /// Propagates every error [`verify`](Self::verify) can return.
    pub fn email_from_token(&self, token: &str) -> Result<String> {
        Ok(self.verify(token)?.email().to_owned())
    }

    /// Rotates the signing key.
    ///
    /// The new key becomes active for all subsequent issuance; the previous
    /// key joins the retired list so tokens signed under it keep verifying
    /// for a grace window. At most [`MAX_RETIRED_KEYS`] retired keys are
    /// kept — the oldest is dropped beyond that.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::KeyConfiguration`] if the new key is below the
    /// minimum length. The current key ring is left untouched on failure.
    #[tracing::instrument(skip(self, new_key))]
    pub fn rotate_key(&self, new_key: &[u8]) -> Result<()> {
        let new_active = Hs256Signer::new(new_key)?;
        let mut keys = self.keys.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = std::mem::replace(&mut keys.active, new_active);
        keys.retired.push_front(previous);
        keys.retired.truncate(MAX_RETIRED_KEYS);
        tracing::info!(retired_keys = keys.retired.len(), "signing key rotated");
        Ok(())
    }

    /// Number of retired keys currently kept for the grace window.
    #[must_use]
    pub fn retired_key_count(&self) -> usize {
        self.keys.read().unwrap_or_else(std::sync::PoisonError::into_inner).retired.len()
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("retired_keys", &self.retired_key_count())
            .finish()
    }
}

//! Token wire-format encoding and decoding.
//!
//! The wire artifact is three dot-delimited segments, each base64url-encoded
//! without padding: `b64url(header).b64url(payload).b64url(signature)`.
//!
//! Decoding here is purely syntactic: it checks structure and claim
//! presence, nothing more. Splitting the cheap syntactic work from the
//! cryptographic verification lets malformed input be rejected before any
//! signature computation, and lets each failure mode be tested in isolation.
//! **Nothing returned by [`decode`] may be trusted until the caller has
//! verified the signature over [`Decoded::signing_input`].**

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::{
    claims::ClaimSet,
    error::{Result, TokenError},
    signer::Hs256Signer,
};

/// Algorithm identifier carried in every header this codec produces.
pub const HEADER_ALG: &str = "HS256";

/// Type identifier carried in every header this codec produces.
pub const HEADER_TYP: &str = "JWT";

/// Token header: declares the signature algorithm and token format.
///
/// Fields are declared in lexicographic key order for canonical
/// serialization, matching [`ClaimSet`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm identifier (e.g. `"HS256"`).
    pub alg: String,
    /// Token format identifier (`"JWT"`).
    pub typ: String,
}

impl Header {
    /// Header for tokens produced by this codec.
    #[must_use]
    pub fn hs256() -> Self {
        Self { alg: HEADER_ALG.to_string(), typ: HEADER_TYP.to_string() }
    }
}

/// The syntactic parts of a decoded token.
///
/// Produced by [`decode`] without any signature check — every field is
/// attacker-controlled until the signature over `signing_input` verifies.
#[derive(Clone, Debug)]
pub struct Decoded {
    /// Declared header. The `alg` field must still be validated against the
    /// configured algorithm before the signature check.
    pub header: Header,
    /// Decoded claims. Untrusted until the signature verifies.
    pub claims: ClaimSet,
    /// Raw signature bytes from the third segment.
    pub signature: Vec<u8>,
    /// The exact `header.payload` substring the signature covers.
    ///
    /// Kept as transmitted rather than re-serialized, so verification signs
    /// the same bytes the issuer signed.
    pub signing_input: String,
}

/// Encodes and signs a claim set into the wire format.
///
/// Serializes the header and claims canonically (stable key ordering),
/// base64url-encodes each without padding, signs the `header.payload`
/// bytes, and appends the encoded signature as the third segment.
///
/// # Errors
///
/// Returns [`TokenError::MalformedToken`] if JSON serialization fails,
/// which cannot happen for well-formed claim sets.
pub fn encode(claims: &ClaimSet, signer: &Hs256Signer) -> Result<String> {
    let header_json = serde_json::to_vec(&Header::hs256())
        .map_err(|e| TokenError::malformed(format!("Failed to serialize header: {e}")))?;
    let payload_json = serde_json::to_vec(claims)
        .map_err(|e| TokenError::malformed(format!("Failed to serialize claims: {e}")))?;

    let header_b64 = URL_SAFE_NO_PAD.encode(header_json);
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json);

    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = signer.sign(signing_input.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Decodes a token string into its syntactic parts, without verification.
///
/// # Errors
///
/// Returns [`TokenError::MalformedToken`] if:
/// - The token does not have exactly 3 non-empty dot-separated segments
/// - Any segment fails base64url decoding
/// - Header or payload is not valid JSON of the expected shape
///
/// Returns [`TokenError::MissingClaim`] if a required claim is empty.
pub fn decode(token: &str) -> Result<Decoded> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::malformed("token must have 3 parts separated by dots"));
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(TokenError::malformed("token segments must be non-empty"));
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(parts[0])
        .map_err(|e| TokenError::malformed(format!("Failed to decode token header: {e}")))?;
    let header: Header = serde_json::from_slice(&header_bytes)
        .map_err(|e| TokenError::malformed(format!("Failed to parse token header: {e}")))?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| TokenError::malformed(format!("Failed to decode token payload: {e}")))?;
    let claims: ClaimSet = serde_json::from_slice(&payload_bytes)
        .map_err(|e| TokenError::malformed(format!("Failed to parse token claims: {e}")))?;
    claims.check_required()?;

    let signature = URL_SAFE_NO_PAD
        .decode(parts[2])
        .map_err(|e| TokenError::malformed(format!("Failed to decode token signature: {e}")))?;

    let signing_input = format!("{}.{}", parts[0], parts[1]);

    Ok(Decoded { header, claims, signature, signing_input })
}

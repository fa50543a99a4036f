//! HMAC-SHA256 signing and verification.
//!
//! [`Hs256Signer`] wraps the symmetric signing key and produces a detached
//! signature over an opaque byte string. Verification recomputes the tag and
//! compares in constant time; a variable-time comparison would leak how many
//! signature bytes an attacker has guessed correctly.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Result, TokenError};

type HmacSha256 = Hmac<Sha256>;

/// Minimum signing key length in bytes (256 bits for HMAC-SHA256).
///
/// Shorter keys reduce the effective security of the MAC below the hash
/// output size and are rejected at construction.
pub const MIN_KEY_LEN: usize = 32;

/// HMAC-SHA256 signer/verifier over a process-wide symmetric key.
///
/// The key is loaded once at construction and held for the lifetime of the
/// signer. It is never logged, never exposed through any accessor, and the
/// backing buffer is scrubbed from memory on drop.
///
/// Signing is a pure function of key + input: re-signing the same bytes with
/// the same key always yields the same tag.
pub struct Hs256Signer {
    key: Zeroizing<Vec<u8>>,
}

impl Hs256Signer {
    /// Creates a signer from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::KeyConfiguration`] if the key is empty or
    /// shorter than [`MIN_KEY_LEN`] bytes. This is fatal at startup.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(TokenError::key_configuration("signing key is missing"));
        }
        if key.len() < MIN_KEY_LEN {
            return Err(TokenError::key_configuration(format!(
                "signing key must be at least {MIN_KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        Ok(Self { key: Zeroizing::new(key.to_vec()) })
    }

    /// Computes the HMAC-SHA256 tag over `input`.
    #[must_use]
    pub fn sign(&self, input: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    }

    /// Verifies `signature` against the recomputed tag for `input`.
    ///
    /// The comparison runs in constant time (`Mac::verify_slice`), so the
    /// outcome timing does not depend on where the signatures diverge.
    #[must_use]
    pub fn verify(&self, input: &[u8], signature: &[u8]) -> bool {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(input);
        mac.verify_slice(signature).is_ok()
    }
}

impl std::fmt::Debug for Hs256Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material must never appear in logs or debug output.
        f.debug_struct("Hs256Signer").field("key", &"<redacted>").finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use rstest::rstest;

    use super::*;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_new_accepts_32_byte_key() {
        assert!(Hs256Signer::new(KEY).is_ok());
    }

    #[rstest]
    #[case::empty(b"".as_slice())]
    #[case::one_byte(b"k".as_slice())]
    #[case::thirty_one_bytes(b"0123456789abcdef0123456789abcde".as_slice())]
    fn test_new_rejects_weak_key(#[case] key: &[u8]) {
        let result = Hs256Signer::new(key);
        assert!(matches!(result, Err(TokenError::KeyConfiguration(_))));
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = Hs256Signer::new(KEY).unwrap();
        let a = signer.sign(b"header.payload");
        let b = signer.sign(b"header.payload");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32, "HMAC-SHA256 tag is 32 bytes");
    }

    #[test]
    fn test_sign_differs_per_input() {
        let signer = Hs256Signer::new(KEY).unwrap();
        assert_ne!(signer.sign(b"input-a"), signer.sign(b"input-b"));
    }

    #[test]
    fn test_sign_differs_per_key() {
        let a = Hs256Signer::new(KEY).unwrap();
        let b = Hs256Signer::new(b"fedcba9876543210fedcba9876543210").unwrap();
        assert_ne!(a.sign(b"same-input"), b.sign(b"same-input"));
    }

    #[test]
    fn test_verify_round_trip() {
        let signer = Hs256Signer::new(KEY).unwrap();
        let sig = signer.sign(b"header.payload");
        assert!(signer.verify(b"header.payload", &sig));
    }

    #[test]
    fn test_verify_rejects_flipped_byte() {
        let signer = Hs256Signer::new(KEY).unwrap();
        let mut sig = signer.sign(b"header.payload");
        sig[0] ^= 0x01;
        assert!(!signer.verify(b"header.payload", &sig));
    }

    #[test]
    fn test_verify_rejects_wrong_input() {
        let signer = Hs256Signer::new(KEY).unwrap();
        let sig = signer.sign(b"header.payload");
        assert!(!signer.verify(b"header.tampered", &sig));
    }

    #[test]
    fn test_verify_rejects_truncated_signature() {
        let signer = Hs256Signer::new(KEY).unwrap();
        let sig = signer.sign(b"header.payload");
        assert!(!signer.verify(b"header.payload", &sig[..16]));
        assert!(!signer.verify(b"header.payload", b""));
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = Hs256Signer::new(KEY).unwrap();
        let debug = format!("{signer:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("0123456789abcdef"));
    }
}

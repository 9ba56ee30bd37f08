//! # Credential Hashing
//!
//! One-way transform of a plaintext secret into a fixed-length hex digest.
//! Used at registration (store the digest) and at login (recompute and
//! compare).
//!
//! ## Hash Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Credential Hashing                                │
//! │                                                                         │
//! │  Registration                          Login                            │
//! │  ────────────                          ─────                            │
//! │  hash_password("secret123")            hash_password("secret123")       │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  PasswordHash("fcf730b6…")             PasswordHash("fcf730b6…")        │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  stored in users table  ──── compare ────  equal? → authenticated      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Is Explicit
//! `hash_password` returns `Result`, never a sentinel. A digest that could
//! not be produced is unrepresentable as a `PasswordHash`, so two failed
//! hashes can never compare equal and silently authenticate. Callers must
//! abort the credential operation on `Err`.
//!
//! The digest is deterministic and unsalted: the same plaintext always yields
//! the same hex string, which is what the store compares on.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a SHA-256 digest rendered as hex.
pub const DIGEST_HEX_LEN: usize = 64;

// =============================================================================
// Errors
// =============================================================================

/// Credential hashing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// A stored or computed digest is not 64 lowercase hex characters.
    ///
    /// ## When This Occurs
    /// - Loading a corrupted or truncated hash from storage
    /// - A digest produced by an incompatible hashing scheme
    #[error("invalid password digest: {reason}")]
    InvalidDigest { reason: String },
}

// =============================================================================
// PasswordHash
// =============================================================================

/// A validated SHA-256 password digest (64 lowercase hex characters).
///
/// The only ways to obtain one are [`hash_password`] and
/// [`PasswordHash::from_hex`], both of which enforce the digest shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Validates and wraps a stored digest string.
    ///
    /// ## Rules
    /// - Exactly 64 characters
    /// - Lowercase hex only
    pub fn from_hex(digest: &str) -> Result<Self, HashError> {
        if digest.len() != DIGEST_HEX_LEN {
            return Err(HashError::InvalidDigest {
                reason: format!("expected {} hex chars, got {}", DIGEST_HEX_LEN, digest.len()),
            });
        }

        if !digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(HashError::InvalidDigest {
                reason: "digest must be lowercase hexadecimal".to_string(),
            });
        }

        Ok(PasswordHash(digest.to_string()))
    }

    /// Returns the digest as a hex string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recomputes the digest for `plaintext` and compares.
    ///
    /// Returns true only on exact digest equality.
    pub fn verify(&self, plaintext: &str) -> Result<bool, HashError> {
        let candidate = hash_password(plaintext)?;
        Ok(candidate == *self)
    }
}

impl std::fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PasswordHash::from_hex(&value)
    }
}

impl From<PasswordHash> for String {
    fn from(hash: PasswordHash) -> Self {
        hash.0
    }
}

// =============================================================================
// Hashing
// =============================================================================

/// Hashes a plaintext password with SHA-256, rendered as lowercase hex.
///
/// Deterministic: the same input always produces the same digest. The result
/// passes through [`PasswordHash::from_hex`] so the digest shape invariant
/// holds for every value of the type.
pub fn hash_password(plaintext: &str) -> Result<PasswordHash, HashError> {
    let digest = Sha256::digest(plaintext.as_bytes());
    PasswordHash::from_hex(&hex::encode(digest))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_inputs_yield_distinct_digests() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret124").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_digest_shape() {
        let hash = hash_password("anything").unwrap();
        assert_eq!(hash.as_str().len(), DIGEST_HEX_LEN);
        assert!(hash
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_known_vector() {
        // SHA-256("abc")
        let hash = hash_password("abc").unwrap();
        assert_eq!(
            hash.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_roundtrip() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.verify("secret123").unwrap());
        assert!(!hash.verify("wrong").unwrap());
    }

    #[test]
    fn test_from_hex_rejects_bad_digests() {
        assert!(PasswordHash::from_hex("").is_err());
        assert!(PasswordHash::from_hex("abc123").is_err());
        // Right length, uppercase hex
        assert!(PasswordHash::from_hex(
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        )
        .is_err());
        // Right length, non-hex character
        assert!(PasswordHash::from_hex(
            "zz7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        )
        .is_err());
    }

    #[test]
    fn test_from_hex_accepts_real_digest() {
        let hash = PasswordHash::from_hex(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        )
        .unwrap();
        assert!(hash.verify("abc").unwrap());
    }
}

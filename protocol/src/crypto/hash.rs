//! # Hashing Utilities
//!
//! SHA-256 is the only digest in the protocol. It names transactions
//! (the hash of their canonical bytes), it is what queries such as
//! `GetTransactions` refer to, and it is what pagination cursors point at.
//!
//! [`Hash`] is a fixed 32-byte value. Anything that is not exactly 32 bytes
//! is not a hash, and the constructors refuse to pretend otherwise.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::HASH_LENGTH;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash([u8; HASH_LENGTH]);

impl Hash {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Copy a slice into a hash. Returns `None` unless the slice is exactly
    /// [`HASH_LENGTH`] bytes long.
    pub fn try_from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; HASH_LENGTH] = slice.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Parse a hex-encoded hash.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        Self::try_from_slice(&bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

/// Compute the SHA-256 digest of `data`.
///
/// # Example
///
/// ```
/// use ledger_protocol::crypto::sha256;
///
/// let hash = sha256(b"admin@test");
/// assert_eq!(hash.as_bytes().len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Hash {
    let digest = Sha256::digest(data);
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(&digest);
    Hash(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // SHA-256("abc") from FIPS 180-2, appendix B.1.
        let hash = sha256(b"abc");
        assert_eq!(
            hash.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_is_deterministic() {
        assert_eq!(sha256(b"ledger"), sha256(b"ledger"));
        assert_ne!(sha256(b"ledger"), sha256(b"ledgers"));
    }

    #[test]
    fn try_from_slice_requires_exact_length() {
        assert!(Hash::try_from_slice(&[0u8; 32]).is_some());
        assert!(Hash::try_from_slice(&[0u8; 31]).is_none());
        assert!(Hash::try_from_slice(&[0u8; 33]).is_none());
        assert!(Hash::try_from_slice(&[]).is_none());
    }

    #[test]
    fn hex_roundtrip() {
        let hash = sha256(b"roundtrip");
        assert_eq!(Hash::from_hex(&hash.to_hex()), Some(hash));
        assert_eq!(Hash::from_hex("abcd"), None);
        assert_eq!(Hash::from_hex("not hex"), None);
    }

    #[test]
    fn debug_is_truncated() {
        let debug = format!("{:?}", sha256(b"x"));
        assert!(debug.starts_with("Hash("));
        assert_eq!(debug.len(), "Hash()".len() + 16);
    }
}

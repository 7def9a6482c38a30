//! # Key Management
//!
//! Ed25519 keypairs, public keys, and signatures.
//!
//! The validation core treats key material as opaque byte buffers: a public
//! key is exactly 32 bytes, a private key is exactly 64 bytes (the 32-byte
//! secret followed by its 32-byte public key), and a signature is exactly 64
//! bytes. Only the signer and the verifier ever interpret them as curve
//! points.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses `OsRng`.
//! - Key bytes are never logged. `Debug` on [`Keypair`] prints only the
//!   public half.

use std::fmt;

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur when importing key material.
///
/// Deliberately vague about *why* a secret was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum KeyError {
    #[error("invalid private key: expected 64 bytes of secret||public")]
    InvalidPrivateKey,

    #[error("invalid public key: expected 32 bytes, got {0}")]
    InvalidPublicKey(usize),

    #[error("invalid signature: expected 64 bytes, got {0}")]
    InvalidSignature(usize),

    #[error("keypair validation failed: public key does not match secret key")]
    KeypairMismatch,

    #[error("malformed hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// An Ed25519 keypair.
///
/// `Keypair` intentionally does NOT implement `Serialize`/`Deserialize`.
/// Exporting a private key should be a deliberate act; use
/// [`Keypair::private_key`] / [`Keypair::from_private_key`].
///
/// # Examples
///
/// ```
/// use ledger_protocol::crypto::keys::Keypair;
///
/// let kp = Keypair::generate();
/// let sig = kp.sign(b"payload");
/// assert!(kp.public_key().verify(b"payload", &sig));
/// ```
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Import a 64-byte private key (`secret || public`).
    ///
    /// The embedded public half must match the one derived from the secret.
    pub fn from_private_key(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; PRIVATE_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidPrivateKey)?;
        let signing_key =
            SigningKey::from_keypair_bytes(&arr).map_err(|_| KeyError::KeypairMismatch)?;
        Ok(Self { signing_key })
    }

    /// Import a hex-encoded 64-byte private key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim())?;
        Self::from_private_key(&bytes)
    }

    /// Export the 64-byte private key (`secret || public`).
    ///
    /// **Handle with care.** Don't log it.
    pub fn private_key(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    /// Hex-encoded private key, 128 characters.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key())
    }

    /// The public half of this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message. Ed25519 signatures are deterministic: the same key and
    /// message always yield the same signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        write!(f, "Keypair(pub={})", self.public_key().to_hex())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A 32-byte Ed25519 public key.
///
/// Construction only checks the length. Whether the bytes are a valid curve
/// point is the verifier's business; a builder accepts any 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Copy a slice into a public key, requiring exactly 32 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] = slice
            .try_into()
            .map_err(|_| KeyError::InvalidPublicKey(slice.len()))?;
        Ok(Self(bytes))
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim())?;
        Self::try_from_slice(&bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Hex-encoded representation, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify `signature` over `message`.
    ///
    /// Returns `false` for anything that is not a valid signature by this
    /// key, including keys that are not curve points.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let Some(dalek_sig) = signature.to_dalek_signature() else {
            return false;
        };
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// An Ed25519 signature.
///
/// Stored as `Vec<u8>` for serde compatibility. The constructors guarantee
/// 64 bytes; a wrong-length signature decoded off the wire simply never
/// verifies.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap a raw 64-byte signature.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes.to_vec())
    }

    /// Copy a slice into a signature, requiring exactly 64 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != SIGNATURE_LENGTH {
            return Err(KeyError::InvalidSignature(slice.len()));
        }
        Ok(Self(slice.to_vec()))
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex-encoded representation, 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    fn to_dalek_signature(&self) -> Option<DalekSignature> {
        let arr: [u8; SIGNATURE_LENGTH] = self.0.as_slice().try_into().ok()?;
        Some(DalekSignature::from_bytes(&arr))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "Signature({})", hex_str)
        }
    }
}

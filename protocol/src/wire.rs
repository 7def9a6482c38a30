//! # Wire Adapter
//!
//! Binary encoding of signed payloads for transmission:
//!
//! ```text
//! +---------+------------------------------+
//! | version |  bincode(SignedTransaction)  |
//! |  1 byte |  or bincode(SignedQuery)     |
//! +---------+------------------------------+
//! ```
//!
//! Bincode is configured with fixed-width little-endian integers, a size
//! limit, and no trailing bytes. Decoding routes every identifier, key,
//! amount, and permission through its validator, so a decoded payload is
//! well-typed. It is *not* verified: freshness, size limits, and signatures
//! are [`crate::transaction::verify_transaction`]'s job.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::{MAX_WIRE_PAYLOAD_BYTES, WIRE_FORMAT_VERSION};
use crate::query::SignedQuery;
use crate::transaction::SignedTransaction;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty input")]
    Empty,

    #[error("unsupported wire format version {0}")]
    UnsupportedVersion(u8),

    /// Truncated input or bytes that are not a payload.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Structurally sound, but a field failed validation.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// A payload could not be serialized. Carries bincode's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode payload: {0}")]
pub struct EncodeError(pub String);

impl From<bincode::Error> for EncodeError {
    fn from(err: bincode::Error) -> Self {
        Self(err.to_string())
    }
}

/// Plain bincode encoding, the byte form that gets hashed and signed.
pub(crate) fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(bincode::serialize(value)?)
}

/// Payloads that can travel over the wire.
pub trait WirePayload: Serialize + DeserializeOwned + sealed::Sealed {}

impl WirePayload for SignedTransaction {}
impl WirePayload for SignedQuery {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for crate::transaction::SignedTransaction {}
    impl Sealed for crate::query::SignedQuery {}
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Encode a signed payload behind the version byte.
pub fn encode<T: WirePayload>(payload: &T) -> Result<Vec<u8>, EncodeError> {
    let mut out = vec![WIRE_FORMAT_VERSION];
    options().serialize_into(&mut out, payload)?;
    Ok(out)
}

/// Decode a payload produced by [`encode`].
pub fn decode<T: WirePayload>(bytes: &[u8]) -> Result<T, DecodeError> {
    let (version, body) = bytes.split_first().ok_or(DecodeError::Empty)?;
    if *version != WIRE_FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(*version));
    }
    options()
        .with_limit(MAX_WIRE_PAYLOAD_BYTES)
        .deserialize(body)
        .map_err(|e| match *e {
            bincode::ErrorKind::Custom(msg) => DecodeError::InvalidPayload(msg),
            other => DecodeError::Malformed(other.to_string()),
        })
}

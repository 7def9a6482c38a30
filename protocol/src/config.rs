//! # Protocol Configuration & Constants
//!
//! Every bound the validators enforce lives here. If you're hardcoding a
//! limit somewhere else, you're doing it wrong.
//!
//! These values define what a well-formed transaction looks like. Peers that
//! disagree on them will disagree on which payloads are valid, so changing
//! one is a protocol change, not a refactor.
//!
//! The tunable subset (freshness window and size limits) is also exposed as
//! [`ValidationConfig`] so that tests and tooling can tighten or relax it
//! without touching the constants.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifier Grammar
// ---------------------------------------------------------------------------

/// Maximum length of an account, asset, or role name. Names match
/// `[a-z_0-9]{1,32}`.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length of an account detail key. Keys match `[A-Za-z0-9_]{1,64}`.
pub const MAX_DETAIL_KEY_LENGTH: usize = 64;

/// Maximum length of a single hostname label (RFC 1035).
pub const MAX_DOMAIN_LABEL_LENGTH: usize = 63;

/// Maximum total length of a hostname.
pub const MAX_DOMAIN_LENGTH: usize = 255;

/// Separator between name and domain in an account ID (`alice@wonderland`).
pub const ACCOUNT_ID_SEPARATOR: char = '@';

/// Separator between name and domain in an asset ID (`coin#wonderland`).
pub const ASSET_ID_SEPARATOR: char = '#';

// ---------------------------------------------------------------------------
// Size Limits
// ---------------------------------------------------------------------------

/// Maximum account detail value size in bytes. 4 MiB, inclusive.
pub const MAX_DETAIL_VALUE_BYTES: usize = 4 * 1024 * 1024;

/// Maximum transfer description size in bytes, inclusive.
pub const MAX_DESCRIPTION_BYTES: usize = 64;

/// Maximum page size for paginated transaction queries.
pub const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Numeric Bounds
// ---------------------------------------------------------------------------

/// Smallest acceptable quorum.
pub const MIN_QUORUM: u32 = 1;

/// Largest acceptable quorum. Also the signatory ceiling per account.
pub const MAX_QUORUM: u32 = 128;

/// Amount mantissas must fit in this many bits (i.e. `<= 2^256 - 1`).
pub const MAX_AMOUNT_BITS: u64 = 256;

/// Decimal digits in `2^256 - 1`. Longer mantissas are out of range without
/// being parsed.
pub const MAX_AMOUNT_DIGITS: usize = 78;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Private key length in bytes: 32-byte secret followed by the 32-byte
/// public key.
pub const PRIVATE_KEY_LENGTH: usize = 64;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Hash output length in bytes (SHA-256).
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Timing Constants
// ---------------------------------------------------------------------------

/// Oldest acceptable `created_time`, measured back from validation time.
pub const MAX_CREATED_TIME_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// How far ahead of validation time a `created_time` may be. Zero means
/// anything from the future is rejected.
pub const CREATED_TIME_FUTURE_GAP: Duration = Duration::ZERO;

/// Default transaction quorum when the builder is not told otherwise.
pub const DEFAULT_TX_QUORUM: u32 = 1;

// ---------------------------------------------------------------------------
// Wire Format
// ---------------------------------------------------------------------------

/// Envelope version written in front of every encoded payload.
pub const WIRE_FORMAT_VERSION: u8 = 1;

/// Decoder refuses to allocate beyond this many bytes for one payload.
pub const MAX_WIRE_PAYLOAD_BYTES: u64 = 64 * 1024 * 1024;

// ---------------------------------------------------------------------------
// ValidationConfig
// ---------------------------------------------------------------------------

/// Tunable validation limits.
///
/// `Default` mirrors the protocol constants above. Everything else the
/// validators check (name grammars, key lengths, the amount bound, the
/// permission sets) is fixed by the protocol and not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Oldest acceptable `created_time`, relative to validation time.
    #[serde(with = "duration_ms")]
    pub max_created_time_age: Duration,

    /// Allowed clock skew into the future.
    #[serde(with = "duration_ms")]
    pub future_gap: Duration,

    /// Upper bound on a transfer description, in bytes.
    pub max_description_bytes: usize,

    /// Upper bound on an account detail value, in bytes.
    pub max_detail_value_bytes: usize,

    /// Upper bound on a query page size.
    pub max_page_size: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_created_time_age: MAX_CREATED_TIME_AGE,
            future_gap: CREATED_TIME_FUTURE_GAP,
            max_description_bytes: MAX_DESCRIPTION_BYTES,
            max_detail_value_bytes: MAX_DETAIL_VALUE_BYTES,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ValidationConfig {
    /// Maximum age as milliseconds, saturating at `u64::MAX`.
    pub fn max_age_ms(&self) -> u64 {
        u64::try_from(self.max_created_time_age.as_millis()).unwrap_or(u64::MAX)
    }

    /// Future allowance as milliseconds, saturating at `u64::MAX`.
    pub fn future_gap_ms(&self) -> u64 {
        u64::try_from(self.future_gap.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Durations are written as integer milliseconds in config files.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}

//! # Field Validators
//!
//! One pure function per field kind. Each takes the name of the field being
//! checked (so the error can say where it came from) and the raw candidate,
//! and either returns the canonical value or a [`ValidationError`].
//!
//! Nothing here allocates unless it has to report a failure, and nothing
//! reads the clock: [`created_time`] takes its "now" as an argument.

use num_bigint::BigUint;

use super::error::ValidationError;
use crate::config::{
    ValidationConfig, ACCOUNT_ID_SEPARATOR, ASSET_ID_SEPARATOR, MAX_AMOUNT_BITS, MAX_AMOUNT_DIGITS,
    MAX_DETAIL_KEY_LENGTH, MAX_DOMAIN_LABEL_LENGTH, MAX_DOMAIN_LENGTH, MAX_NAME_LENGTH, MAX_QUORUM,
    MIN_QUORUM,
};
use crate::crypto::{Hash, PublicKey};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

fn is_name(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= MAX_NAME_LENGTH
        && raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Account, asset, and role names: `[a-z_0-9]{1,32}`.
pub fn name(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    if is_name(raw) {
        Ok(())
    } else {
        Err(malformed_identifier(field, raw))
    }
}

/// Domain IDs. Any valid host (see [`host`]) is a valid domain.
pub fn domain(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    if is_host(raw) {
        Ok(())
    } else {
        Err(malformed_identifier(field, raw))
    }
}

/// `name@domain`.
pub fn account_id(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    qualified_id(field, raw, ACCOUNT_ID_SEPARATOR)
}

/// `name#domain`.
pub fn asset_id(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    qualified_id(field, raw, ASSET_ID_SEPARATOR)
}

fn qualified_id(field: &'static str, raw: &str, separator: char) -> Result<(), ValidationError> {
    match raw.split_once(separator) {
        Some((name, domain)) if is_name(name) && is_host(domain) => Ok(()),
        _ => Err(malformed_identifier(field, raw)),
    }
}

/// Account detail keys: `[A-Za-z0-9_]{1,64}`.
pub fn detail_key(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    let ok = !raw.is_empty()
        && raw.len() <= MAX_DETAIL_KEY_LENGTH
        && raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(malformed_identifier(field, raw))
    }
}

fn malformed_identifier(field: &'static str, raw: &str) -> ValidationError {
    ValidationError::MalformedIdentifier {
        field,
        value: raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Hosts
// ---------------------------------------------------------------------------

fn is_ipv4(raw: &str) -> bool {
    let octets: Vec<&str> = raw.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            !octet.is_empty()
                && octet.len() <= 3
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().map_or(false, |v| v <= 255)
        })
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= MAX_DOMAIN_LABEL_LENGTH
                && first.is_ascii_alphabetic()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

fn is_hostname(raw: &str) -> bool {
    !raw.is_empty() && raw.len() <= MAX_DOMAIN_LENGTH && raw.split('.').all(is_label)
}

fn is_host(raw: &str) -> bool {
    is_ipv4(raw) || is_hostname(raw)
}

/// An IPv4 dotted quad (octets in `[0, 255]`) or a hostname whose labels
/// match `[a-zA-Z]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?`.
pub fn host(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    if is_host(raw) {
        Ok(())
    } else {
        Err(malformed_host(field, raw))
    }
}

/// `host` or `host:port`, port in `[0, 65535]`.
pub fn peer_address(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    let (host_part, port) = match raw.rsplit_once(':') {
        Some((host_part, port)) => (host_part, Some(port)),
        None => (raw, None),
    };
    let port_ok = port.map_or(true, |port| {
        !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) && port.parse::<u16>().is_ok()
    });
    if port_ok && is_host(host_part) {
        Ok(())
    } else {
        Err(malformed_host(field, raw))
    }
}

fn malformed_host(field: &'static str, raw: &str) -> ValidationError {
    ValidationError::MalformedHost {
        field,
        value: raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Parse a decimal literal `[0-9]+(\.[0-9]+)?` into its unscaled mantissa
/// and scale (number of fractional digits).
///
/// The mantissa must fit in 256 bits. Positivity is a separate rule, see
/// [`positive_amount`].
pub fn decimal(field: &'static str, raw: &str) -> Result<(BigUint, u8), ValidationError> {
    let malformed = || ValidationError::MalformedAmount {
        field,
        value: raw.to_string(),
    };
    let out_of_range = || ValidationError::OutOfRangeAmount {
        field,
        value: raw.to_string(),
    };

    let (int_part, frac_part) = match raw.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (raw, ""),
    };
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !digits_only(int_part) || !digits_only(frac_part) {
        return Err(malformed());
    }
    if raw.contains('.') && frac_part.is_empty() {
        return Err(malformed());
    }

    let scale = u8::try_from(frac_part.len()).map_err(|_| out_of_range())?;
    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);

    // Big-integer parsing is superlinear in the digit count, so anything
    // that cannot fit is turned away before it reaches the parser.
    let significant = digits.trim_start_matches('0');
    if significant.len() > MAX_AMOUNT_DIGITS {
        return Err(out_of_range());
    }
    let mantissa = if significant.is_empty() {
        BigUint::default()
    } else {
        BigUint::parse_bytes(significant.as_bytes(), 10).ok_or_else(malformed)?
    };
    if mantissa.bits() > MAX_AMOUNT_BITS {
        return Err(out_of_range());
    }
    Ok((mantissa, scale))
}

/// Rejects a zero mantissa.
pub fn positive_amount(
    field: &'static str,
    mantissa: &BigUint,
    display: &str,
) -> Result<(), ValidationError> {
    if mantissa.bits() == 0 {
        return Err(ValidationError::OutOfRangeAmount {
            field,
            value: display.to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sizes & Ranges
// ---------------------------------------------------------------------------

/// Byte-size bound, inclusive.
pub fn max_bytes(field: &'static str, size: usize, max: usize) -> Result<(), ValidationError> {
    if size > max {
        return Err(ValidationError::ValueTooLarge { field, size, max });
    }
    Ok(())
}

/// Quorum in `[1, 128]`. Takes a signed value so that callers passing
/// negative numbers get a range error instead of a wrap-around.
pub fn quorum(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    match u32::try_from(value) {
        Ok(q) if (MIN_QUORUM..=MAX_QUORUM).contains(&q) => Ok(q),
        _ => Err(ValidationError::QuorumOutOfRange { field, value }),
    }
}

/// Page size in `[1, max]`. Zero is an empty page, anything above `max`
/// is too large.
pub fn page_size(field: &'static str, value: u32, max: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        return Err(ValidationError::EmptyRequiredField { field });
    }
    if value > max {
        return Err(ValidationError::ValueTooLarge {
            field,
            size: value as usize,
            max: max as usize,
        });
    }
    Ok(value)
}

/// A present, non-zero counter.
pub fn counter(field: &'static str, value: Option<u64>) -> Result<u64, ValidationError> {
    match value {
        Some(v) if v > 0 => Ok(v),
        _ => Err(ValidationError::EmptyRequiredField { field }),
    }
}

// ---------------------------------------------------------------------------
// Key Material & Hashes
// ---------------------------------------------------------------------------

/// Exactly [`crate::config::PUBLIC_KEY_LENGTH`] bytes. Content is not checked.
pub fn public_key(field: &'static str, bytes: &[u8]) -> Result<PublicKey, ValidationError> {
    PublicKey::try_from_slice(bytes).map_err(|_| ValidationError::InvalidKeyLength {
        field,
        len: bytes.len(),
    })
}

/// Exactly [`crate::config::HASH_LENGTH`] bytes.
pub fn hash(field: &'static str, bytes: &[u8]) -> Result<Hash, ValidationError> {
    Hash::try_from_slice(bytes).ok_or(ValidationError::InvalidHashLength {
        field,
        len: bytes.len(),
    })
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Freshness window check for a `created_time` in Unix milliseconds.
///
/// Missing is `EmptyRequiredField`. Zero, older than
/// `config.max_created_time_age`, or later than `now + config.future_gap`
/// is `StaleOrFutureTimestamp`.
pub fn created_time(
    field: &'static str,
    value: Option<u64>,
    now_ms: u64,
    config: &ValidationConfig,
) -> Result<u64, ValidationError> {
    let t = value.ok_or(ValidationError::EmptyRequiredField { field })?;
    let too_old = now_ms.saturating_sub(t) > config.max_age_ms();
    let too_new = t > now_ms.saturating_add(config.future_gap_ms());
    if t == 0 || too_old || too_new {
        return Err(ValidationError::StaleOrFutureTimestamp {
            field,
            value: t,
            now: now_ms,
        });
    }
    Ok(t)
}

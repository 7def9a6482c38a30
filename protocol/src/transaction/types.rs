//! Validated value types for commands and queries.
//!
//! Every type here can only be constructed through its validator, and the
//! serde impls route through the same validator, so a value that exists is
//! a value that passed. Limits that depend on [`crate::config::ValidationConfig`]
//! (description and detail sizes) are not part of the types and are checked
//! at finalization instead.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TX_QUORUM;
use crate::validation::{fields, ValidationError};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! validated_string {
    ($(#[$meta:meta])* $name:ident, $check:path, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate `raw`, reporting failures against `field`.
            pub fn parse(field: &'static str, raw: &str) -> Result<Self, ValidationError> {
                $check(field, raw)?;
                Ok(Self(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse($field, s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $check($field, &value)?;
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

validated_string!(
    /// `name@domain`, e.g. `admin@test`.
    AccountId,
    fields::account_id,
    "account_id"
);

validated_string!(
    /// `name#domain`, e.g. `coin#test`.
    AssetId,
    fields::asset_id,
    "asset_id"
);

validated_string!(
    /// A domain: IPv4 address or hostname.
    DomainId,
    fields::domain,
    "domain_id"
);

validated_string!(
    /// A role, account, or asset name: `[a-z_0-9]{1,32}`.
    Name,
    fields::name,
    "name"
);

validated_string!(
    /// `host[:port]` of a peer.
    PeerAddress,
    fields::peer_address,
    "address"
);

validated_string!(
    /// Account detail key: `[A-Za-z0-9_]{1,64}`.
    DetailKey,
    fields::detail_key,
    "key"
);

impl AccountId {
    /// The part before `@`.
    pub fn name(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(name, _)| name)
    }

    /// The part after `@`.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl AssetId {
    pub fn name(&self) -> &str {
        self.0.split_once('#').map_or(self.0.as_str(), |(name, _)| name)
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('#').map_or("", |(_, domain)| domain)
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A non-negative fixed-point decimal.
///
/// Stored as an arbitrary-precision unsigned mantissa plus the number of
/// fractional digits it was written with: `"1.50"` is mantissa 150, scale 2.
/// The mantissa never exceeds `2^256 - 1`. No floating point anywhere.
///
/// Zero is representable. Commands that move value reject it separately.
///
/// ```
/// use ledger_protocol::transaction::types::Amount;
///
/// let amount: Amount = "1.50".parse().unwrap();
/// assert_eq!(amount.scale(), 2);
/// assert_eq!(amount.to_string(), "1.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    mantissa: BigUint,
    scale: u8,
}

impl Amount {
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, ValidationError> {
        let (mantissa, scale) = fields::decimal(field, raw)?;
        Ok(Self { mantissa, scale })
    }

    /// The unscaled integer value.
    pub fn mantissa(&self) -> &BigUint {
        &self.mantissa
    }

    /// Number of fractional digits.
    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.bits() == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_str_radix(10);
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        // Left-pad so there is at least one integer digit.
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("amount", s)
    }
}

impl TryFrom<String> for Amount {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Quorum
// ---------------------------------------------------------------------------

/// Signature quorum in `[1, 128]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quorum(u32);

impl Quorum {
    pub fn new(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        fields::quorum(field, value).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Quorum {
    fn default() -> Self {
        Self(DEFAULT_TX_QUORUM)
    }
}

impl fmt::Display for Quorum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quorum {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new("quorum", i64::from(value))
    }
}

impl From<Quorum> for u32 {
    fn from(value: Quorum) -> Self {
        value.0
    }
}

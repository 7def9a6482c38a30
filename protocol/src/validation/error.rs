//! Validation errors and the report collected by a finalization pass.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A single violated rule.
///
/// Every variant names the field it was raised for, plus the offending value
/// (or its size, when echoing the value would be unreasonable, as with a
/// 4 MiB detail blob).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name, account ID, asset ID, role ID, or detail key grammar violation.
    #[error("{field}: malformed identifier '{value}'")]
    MalformedIdentifier { field: &'static str, value: String },

    /// Not an IPv4 address or hostname, or a bad port.
    #[error("{field}: malformed host '{value}'")]
    MalformedHost { field: &'static str, value: String },

    /// Zero where positivity is required, or larger than `2^256 - 1`.
    #[error("{field}: amount {value} out of range")]
    OutOfRangeAmount { field: &'static str, value: String },

    /// Not a decimal number.
    #[error("{field}: malformed amount '{value}'")]
    MalformedAmount { field: &'static str, value: String },

    #[error("{field}: public key must be 32 bytes, got {len}")]
    InvalidKeyLength { field: &'static str, len: usize },

    #[error("{field}: hash must be 32 bytes, got {len}")]
    InvalidHashLength { field: &'static str, len: usize },

    #[error("{field}: unknown permission '{value}'")]
    UnknownPermission { field: &'static str, value: String },

    #[error("{field}: permission '{value}' cannot be granted")]
    NonGrantablePermission { field: &'static str, value: String },

    #[error("{field}: quorum {value} outside [1, 128]")]
    QuorumOutOfRange { field: &'static str, value: i64 },

    /// Zero, older than the freshness window, or ahead of the future gap.
    #[error("{field}: timestamp {value} outside the freshness window at {now}")]
    StaleOrFutureTimestamp {
        field: &'static str,
        value: u64,
        now: u64,
    },

    /// Missing creator, no commands, no query, zero counter, empty set.
    #[error("{field}: required field is empty")]
    EmptyRequiredField { field: &'static str },

    #[error("{field}: {size} exceeds the limit of {max}")]
    ValueTooLarge {
        field: &'static str,
        size: usize,
        max: usize,
    },
}

/// Fieldless mirror of [`ValidationError`], for matching on the class of
/// rule that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    MalformedIdentifier,
    MalformedHost,
    OutOfRangeAmount,
    MalformedAmount,
    InvalidKeyLength,
    InvalidHashLength,
    UnknownPermission,
    NonGrantablePermission,
    QuorumOutOfRange,
    StaleOrFutureTimestamp,
    EmptyRequiredField,
    ValueTooLarge,
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::MalformedIdentifier { .. } => ValidationErrorKind::MalformedIdentifier,
            Self::MalformedHost { .. } => ValidationErrorKind::MalformedHost,
            Self::OutOfRangeAmount { .. } => ValidationErrorKind::OutOfRangeAmount,
            Self::MalformedAmount { .. } => ValidationErrorKind::MalformedAmount,
            Self::InvalidKeyLength { .. } => ValidationErrorKind::InvalidKeyLength,
            Self::InvalidHashLength { .. } => ValidationErrorKind::InvalidHashLength,
            Self::UnknownPermission { .. } => ValidationErrorKind::UnknownPermission,
            Self::NonGrantablePermission { .. } => ValidationErrorKind::NonGrantablePermission,
            Self::QuorumOutOfRange { .. } => ValidationErrorKind::QuorumOutOfRange,
            Self::StaleOrFutureTimestamp { .. } => ValidationErrorKind::StaleOrFutureTimestamp,
            Self::EmptyRequiredField { .. } => ValidationErrorKind::EmptyRequiredField,
            Self::ValueTooLarge { .. } => ValidationErrorKind::ValueTooLarge,
        }
    }

    /// The field the violation was raised for.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MalformedIdentifier { field, .. }
            | Self::MalformedHost { field, .. }
            | Self::OutOfRangeAmount { field, .. }
            | Self::MalformedAmount { field, .. }
            | Self::InvalidKeyLength { field, .. }
            | Self::InvalidHashLength { field, .. }
            | Self::UnknownPermission { field, .. }
            | Self::NonGrantablePermission { field, .. }
            | Self::QuorumOutOfRange { field, .. }
            | Self::StaleOrFutureTimestamp { field, .. }
            | Self::EmptyRequiredField { field }
            | Self::ValueTooLarge { field, .. } => *field,
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// One violation plus where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// `"Transaction"`, `"Query"`, `"Command #2 TransferAsset"`, ...
    pub context: String,
    pub error: ValidationError,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.error)
    }
}

/// Every violation found by one validation pass, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, context: impl Into<String>, error: ValidationError) {
        self.violations.push(Violation {
            context: context.into(),
            error,
        });
    }

    /// Record the error of `result` (if any) and pass the value through.
    pub fn check<T>(&mut self, context: &str, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(context, error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.violations.first().map(|v| &v.error)
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn kinds(&self) -> Vec<ValidationErrorKind> {
        self.violations.iter().map(|v| v.error.kind()).collect()
    }

    /// Consume the report, yielding its first violation.
    pub fn into_first(self) -> Option<ValidationError> {
        self.violations.into_iter().next().map(|v| v.error)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "no violations");
        }
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_field_accessors() {
        let err = ValidationError::ValueTooLarge {
            field: "description",
            size: 65,
            max: 64,
        };
        assert_eq!(err.kind(), ValidationErrorKind::ValueTooLarge);
        assert_eq!(err.field(), "description");
        assert_eq!(err.to_string(), "description: 65 exceeds the limit of 64");
    }

    #[test]
    fn report_keeps_discovery_order() {
        let mut report = ValidationReport::new();
        assert!(report.is_empty());
        assert_eq!(report.first(), None);

        report.push("Transaction", ValidationError::EmptyRequiredField { field: "creator" });
        let passed = report.check::<u32>(
            "Command #1 SetAccountQuorum",
            Err(ValidationError::QuorumOutOfRange {
                field: "quorum",
                value: 0,
            }),
        );
        assert_eq!(passed, None);
        assert_eq!(report.check("Transaction", Ok(7)), Some(7));

        assert_eq!(report.len(), 2);
        assert_eq!(
            report.kinds(),
            vec![
                ValidationErrorKind::EmptyRequiredField,
                ValidationErrorKind::QuorumOutOfRange
            ]
        );
        assert_eq!(report.violations()[1].context, "Command #1 SetAccountQuorum");
        assert_eq!(
            report.into_first(),
            Some(ValidationError::EmptyRequiredField { field: "creator" })
        );
    }

    #[test]
    fn report_display_lists_every_violation() {
        let mut report = ValidationReport::new();
        report.push("Query", ValidationError::EmptyRequiredField { field: "query" });
        report.push(
            "Query",
            ValidationError::EmptyRequiredField {
                field: "query_counter",
            },
        );
        let text = report.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("Query: query: required field is empty"));
    }
}

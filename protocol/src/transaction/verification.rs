//! Verification of signed transactions received from elsewhere.
//!
//! A transaction that arrives over the wire may not have come from our
//! builder. [`crate::wire::decode`] only guarantees that every typed field
//! is well-formed; [`verify_transaction`] re-runs the remaining stateless
//! rules and then checks signatures. Checks run cheapest first.

use thiserror::Error;

use super::signing::{SignatureError, SignedTransaction};
use crate::config::ValidationConfig;
use crate::validation::{ValidationError, ValidationReport};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The payload breaks a validation rule. Carries the first violation.
    #[error("invalid transaction: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl From<ValidationReport> for TransactionError {
    fn from(report: ValidationReport) -> Self {
        let first = report
            .into_first()
            .unwrap_or(ValidationError::EmptyRequiredField { field: "commands" });
        Self::Invalid(first)
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a signed transaction at reference time `now_ms`.
///
/// 1. **Payload** - freshness window, non-empty command list, per-command
///    size and positivity limits under `config`.
/// 2. **Signatures** - at least one, no repeated signer, all valid.
///
/// Quorum is not enforced here: a transaction still collecting signatures
/// is well-formed. Use [`SignedTransaction::has_quorum`] for that.
pub fn verify_transaction(
    tx: &SignedTransaction,
    now_ms: u64,
    config: &ValidationConfig,
) -> Result<(), TransactionError> {
    let report = tx.payload.validate(now_ms, config);
    if !report.is_empty() {
        return Err(report.into());
    }
    tx.verify_signatures()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! # Validation
//!
//! Stateless, syntactic validation of everything a transaction or query can
//! carry. Nothing in here knows about ledger state: whether an account
//! exists or a balance suffices is the ledger's business, not ours.
//!
//! - [`fields`] holds one pure validator per field kind.
//! - [`error`] holds the [`ValidationError`] taxonomy and the
//!   [`ValidationReport`] a finalization pass fills in.

pub mod error;
pub mod fields;
pub(crate) mod staged;

pub use error::{ValidationError, ValidationErrorKind, ValidationReport, Violation};

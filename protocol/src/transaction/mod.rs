//! # Transaction Module
//!
//! Construction, signing, and verification of ledger transactions. A
//! transaction is an ordered, non-empty list of [`Command`]s issued by one
//! creator account at one point in time.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        - Validated value types (AccountId, AssetId, Amount, Quorum, ...)
//! commands.rs     - The Command tagged union
//! builder.rs      - TransactionBuilder accumulator and UnsignedTransaction
//! batch.rs        - Batch meta, batch assembly and batch validation
//! signing.rs      - SignedTransaction, signing and co-signing
//! verification.rs - Re-validation and signature checks for received transactions
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** - Feed raw values to a [`TransactionBuilder`]; `build()`
//!    validates everything or reports the first violation.
//! 2. **Sign** - [`sign_transaction`], then optionally
//!    [`SignedTransaction::add_signature`] for each co-signer.
//! 3. **Encode** - [`crate::wire::encode`] for transmission.
//! 4. **Verify** - The receiving side runs [`verify_transaction`].
//!
//! ## Design Decisions
//!
//! - Validation is purely syntactic. Whether accounts exist or balances
//!   suffice is decided by the ledger, not here.
//! - Amounts are arbitrary-precision fixed-point decimals bounded by
//!   `2^256 - 1`. No floating point anywhere near value.
//! - The transaction hash is SHA-256 over the bincode canonical bytes of the
//!   unsigned payload, so signatures never change it. The reduced hash
//!   leaves out the batch meta and is what batch members are listed by.

pub mod batch;
pub mod builder;
pub mod commands;
pub mod signing;
pub mod types;
pub mod verification;

pub use batch::{assemble_batch, validate_batch, BatchError, BatchKind, BatchMeta};
pub use builder::{TransactionBuilder, UnsignedTransaction};
pub use commands::Command;
pub use signing::{sign_transaction, SignatureError, SignaturePair, SignedTransaction};
pub use types::{AccountId, Amount, AssetId, DetailKey, DomainId, Name, PeerAddress, Quorum};
pub use verification::{verify_transaction, TransactionError};

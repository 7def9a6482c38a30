// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Protocol: Transaction & Query Builder
//!
//! A validating builder for permissioned-ledger transactions and queries.
//! Feed it raw values, and it either hands back a canonical, well-formed
//! payload ready to sign or tells you exactly which rule you broke.
//!
//! Validation here is stateless and syntactic: identifier grammars, host
//! names, amount bounds, key lengths, permission sets, timestamps. Whether
//! an account exists or a balance suffices is for the ledger to decide.
//!
//! ## Architecture
//!
//! - **config** - Protocol bounds and the tunable [`config::ValidationConfig`].
//! - **crypto** - Ed25519 keys and signatures, SHA-256 hashes.
//! - **permissions** - The closed role permission set and its grantable subset.
//! - **validation** - Pure field validators and the error taxonomy.
//! - **transaction** - Commands, the transaction builder, signing, verification.
//! - **query** - Queries, the query builder, signing, verification.
//! - **wire** - Versioned binary encoding of signed payloads.
//!
//! ## Example
//!
//! ```
//! use ledger_protocol::crypto::Keypair;
//! use ledger_protocol::transaction::{sign_transaction, SignedTransaction, TransactionBuilder};
//! use ledger_protocol::wire;
//!
//! let keypair = Keypair::generate();
//! let tx = TransactionBuilder::new()
//!     .creator_account_id("admin@test")
//!     .created_time(ledger_protocol::now_ms())
//!     .add_peer("123.123.123.123:123", keypair.public_key().as_bytes())
//!     .build()
//!     .unwrap();
//!
//! let signed = sign_transaction(tx, &keypair).unwrap();
//! let bytes = wire::encode(&signed).unwrap();
//! let decoded: SignedTransaction = wire::decode(&bytes).unwrap();
//! assert_eq!(decoded, signed);
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Malformed input is an expected condition, never a panic.
//! 2. A payload that exists passed every rule. No best-effort output.
//! 3. No floating point anywhere near an amount.

pub mod config;
pub mod crypto;
pub mod permissions;
pub mod query;
pub mod transaction;
pub mod validation;
pub mod wire;

/// Current Unix time in milliseconds, clamped to zero before the epoch.
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

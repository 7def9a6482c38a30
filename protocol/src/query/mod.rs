//! # Query Module
//!
//! Read-only requests against ledger state. A query is built, signed by its
//! creator, and sent; the ledger answers it without changing anything.
//!
//! ```text
//! types.rs   - The Query tagged union and Pagination
//! builder.rs - QueryBuilder accumulator and UnsignedQuery
//! signing.rs - SignedQuery, signing and verification
//! ```

pub mod builder;
pub mod signing;
pub mod types;

pub use builder::{QueryBuilder, UnsignedQuery};
pub use signing::{sign_query, verify_query, QueryError, SignedQuery};
pub use types::{Pagination, Query};

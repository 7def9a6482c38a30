//! Query signing and verification.
//!
//! Unlike transactions, a query carries exactly one signature: the
//! creator's. There is no quorum to collect.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::builder::UnsignedQuery;
use crate::config::ValidationConfig;
use crate::crypto::{Hash, Keypair};
use crate::transaction::signing::{SignatureError, SignaturePair};
use crate::validation::ValidationError;
use crate::wire::EncodeError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid query: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// An [`UnsignedQuery`] with its creator's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedQuery {
    pub payload: UnsignedQuery,
    pub signature: SignaturePair,
}

impl SignedQuery {
    pub fn hash(&self) -> Result<Hash, EncodeError> {
        self.payload.hash()
    }

    pub fn verify_signature(&self) -> Result<(), SignatureError> {
        self.signature.verify(&self.payload.canonical_bytes()?)
    }
}

pub fn sign_query(query: UnsignedQuery, keypair: &Keypair) -> Result<SignedQuery, EncodeError> {
    let signature = SignaturePair::sign(&query.canonical_bytes()?, keypair);
    trace!(signer = %signature.public_key, "query signed");
    Ok(SignedQuery {
        payload: query,
        signature,
    })
}

/// Re-validate a received query at `now_ms` and check its signature.
pub fn verify_query(
    query: &SignedQuery,
    now_ms: u64,
    config: &ValidationConfig,
) -> Result<(), QueryError> {
    if let Some(first) = query.payload.validate(now_ms, config).into_first() {
        return Err(first.into());
    }
    query.verify_signature()?;
    Ok(())
}

//! Transaction batches.
//!
//! Several transactions can be submitted together as one batch. Every
//! member carries the same [`BatchMeta`]: the batch kind plus the reduced
//! hash of each member, in batch order. The reduced hash leaves the meta
//! out, so members can name each other without a circular dependency.
//!
//! A single transaction with no meta is a valid batch of one.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::builder::UnsignedTransaction;
use super::signing::SignedTransaction;
use crate::crypto::Hash;
use crate::validation::ValidationError;
use crate::wire::EncodeError;

/// How the ledger applies a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchKind {
    /// All members commit or none do.
    Atomic,
    /// Members are applied in order; a failing member is skipped.
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchMeta {
    pub kind: BatchKind,
    /// Reduced hash of every member, in batch order.
    pub reduced_hashes: Vec<Hash>,
}

impl BatchMeta {
    /// Hash lengths are fixed by [`Hash`]; the one rule left is that the
    /// list is not empty.
    pub(crate) fn check(&self) -> Result<(), ValidationError> {
        if self.reduced_hashes.is_empty() {
            return Err(ValidationError::EmptyRequiredField {
                field: "reduced_hashes",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("batch contains no transactions")]
    Empty,

    #[error("batch carries no signatures at all")]
    MissingSignatures,

    #[error("transaction #{index} carries no batch meta")]
    MissingBatchMeta { index: usize },

    #[error("batch meta lists {hashes} hashes for {transactions} transactions")]
    SizeMismatch { hashes: usize, transactions: usize },

    #[error("reduced hash of transaction #{index} does not match the batch meta")]
    HashMismatch { index: usize },

    #[error("transaction #{index} carries a different batch meta")]
    InconsistentBatchMeta { index: usize },

    #[error(transparent)]
    Encoding(#[from] EncodeError),
}

/// Stamp a shared [`BatchMeta`] onto each transaction.
///
/// The transactions must not be signed yet: the meta is part of the signed
/// payload.
///
/// # Errors
///
/// [`BatchError::Empty`] for an empty list, or an encoding failure while
/// computing reduced hashes.
pub fn assemble_batch(
    kind: BatchKind,
    mut transactions: Vec<UnsignedTransaction>,
) -> Result<Vec<UnsignedTransaction>, BatchError> {
    if transactions.is_empty() {
        return Err(BatchError::Empty);
    }
    let reduced_hashes = transactions
        .iter()
        .map(UnsignedTransaction::reduced_hash)
        .collect::<Result<Vec<_>, _>>()?;
    let meta = BatchMeta {
        kind,
        reduced_hashes,
    };
    for tx in &mut transactions {
        tx.batch_meta = Some(meta.clone());
    }
    debug!(?kind, size = transactions.len(), "batch assembled");
    Ok(transactions)
}

/// Check that a list of signed transactions forms a well-formed batch.
///
/// 1. At least one member is signed.
/// 2. A batch of more than one carries a meta on its first member.
/// 3. The meta lists exactly one hash per member.
/// 4. Each listed hash is the matching member's reduced hash, and every
///    member carries the same meta.
///
/// Individual signatures are not verified here; run
/// [`super::verify_transaction`] on each member for that.
pub fn validate_batch(transactions: &[SignedTransaction]) -> Result<(), BatchError> {
    let first = transactions.first().ok_or(BatchError::Empty)?;
    if transactions.iter().all(|tx| tx.signatures.is_empty()) {
        return Err(BatchError::MissingSignatures);
    }

    let meta = match &first.payload.batch_meta {
        Some(meta) => meta,
        None if transactions.len() == 1 => return Ok(()),
        None => return Err(BatchError::MissingBatchMeta { index: 0 }),
    };
    if meta.reduced_hashes.len() != transactions.len() {
        return Err(BatchError::SizeMismatch {
            hashes: meta.reduced_hashes.len(),
            transactions: transactions.len(),
        });
    }

    for (index, (expected, tx)) in meta.reduced_hashes.iter().zip(transactions).enumerate() {
        if tx.payload.reduced_hash()? != *expected {
            return Err(BatchError::HashMismatch { index });
        }
        match &tx.payload.batch_meta {
            Some(own) if own == meta => {}
            Some(_) => return Err(BatchError::InconsistentBatchMeta { index }),
            None => return Err(BatchError::MissingBatchMeta { index }),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::signing::sign_transaction;

    const NOW: u64 = 1_700_000_000_000;

    fn member(amount: &str) -> UnsignedTransaction {
        TransactionBuilder::new()
            .creator_account_id("admin@test")
            .created_time(NOW)
            .add_asset_quantity("coin#test", amount)
            .build_at(NOW)
            .unwrap()
    }

    fn signed_batch(kind: BatchKind, amounts: &[&str]) -> Vec<SignedTransaction> {
        let members = amounts.iter().map(|a| member(a)).collect();
        let keypair = Keypair::from_seed(&[3u8; 32]);
        assemble_batch(kind, members)
            .unwrap()
            .into_iter()
            .map(|tx| sign_transaction(tx, &keypair).unwrap())
            .collect()
    }

    #[test]
    fn assembled_batch_is_valid() {
        let batch = signed_batch(BatchKind::Atomic, &["1", "2", "3"]);
        assert_eq!(validate_batch(&batch), Ok(()));

        let meta = batch[0].payload.batch_meta.as_ref().unwrap();
        assert_eq!(meta.kind, BatchKind::Atomic);
        for (tx, hash) in batch.iter().zip(&meta.reduced_hashes) {
            assert_eq!(tx.payload.reduced_hash().unwrap(), *hash);
        }
    }

    #[test]
    fn lone_transaction_needs_no_meta() {
        let tx = sign_transaction(member("1"), &Keypair::generate()).unwrap();
        assert_eq!(validate_batch(&[tx]), Ok(()));
    }

    #[test]
    fn empty_batch_rejected() {
        assert_eq!(validate_batch(&[]), Err(BatchError::Empty));
        assert_eq!(assemble_batch(BatchKind::Ordered, Vec::new()), Err(BatchError::Empty));
    }

    #[test]
    fn unsigned_batch_rejected() {
        let mut batch = signed_batch(BatchKind::Ordered, &["1", "2"]);
        for tx in &mut batch {
            tx.signatures.clear();
        }
        assert_eq!(validate_batch(&batch), Err(BatchError::MissingSignatures));

        // One signed member is enough for this check.
        let mut partly = signed_batch(BatchKind::Ordered, &["1", "2"]);
        partly[1].signatures.clear();
        assert_eq!(validate_batch(&partly), Ok(()));
    }

    #[test]
    fn missing_meta_rejected() {
        let keypair = Keypair::generate();
        let batch = vec![
            sign_transaction(member("1"), &keypair).unwrap(),
            sign_transaction(member("2"), &keypair).unwrap(),
        ];
        assert_eq!(
            validate_batch(&batch),
            Err(BatchError::MissingBatchMeta { index: 0 })
        );
    }

    #[test]
    fn meta_size_mismatch_rejected() {
        let mut batch = signed_batch(BatchKind::Atomic, &["1", "2", "3"]);
        batch.pop();
        assert_eq!(
            validate_batch(&batch),
            Err(BatchError::SizeMismatch {
                hashes: 3,
                transactions: 2
            })
        );
    }

    #[test]
    fn wrong_hashes_rejected() {
        let mut batch = signed_batch(BatchKind::Atomic, &["1", "2"]);
        batch.swap(0, 1);
        assert_eq!(validate_batch(&batch), Err(BatchError::HashMismatch { index: 0 }));

        let mut replaced = signed_batch(BatchKind::Atomic, &["1", "2"]);
        let outsider = signed_batch(BatchKind::Atomic, &["9"]).remove(0);
        replaced[1] = outsider;
        assert_eq!(validate_batch(&replaced), Err(BatchError::HashMismatch { index: 1 }));
    }

    #[test]
    fn members_must_share_meta() {
        let mut batch = signed_batch(BatchKind::Atomic, &["1", "2"]);
        if let Some(meta) = batch[1].payload.batch_meta.as_mut() {
            meta.kind = BatchKind::Ordered;
        }
        assert_eq!(
            validate_batch(&batch),
            Err(BatchError::InconsistentBatchMeta { index: 1 })
        );

        batch[1].payload.batch_meta = None;
        assert_eq!(
            validate_batch(&batch),
            Err(BatchError::MissingBatchMeta { index: 1 })
        );
    }

    #[test]
    fn meta_is_covered_by_signatures() {
        let mut batch = signed_batch(BatchKind::Atomic, &["1", "2"]);
        assert!(batch[0].verify_signatures().is_ok());
        if let Some(meta) = batch[0].payload.batch_meta.as_mut() {
            meta.kind = BatchKind::Ordered;
        }
        assert!(batch[0].verify_signatures().is_err());
    }
}

//! Transaction signing with Ed25519 keypairs.
//!
//! Signing is a separate step from building because the keys may not be
//! available at construction time (remote signer, several co-signers). The
//! signed message is always [`UnsignedTransaction::canonical_bytes`].
//!
//! A transaction may carry several signatures, one per signatory, and is
//! executable once their count reaches the transaction quorum.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::builder::UnsignedTransaction;
use crate::crypto::{Hash, Keypair, PublicKey, Signature};
use crate::wire::EncodeError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("payload carries no signatures")]
    MissingSignature,

    #[error("signer {signer} already signed this payload")]
    DuplicateSigner { signer: String },

    #[error("signature by {signer} does not verify")]
    InvalidSignature { signer: String },

    #[error(transparent)]
    Encoding(#[from] EncodeError),
}

// ---------------------------------------------------------------------------
// SignaturePair
// ---------------------------------------------------------------------------

/// A signature together with the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl SignaturePair {
    pub(crate) fn sign(message: &[u8], keypair: &Keypair) -> Self {
        Self {
            public_key: keypair.public_key(),
            signature: keypair.sign(message),
        }
    }

    pub(crate) fn verify(&self, message: &[u8]) -> Result<(), SignatureError> {
        if self.public_key.verify(message, &self.signature) {
            Ok(())
        } else {
            Err(SignatureError::InvalidSignature {
                signer: self.public_key.to_hex(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// An [`UnsignedTransaction`] plus the signatures collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub payload: UnsignedTransaction,
    pub signatures: Vec<SignaturePair>,
}

impl SignedTransaction {
    /// Hash of the payload. Signatures do not contribute.
    pub fn hash(&self) -> Result<Hash, EncodeError> {
        self.payload.hash()
    }

    /// Co-sign with another key.
    ///
    /// # Errors
    ///
    /// [`SignatureError::DuplicateSigner`] if `keypair` has already signed.
    pub fn add_signature(&mut self, keypair: &Keypair) -> Result<(), SignatureError> {
        let public_key = keypair.public_key();
        if self.signatures.iter().any(|pair| pair.public_key == public_key) {
            return Err(SignatureError::DuplicateSigner {
                signer: public_key.to_hex(),
            });
        }
        self.signatures
            .push(SignaturePair::sign(&self.payload.canonical_bytes()?, keypair));
        trace!(signer = %public_key, count = self.signatures.len(), "transaction co-signed");
        Ok(())
    }

    /// Check that there is at least one signature, no signer appears twice,
    /// and every signature verifies over the canonical bytes.
    pub fn verify_signatures(&self) -> Result<(), SignatureError> {
        if self.signatures.is_empty() {
            return Err(SignatureError::MissingSignature);
        }
        let message = self.payload.canonical_bytes()?;
        for (index, pair) in self.signatures.iter().enumerate() {
            if self.signatures[..index]
                .iter()
                .any(|earlier| earlier.public_key == pair.public_key)
            {
                return Err(SignatureError::DuplicateSigner {
                    signer: pair.public_key.to_hex(),
                });
            }
            pair.verify(&message)?;
        }
        Ok(())
    }

    /// Whether enough signatures have been collected to meet the quorum.
    /// Does not verify them.
    pub fn has_quorum(&self) -> bool {
        self.signatures.len() >= self.payload.quorum.get() as usize
    }
}

/// Sign a built transaction, producing a [`SignedTransaction`] with exactly
/// one signature.
///
/// # Example
///
/// ```
/// use ledger_protocol::crypto::Keypair;
/// use ledger_protocol::transaction::{sign_transaction, TransactionBuilder};
///
/// let keypair = Keypair::generate();
/// let tx = TransactionBuilder::new()
///     .creator_account_id("admin@test")
///     .created_time(ledger_protocol::now_ms())
///     .create_domain("test", "user")
///     .build()
///     .unwrap();
///
/// let signed = sign_transaction(tx, &keypair).unwrap();
/// assert!(signed.verify_signatures().is_ok());
/// ```
pub fn sign_transaction(
    tx: UnsignedTransaction,
    keypair: &Keypair,
) -> Result<SignedTransaction, EncodeError> {
    let pair = SignaturePair::sign(&tx.canonical_bytes()?, keypair);
    trace!(signer = %pair.public_key, "transaction signed");
    Ok(SignedTransaction {
        payload: tx,
        signatures: vec![pair],
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

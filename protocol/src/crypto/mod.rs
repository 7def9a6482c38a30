//! # Cryptographic Primitives
//!
//! The core never does curve math itself. This module is a thin, type-safe
//! wrapper around audited implementations, giving the rest of the crate
//! three things:
//!
//! - **SHA-256** digests ([`Hash`]) for payload identity.
//! - **Ed25519** keypairs and signatures for the signer capability.
//! - Fixed-length byte types so that a 31-byte "public key" cannot exist.

pub mod hash;
pub mod keys;

pub use hash::{sha256, Hash};
pub use keys::{KeyError, Keypair, PublicKey, Signature};

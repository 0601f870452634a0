//! Cryptographic primitives for cfgpin.
//!
//! Provides domain-separated BLAKE3 content hashing and the ed25519 owning
//! credential that both derives a mutable [`Name`](cfgpin_types::Name) and
//! signs its revisions.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod hasher;
pub mod signer;

pub use hasher::ContentHasher;
pub use signer::{OwningCredential, PublicKey, Signature, SignatureError};

//! Foundation types for cfgpin.
//!
//! This crate provides the identifier types shared by every other cfgpin
//! crate. It has no knowledge of networks, keys, or encodings.
//!
//! # Key Types
//!
//! - [`ContentId`] — Opaque, self-verifying handle to one stored byte sequence
//! - [`Name`] — Mutable public name derived from an ed25519 public key
//! - [`ServiceCredential`] — Opaque token for the pinning service

pub mod content;
pub mod credential;
pub mod error;
pub mod name;

pub use content::ContentId;
pub use credential::ServiceCredential;
pub use error::TypeError;
pub use name::Name;

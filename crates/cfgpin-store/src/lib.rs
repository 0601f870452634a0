//! Content uploader for cfgpin.
//!
//! Pins immutable byte blobs to a content-addressed store and returns the
//! identifier the store assigned. A pinned blob is durably stored and
//! publicly fetchable; nothing in this crate can remove it again.
//!
//! # Backends
//!
//! All backends implement the [`ContentUploader`] trait:
//!
//! - [`HttpPinningService`] -- remote pinning API over HTTPS
//! - [`InMemoryPinStore`] -- `HashMap`-based store for tests and dry runs
//!
//! # Upload Rules
//!
//! 1. A missing credential is a configuration error; no request is made.
//! 2. The credential is checked with the service before any data is sent.
//! 3. Transfer failures are reported as-is and never retried here.

pub mod error;
pub mod http;
pub mod memory;
pub mod metadata;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use http::{HttpPinningConfig, HttpPinningService};
pub use memory::{InMemoryPinStore, PinnedBlob};
pub use metadata::UploadMetadata;
pub use traits::{is_configured, ContentUploader};

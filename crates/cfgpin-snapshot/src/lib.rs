//! Configuration snapshots for cfgpin.
//!
//! A [`Snapshot`] is an ordered key/value mapping of strings, as produced by
//! the editing surface. [`SnapshotCodec`] turns it into the canonical bytes
//! that get pinned and addressed by content.
//!
//! # Canonical form
//!
//! Encoding sorts keys, so two snapshots holding the same entries in a
//! different insertion order encode to identical bytes and therefore receive
//! the same content identifier. Insertion order is kept in memory for
//! display only.

pub mod codec;
pub mod error;
pub mod snapshot;

pub use codec::SnapshotCodec;
pub use error::{SnapshotError, SnapshotResult};
pub use snapshot::Snapshot;

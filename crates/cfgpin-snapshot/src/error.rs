//! Error types for snapshot editing and encoding.

use thiserror::Error;

/// Errors that can occur while editing, encoding, or decoding a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// A key was empty.
    #[error("snapshot keys must not be empty")]
    EmptyKey,

    /// The key to rename or remove does not exist.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// The rename target already exists.
    #[error("key already exists: {key}")]
    KeyExists { key: String },

    /// A structured value cannot be coerced into a string.
    #[error("value for {key} is a {kind}, only scalars are allowed")]
    UnsupportedValue { key: String, kind: &'static str },

    /// The input was not a key/value object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// Serialization or deserialization failure.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Convenience type alias for snapshot operations.
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

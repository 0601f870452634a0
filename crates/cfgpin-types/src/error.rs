use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid content identifier: {0}")]
    InvalidContentId(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("empty service credential")]
    EmptyCredential,
}

use cfgpin_names::{NameUpdateError, ResolutionError};
use cfgpin_snapshot::SnapshotError;
use cfgpin_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// A failed publish step.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] SnapshotError),

    #[error(transparent)]
    Upload(#[from] StoreError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    NameUpdate(#[from] NameUpdateError),
}

/// Coarse classification of a [`PublishError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed configuration; nothing was attempted.
    Configuration,
    /// The pinning service rejected the credential.
    Authentication,
    /// Storing the snapshot failed in transit.
    Transfer,
    /// The current binding of a name could not be read.
    Resolution,
    /// The name could not be advanced.
    NameUpdate,
    /// The snapshot could not be serialized.
    Encoding,
}

impl PublishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Upload(StoreError::Configuration(_)) => ErrorKind::Configuration,
            Self::Upload(StoreError::Authentication(_)) => ErrorKind::Authentication,
            Self::Upload(StoreError::Transfer(_)) => ErrorKind::Transfer,
            Self::Resolution(_) => ErrorKind::Resolution,
            Self::NameUpdate(_) => ErrorKind::NameUpdate,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::Transfer => "transfer",
            Self::Resolution => "resolution",
            Self::NameUpdate => "name update",
            Self::Encoding => "encoding",
        };
        f.write_str(s)
    }
}

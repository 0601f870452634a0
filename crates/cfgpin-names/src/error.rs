//! Error types for naming operations.

use cfgpin_types::Name;
use thiserror::Error;

/// Errors reported by a naming network.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// The network could not be reached or answered with a server fault.
    #[error("naming network unreachable: {0}")]
    Unreachable(String),

    /// The network refused a revision (stale sequence, bad signature, expired).
    #[error("revision rejected: {0}")]
    Rejected(String),

    /// A record failed verification or could not be decoded.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Convenience type alias for naming network operations.
pub type NameResult<T> = std::result::Result<T, NameError>;

/// Resolving a name failed. A name that was never published is not an
/// error; see [`ResolutionStatus::NotPublished`](crate::ResolutionStatus).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("resolving {name} failed: {source}")]
pub struct ResolutionError {
    pub name: Name,
    #[source]
    pub source: NameError,
}

/// Binding a name to new content failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NameUpdateError {
    /// The current revision could not be read, so no next revision was built.
    #[error("could not read current revision: {0}")]
    Resolve(#[from] ResolutionError),

    /// The signed revision was not accepted.
    #[error("publishing {name} failed: {source}")]
    Publish {
        name: Name,
        #[source]
        source: NameError,
    },
}

/// Errors from content upload operations.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No usable service credential; nothing was sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service rejected the credential.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or service failure while storing. May be transient.
    #[error("transfer failed: {0}")]
    Transfer(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or querying the environment registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported registry format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The document is not valid TOML/JSON of the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// An environment entry is unusable. Never carries secret values.
    #[error("environment {environment}: {reason}")]
    Configuration { environment: String, reason: String },

    /// No environment with this label.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

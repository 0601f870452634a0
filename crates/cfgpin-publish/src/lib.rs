//! Publisher orchestrator for cfgpin.
//!
//! [`Publisher::publish`] encodes a snapshot, pins it, and, when the
//! environment holds its owning credential, points the environment's
//! mutable name at the new content. The two remote steps cannot be made
//! transactional, so every call returns a [`PublishOutcome`] that reports
//! each step separately instead of failing as a whole.

pub mod config;
pub mod error;
pub mod outcome;
pub mod publisher;

pub use config::PublisherConfig;
pub use error::{ErrorKind, PublishError};
pub use outcome::{
    NameUpdateResult, PreviousBinding, PublishOutcome, PublishStage, SkipReason, UploadResult,
};
pub use publisher::{is_configured, status_message, Publisher};

pub use cfgpin_names::{NameResolver, ResolutionRequest};
pub use cfgpin_registry::EnvironmentRecord;
pub use cfgpin_snapshot::Snapshot;
pub use cfgpin_store::ContentUploader;

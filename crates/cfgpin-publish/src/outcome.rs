//! Itemized results of one publish call.

use std::fmt;

use cfgpin_names::{Resolution, ResolutionStatus};
use cfgpin_types::{ContentId, Name};

use crate::error::{ErrorKind, PublishError};

/// Where a publish call is, or where it stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublishStage {
    Uploading,
    Uploaded,
    UploadFailed,
    NameSkipped,
    NameUpdating,
    NameUpdated,
    NameUpdateFailed,
}

impl PublishStage {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::UploadFailed | Self::NameSkipped | Self::NameUpdated | Self::NameUpdateFailed
        )
    }
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::UploadFailed => "upload failed",
            Self::NameSkipped => "name skipped",
            Self::NameUpdating => "name updating",
            Self::NameUpdated => "name updated",
            Self::NameUpdateFailed => "name update failed",
        };
        f.write_str(s)
    }
}

/// Result of the upload step.
#[derive(Debug)]
pub enum UploadResult {
    Uploaded {
        content_id: ContentId,
        /// Gateway URL of this exact snapshot.
        url: String,
    },
    Failed {
        error: PublishError,
    },
}

/// Why the name was left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The environment does not hold its owning credential.
    NoCredential,
    /// Nothing was uploaded, so there was nothing to point at.
    UploadFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredential => f.write_str("no credential"),
            Self::UploadFailed => f.write_str("upload failed"),
        }
    }
}

/// Result of the name update step.
#[derive(Debug)]
pub enum NameUpdateResult {
    Updated {
        name: Name,
        /// Gateway URL that follows the name.
        reachable_as: String,
        sequence: u64,
    },
    Failed {
        error: PublishError,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// What the name pointed at before this publish, as far as could be told.
///
/// Purely informational: an unreadable binding never stops a publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviousBinding {
    Published { content_id: ContentId, sequence: u64 },
    NotPublished,
    Unknown { reason: String },
    /// The lookup was not attempted.
    NotChecked,
}

impl From<Resolution> for PreviousBinding {
    fn from(resolution: Resolution) -> Self {
        match resolution.status {
            ResolutionStatus::Published {
                content_id,
                sequence,
            } => Self::Published {
                content_id,
                sequence,
            },
            ResolutionStatus::NotPublished => Self::NotPublished,
        }
    }
}

impl PreviousBinding {
    pub fn content_id(&self) -> Option<&ContentId> {
        match self {
            Self::Published { content_id, .. } => Some(content_id),
            _ => None,
        }
    }
}

/// Combined result of [`Publisher::publish`](crate::Publisher::publish).
#[derive(Debug)]
pub struct PublishOutcome {
    /// Environment label the call published for.
    pub environment: String,
    pub upload: UploadResult,
    pub name_update: NameUpdateResult,
    pub previous: PreviousBinding,
    /// Non-fatal problems noticed along the way.
    pub warnings: Vec<String>,
}

impl PublishOutcome {
    /// The terminal stage this call reached.
    pub fn stage(&self) -> PublishStage {
        match (&self.upload, &self.name_update) {
            (UploadResult::Failed { .. }, _) => PublishStage::UploadFailed,
            (_, NameUpdateResult::Updated { .. }) => PublishStage::NameUpdated,
            (_, NameUpdateResult::Failed { .. }) => PublishStage::NameUpdateFailed,
            (_, NameUpdateResult::Skipped { .. }) => PublishStage::NameSkipped,
        }
    }

    /// The stored snapshot's identifier, if the upload succeeded.
    pub fn content_id(&self) -> Option<&ContentId> {
        match &self.upload {
            UploadResult::Uploaded { content_id, .. } => Some(content_id),
            UploadResult::Failed { .. } => None,
        }
    }

    /// Nothing was stored and no name changed.
    pub fn nothing_happened(&self) -> bool {
        self.content_id().is_none()
    }

    /// Stored, and the name now points at it.
    pub fn is_fully_published(&self) -> bool {
        self.stage() == PublishStage::NameUpdated
    }

    /// Stored, but the name still points where it did before.
    pub fn is_partial(&self) -> bool {
        self.content_id().is_some() && !self.is_fully_published()
    }

    /// Every error in the outcome, upload first.
    pub fn errors(&self) -> impl Iterator<Item = &PublishError> {
        let upload = match &self.upload {
            UploadResult::Failed { error } => Some(error),
            UploadResult::Uploaded { .. } => None,
        };
        let name = match &self.name_update {
            NameUpdateResult::Failed { error } => Some(error),
            _ => None,
        };
        upload.into_iter().chain(name)
    }

    /// Error classes present in the outcome.
    pub fn error_kinds(&self) -> Vec<ErrorKind> {
        self.errors().map(PublishError::kind).collect()
    }

    /// One line suitable for a status bar or log.
    pub fn summary(&self) -> String {
        match (&self.upload, &self.name_update) {
            (UploadResult::Failed { error }, _) => {
                format!("{}: nothing published ({} error: {error})", self.environment, error.kind())
            }
            (UploadResult::Uploaded { content_id, .. }, NameUpdateResult::Updated { name, .. }) => {
                format!(
                    "{}: published {} under {}",
                    self.environment,
                    content_id.short_id(),
                    name.short_id()
                )
            }
            (UploadResult::Uploaded { content_id, .. }, NameUpdateResult::Failed { error }) => {
                format!(
                    "{}: stored {} but the name was not updated ({error})",
                    self.environment,
                    content_id.short_id()
                )
            }
            (UploadResult::Uploaded { content_id, .. }, NameUpdateResult::Skipped { reason }) => {
                format!(
                    "{}: stored {}, name not updated ({reason})",
                    self.environment,
                    content_id.short_id()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgpin_names::{NameError, NameUpdateError, ResolutionError};
    use cfgpin_store::StoreError;

    fn cid() -> ContentId {
        ContentId::parse("bafyone").unwrap()
    }

    fn name() -> Name {
        Name::from_public_key_bytes([1; 32])
    }

    fn outcome(upload: UploadResult, name_update: NameUpdateResult) -> PublishOutcome {
        PublishOutcome {
            environment: "staging".into(),
            upload,
            name_update,
            previous: PreviousBinding::NotPublished,
            warnings: Vec::new(),
        }
    }

    fn uploaded() -> UploadResult {
        UploadResult::Uploaded {
            content_id: cid(),
            url: "https://w3s.link/ipfs/bafyone".into(),
        }
    }

    #[test]
    fn upload_failure_means_nothing_happened() {
        let o = outcome(
            UploadResult::Failed {
                error: StoreError::Transfer("reset".into()).into(),
            },
            NameUpdateResult::Skipped {
                reason: SkipReason::UploadFailed,
            },
        );
        assert_eq!(o.stage(), PublishStage::UploadFailed);
        assert!(o.nothing_happened());
        assert!(!o.is_partial());
        assert_eq!(o.error_kinds(), vec![ErrorKind::Transfer]);
        assert!(o.summary().contains("nothing published"));
    }

    #[test]
    fn name_failure_is_partial() {
        let error = NameUpdateError::Resolve(ResolutionError {
            name: name(),
            source: NameError::Unreachable("down".into()),
        });
        let o = outcome(
            uploaded(),
            NameUpdateResult::Failed {
                error: error.into(),
            },
        );
        assert_eq!(o.stage(), PublishStage::NameUpdateFailed);
        assert!(o.is_partial());
        assert_eq!(o.content_id(), Some(&cid()));
        assert_eq!(o.error_kinds(), vec![ErrorKind::NameUpdate]);
    }

    #[test]
    fn skipped_and_updated_stages() {
        let skipped = outcome(
            uploaded(),
            NameUpdateResult::Skipped {
                reason: SkipReason::NoCredential,
            },
        );
        assert_eq!(skipped.stage(), PublishStage::NameSkipped);
        assert!(skipped.summary().contains("no credential"));

        let updated = outcome(
            uploaded(),
            NameUpdateResult::Updated {
                name: name(),
                reachable_as: format!("https://w3s.link/ipns/{}", name()),
                sequence: 0,
            },
        );
        assert!(updated.is_fully_published());
        assert!(updated.stage().is_terminal());
        assert!(updated.errors().next().is_none());
    }

    #[test]
    fn intermediate_stages_are_not_terminal() {
        assert!(!PublishStage::Uploading.is_terminal());
        assert!(!PublishStage::NameUpdating.is_terminal());
    }
}

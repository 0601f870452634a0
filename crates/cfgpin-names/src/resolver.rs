//! [`NameResolver`]: resolution by credential or by name, and publishing.

use std::sync::Arc;

use cfgpin_crypto::OwningCredential;
use cfgpin_types::{ContentId, Name};
use chrono::{DurationRound, Utc};
use tracing::{debug, info};

use crate::error::{NameError, NameUpdateError, ResolutionError};
use crate::record::NameRecord;
use crate::traits::NamingNetwork;

/// How to identify the name being resolved.
#[derive(Clone, Debug)]
pub enum ResolutionRequest<'a> {
    /// Derive the name from an owning credential. Proves the caller may
    /// publish a new revision afterwards.
    ByCredential(&'a OwningCredential),
    /// Look up a bare public name. Read-only.
    ByName(Name),
}

impl ResolutionRequest<'_> {
    /// The name this request refers to.
    pub fn name(&self) -> Name {
        match self {
            Self::ByCredential(credential) => credential.name(),
            Self::ByName(name) => name.clone(),
        }
    }
}

/// Current binding of a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// The name points at `content_id` as of revision `sequence`.
    Published { content_id: ContentId, sequence: u64 },
    /// The name has never been published.
    NotPublished,
}

/// Result of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved name (derived from the credential for `ByCredential`).
    pub name: Name,
    pub status: ResolutionStatus,
}

impl Resolution {
    /// Current content identifier, if the name has been published.
    pub fn content_id(&self) -> Option<&ContentId> {
        match &self.status {
            ResolutionStatus::Published { content_id, .. } => Some(content_id),
            ResolutionStatus::NotPublished => None,
        }
    }

    /// Current revision number, if the name has been published.
    pub fn sequence(&self) -> Option<u64> {
        match &self.status {
            ResolutionStatus::Published { sequence, .. } => Some(*sequence),
            ResolutionStatus::NotPublished => None,
        }
    }
}

/// Result of a successful name update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameUpdate {
    pub name: Name,
    /// The value the name now points at.
    pub content_id: ContentId,
    pub sequence: u64,
    /// The value the name pointed at before this update.
    pub previous: Option<ContentId>,
}

/// Resolves and publishes mutable names on a [`NamingNetwork`].
#[derive(Clone)]
pub struct NameResolver {
    network: Arc<dyn NamingNetwork>,
    record_validity: chrono::Duration,
}

impl NameResolver {
    /// Default lifetime of a published revision.
    pub const DEFAULT_VALIDITY_DAYS: i64 = 365;

    pub fn new(network: Arc<dyn NamingNetwork>) -> Self {
        Self {
            network,
            record_validity: chrono::Duration::days(Self::DEFAULT_VALIDITY_DAYS),
        }
    }

    /// Override how long published revisions stay valid.
    pub fn with_validity(mut self, validity: chrono::Duration) -> Self {
        self.record_validity = validity;
        self
    }

    /// Resolve a name to its current content identifier.
    ///
    /// A name that was never published resolves to
    /// [`ResolutionStatus::NotPublished`]; only transport faults and records
    /// that fail verification are errors.
    pub async fn resolve(
        &self,
        request: ResolutionRequest<'_>,
    ) -> Result<Resolution, ResolutionError> {
        let name = request.name();
        let fail = |source: NameError| ResolutionError {
            name: name.clone(),
            source,
        };

        let record = self.network.resolve(&name).await.map_err(fail)?;
        let status = match record {
            None => ResolutionStatus::NotPublished,
            Some(record) => {
                if record.name != name {
                    return Err(fail(NameError::InvalidRecord(format!(
                        "network answered with a record for {}",
                        record.name.short_id()
                    ))));
                }
                record.verify().map_err(fail)?;
                ResolutionStatus::Published {
                    content_id: record.value,
                    sequence: record.sequence,
                }
            }
        };
        debug!(name = %name, ?status, "resolved name");
        Ok(Resolution { name, status })
    }

    /// Point the credential's name at `content_id`.
    ///
    /// Reads the current revision, then signs and submits the next one
    /// (sequence 0 for a first publication). Never retried.
    pub async fn publish(
        &self,
        credential: &OwningCredential,
        content_id: &ContentId,
    ) -> Result<NameUpdate, NameUpdateError> {
        let current = self
            .resolve(ResolutionRequest::ByCredential(credential))
            .await?;
        let sequence = match current.sequence() {
            None => 0,
            Some(s) => s.checked_add(1).ok_or_else(|| NameUpdateError::Publish {
                name: current.name.clone(),
                source: NameError::Rejected("revision sequence exhausted".into()),
            })?,
        };
        let validity = Utc::now() + self.record_validity;
        // Signatures cover whole seconds only.
        let validity = validity
            .duration_trunc(chrono::Duration::seconds(1))
            .unwrap_or(validity);

        let record = NameRecord::sign(credential, content_id.clone(), sequence, validity);
        self.network
            .publish(&record)
            .await
            .map_err(|source| NameUpdateError::Publish {
                name: current.name.clone(),
                source,
            })?;

        info!(name = %current.name, content_id = %content_id, sequence, "name updated");
        Ok(NameUpdate {
            previous: current.content_id().cloned(),
            name: current.name,
            content_id: content_id.clone(),
            sequence,
        })
    }
}

impl std::fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameResolver")
            .field("record_validity", &self.record_validity)
            .finish()
    }
}

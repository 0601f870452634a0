//! The [`Publisher`] orchestrator.

use std::sync::Arc;

use cfgpin_names::{NameResolver, Resolution, ResolutionRequest};
use cfgpin_registry::EnvironmentRecord;
use cfgpin_snapshot::{Snapshot, SnapshotCodec};
use cfgpin_store::{ContentUploader, StoreError, UploadMetadata};
use cfgpin_types::ContentId;
use tracing::{debug, info, warn};

use crate::config::PublisherConfig;
use crate::error::PublishError;
use crate::outcome::{
    NameUpdateResult, PreviousBinding, PublishOutcome, PublishStage, SkipReason, UploadResult,
};

pub use cfgpin_store::is_configured;

/// Status line shown while a publish for `label` is in flight.
pub fn status_message(label: &str) -> String {
    format!("Publishing configuration for {label}...")
}

/// Sequences snapshot upload and name update for one environment at a time.
///
/// Holds no per-call state; concurrent calls are independent.
#[derive(Clone)]
pub struct Publisher {
    uploader: Arc<dyn ContentUploader>,
    resolver: NameResolver,
    config: PublisherConfig,
}

impl Publisher {
    pub fn new(uploader: Arc<dyn ContentUploader>, resolver: NameResolver) -> Self {
        Self {
            uploader,
            resolver,
            config: PublisherConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PublisherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// Current binding of the environment's name.
    ///
    /// Resolves through the owning credential when the environment holds
    /// one, otherwise by the configured public name.
    pub async fn resolve(&self, record: &EnvironmentRecord) -> Result<Resolution, PublishError> {
        let request = match &record.credential {
            Some(credential) => ResolutionRequest::ByCredential(credential),
            None => ResolutionRequest::ByName(record.public_name.clone()),
        };
        Ok(self.resolver.resolve(request).await?)
    }

    /// Advisory lookup of what the name points at right now.
    pub async fn previous(&self, record: &EnvironmentRecord) -> PreviousBinding {
        match self.resolve(record).await {
            Ok(resolution) => resolution.into(),
            Err(e) => {
                warn!(environment = %record.label, error = %e, "could not read current binding");
                PreviousBinding::Unknown {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Publish `snapshot` for the environment described by `record`.
    ///
    /// Never fails as a whole: each step's result is reported in the
    /// returned [`PublishOutcome`]. The name is only touched after the
    /// upload has succeeded, and a failed name update never undoes the
    /// upload.
    pub async fn publish(&self, snapshot: &Snapshot, record: &EnvironmentRecord) -> PublishOutcome {
        let label = record.label.as_str();
        let mut warnings = Vec::new();

        if let Some(derived) = record.name_mismatch() {
            warn!(
                environment = %label,
                configured = %record.public_name,
                derived = %derived,
                "configured public name does not match the credential; using the credential's name"
            );
            warnings.push(format!(
                "configured public name {} does not match the credential; publishing to {}",
                record.public_name.short_id(),
                derived.short_id()
            ));
        }

        // A missing service credential fails before any network I/O.
        if !is_configured(record.service_credential.as_ref()) {
            let error = PublishError::from(StoreError::Configuration(
                "no service credential configured".into(),
            ));
            warn!(environment = %label, kind = %error.kind(), "upload not attempted");
            return PublishOutcome {
                environment: label.to_string(),
                upload: UploadResult::Failed { error },
                name_update: NameUpdateResult::Skipped {
                    reason: SkipReason::UploadFailed,
                },
                previous: PreviousBinding::NotChecked,
                warnings,
            };
        }

        let previous = self.previous(record).await;
        if let PreviousBinding::Unknown { reason } = &previous {
            warnings.push(format!("previous binding unknown: {reason}"));
        }

        debug!(environment = %label, stage = %PublishStage::Uploading);
        let content_id = match self.upload(snapshot, record).await {
            Ok(id) => id,
            Err(error) => {
                warn!(environment = %label, kind = %error.kind(), error = %error, "upload failed");
                return PublishOutcome {
                    environment: label.to_string(),
                    upload: UploadResult::Failed { error },
                    name_update: NameUpdateResult::Skipped {
                        reason: SkipReason::UploadFailed,
                    },
                    previous,
                    warnings,
                };
            }
        };
        info!(environment = %label, content_id = %content_id, stage = %PublishStage::Uploaded, "snapshot stored");

        let upload = UploadResult::Uploaded {
            url: self.config.content_url(&content_id),
            content_id: content_id.clone(),
        };

        let name_update = match &record.credential {
            None => {
                info!(environment = %label, stage = %PublishStage::NameSkipped, "no credential, name left unchanged");
                NameUpdateResult::Skipped {
                    reason: SkipReason::NoCredential,
                }
            }
            Some(credential) => {
                debug!(environment = %label, stage = %PublishStage::NameUpdating);
                match self.resolver.publish(credential, &content_id).await {
                    Ok(update) => NameUpdateResult::Updated {
                        reachable_as: self.config.name_url(&update.name),
                        name: update.name,
                        sequence: update.sequence,
                    },
                    Err(e) => {
                        warn!(environment = %label, error = %e, stage = %PublishStage::NameUpdateFailed, "content stored but name not updated");
                        NameUpdateResult::Failed { error: e.into() }
                    }
                }
            }
        };

        PublishOutcome {
            environment: label.to_string(),
            upload,
            name_update,
            previous,
            warnings,
        }
    }

    async fn upload(
        &self,
        snapshot: &Snapshot,
        record: &EnvironmentRecord,
    ) -> Result<ContentId, PublishError> {
        let bytes = SnapshotCodec::encode(snapshot)?;
        let metadata = UploadMetadata::snapshot(record.label.as_str());
        let filename = self.config.filename_for(&record.label);
        let id = self
            .uploader
            .upload(
                &bytes,
                &filename,
                record.service_credential.as_ref(),
                &metadata,
            )
            .await?;
        Ok(id)
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use cfgpin_crypto::OwningCredential;
    use cfgpin_names::{InMemoryNameNetwork, ResolutionStatus};
    use cfgpin_store::InMemoryPinStore;
    use cfgpin_types::ServiceCredential;

    struct Harness {
        store: Arc<InMemoryPinStore>,
        network: Arc<InMemoryNameNetwork>,
        publisher: Publisher,
    }

    fn harness_with(store: InMemoryPinStore) -> Harness {
        let store = Arc::new(store);
        let network = Arc::new(InMemoryNameNetwork::new());
        let publisher = Publisher::new(store.clone(), NameResolver::new(network.clone()));
        Harness {
            store,
            network,
            publisher,
        }
    }

    fn harness() -> Harness {
        harness_with(InMemoryPinStore::new())
    }

    fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn token(s: &str) -> ServiceCredential {
        ServiceCredential::new(s).unwrap()
    }

    fn owned(label: &str, cred: &OwningCredential) -> EnvironmentRecord {
        EnvironmentRecord::read_only(label, cred.name())
            .with_credential(cred.clone())
            .with_service_credential(token("tok"))
    }

    // A: no owning credential, upload only.
    #[tokio::test]
    async fn without_credential_uploads_and_skips_name() {
        let h = harness();
        let cred = OwningCredential::generate();
        let record =
            EnvironmentRecord::read_only("staging", cred.name()).with_service_credential(token("tok"));
        let outcome = h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;

        assert_eq!(outcome.stage(), PublishStage::NameSkipped);
        assert!(matches!(
            outcome.name_update,
            NameUpdateResult::Skipped {
                reason: SkipReason::NoCredential
            }
        ));
        let id = outcome.content_id().unwrap();
        assert!(h.store.contains(id));
        assert_eq!(h.network.publish_calls(), 0);
    }

    // B: credential present, later resolution sees the new content.
    #[tokio::test]
    async fn with_credential_updates_name() {
        let h = harness();
        let cred = OwningCredential::generate();
        let record = owned("production", &cred);
        let outcome = h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;

        assert!(outcome.is_fully_published());
        assert_eq!(outcome.previous, PreviousBinding::NotPublished);
        let id = outcome.content_id().unwrap().clone();
        match &outcome.name_update {
            NameUpdateResult::Updated {
                name,
                reachable_as,
                sequence,
            } => {
                assert_eq!(name, &cred.name());
                assert_eq!(*sequence, 0);
                assert_eq!(reachable_as, &format!("https://w3s.link/ipns/{}", cred.name()));
            }
            other => panic!("unexpected {other:?}"),
        }

        let by_name = EnvironmentRecord::read_only("production", cred.name());
        let resolution = h.publisher.resolve(&by_name).await.unwrap();
        assert_eq!(
            resolution.status,
            ResolutionStatus::Published {
                content_id: id,
                sequence: 0
            }
        );
    }

    // C: missing or rejected service credential stores nothing.
    #[tokio::test]
    async fn missing_service_credential_is_configuration_error() {
        let h = harness();
        let cred = OwningCredential::generate();
        let record = EnvironmentRecord::read_only("dev", cred.name()).with_credential(cred.clone());
        let outcome = h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;

        assert!(outcome.nothing_happened());
        assert_eq!(outcome.error_kinds(), vec![ErrorKind::Configuration]);
        assert!(matches!(
            outcome.name_update,
            NameUpdateResult::Skipped {
                reason: SkipReason::UploadFailed
            }
        ));
        assert!(h.store.is_empty());
        assert_eq!(h.network.publish_calls(), 0);
        assert_eq!(h.network.resolve_calls(), 0);
        assert_eq!(outcome.previous, PreviousBinding::NotChecked);
    }

    #[tokio::test]
    async fn missing_service_credential_fails_even_with_naming_down() {
        let h = harness();
        h.network.set_offline(true);
        let cred = OwningCredential::generate();
        let record = EnvironmentRecord::read_only("dev", cred.name()).with_credential(cred.clone());
        let outcome = h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;

        assert_eq!(outcome.error_kinds(), vec![ErrorKind::Configuration]);
        assert_eq!(h.network.resolve_calls(), 0);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn rejected_service_credential_is_authentication_error() {
        let h = harness_with(InMemoryPinStore::new().with_accepted_token("good"));
        let cred = OwningCredential::generate();
        let record = EnvironmentRecord::read_only("dev", cred.name())
            .with_credential(cred.clone())
            .with_service_credential(token("bad"));
        let outcome = h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;

        assert_eq!(outcome.stage(), PublishStage::UploadFailed);
        assert_eq!(outcome.error_kinds(), vec![ErrorKind::Authentication]);
        assert!(h.store.is_empty());
        assert_eq!(h.network.publish_calls(), 0);
    }

    // D: naming network down after a successful upload.
    #[tokio::test]
    async fn naming_outage_keeps_upload() {
        let h = harness();
        let cred = OwningCredential::generate();
        h.network.set_offline(true);
        let outcome = h
            .publisher
            .publish(&snapshot(&[("a", "1")]), &owned("production", &cred))
            .await;

        assert_eq!(outcome.stage(), PublishStage::NameUpdateFailed);
        assert!(outcome.is_partial());
        assert!(h.store.contains(outcome.content_id().unwrap()));
        assert_eq!(outcome.error_kinds(), vec![ErrorKind::NameUpdate]);
        assert!(matches!(outcome.previous, PreviousBinding::Unknown { .. }));
        assert!(outcome.warnings.iter().any(|w| w.contains("previous binding unknown")));
    }

    #[tokio::test]
    async fn transfer_failure_never_touches_name() {
        let h = harness();
        h.store.fail_transfers("connection reset");
        let cred = OwningCredential::generate();
        let outcome = h
            .publisher
            .publish(&snapshot(&[("a", "1")]), &owned("production", &cred))
            .await;

        assert_eq!(outcome.error_kinds(), vec![ErrorKind::Transfer]);
        assert_eq!(h.network.publish_calls(), 0);
    }

    #[tokio::test]
    async fn name_points_at_stored_content() {
        let h = harness();
        let cred = OwningCredential::generate();
        let record = owned("production", &cred);
        h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;
        h.publisher.publish(&snapshot(&[("a", "2")]), &record).await;

        let published = h.network.published();
        assert_eq!(published.len(), 2);
        for (_, id) in &published {
            assert!(h.store.contains(id));
        }
    }

    #[tokio::test]
    async fn second_publish_reports_previous() {
        let h = harness();
        let cred = OwningCredential::generate();
        let record = owned("production", &cred);
        let first = h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;
        let second = h.publisher.publish(&snapshot(&[("a", "2")]), &record).await;

        assert_eq!(second.previous.content_id(), first.content_id());
        assert!(matches!(
            second.name_update,
            NameUpdateResult::Updated { sequence: 1, .. }
        ));
    }

    #[tokio::test]
    async fn upload_carries_filename_and_metadata() {
        let h = harness();
        let cred = OwningCredential::generate();
        let outcome = h
            .publisher
            .publish(&snapshot(&[("b", "2"), ("a", "1")]), &owned("production", &cred))
            .await;
        let blob = h.store.get(outcome.content_id().unwrap()).unwrap();
        assert_eq!(blob.label, "production-config.json");
        assert_eq!(blob.metadata.environment, "production");
        assert_eq!(blob.metadata.kind, "config-snapshot");
        assert_eq!(blob.data, br#"{"a":"1","b":"2"}"#);
    }

    #[tokio::test]
    async fn empty_key_is_encoding_error() {
        let h = harness();
        let cred = OwningCredential::generate();
        // `Snapshot::insert` refuses empty keys, so build a bad one through serde.
        let bad: Snapshot = serde_json::from_str(r#"{"":"x"}"#).unwrap();
        let outcome = h.publisher.publish(&bad, &owned("production", &cred)).await;
        assert_eq!(outcome.error_kinds(), vec![ErrorKind::Encoding]);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn name_mismatch_publishes_to_credential_name() {
        let h = harness();
        let configured = OwningCredential::generate();
        let held = OwningCredential::generate();
        let record = EnvironmentRecord::read_only("production", configured.name())
            .with_credential(held.clone())
            .with_service_credential(token("tok"));
        let outcome = h.publisher.publish(&snapshot(&[("a", "1")]), &record).await;

        assert!(matches!(
            &outcome.name_update,
            NameUpdateResult::Updated { name, .. } if *name == held.name()
        ));
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_publishes_are_independent() {
        let h = harness();
        let a = OwningCredential::generate();
        let b = OwningCredential::generate();
        let (ra, rb) = (owned("a", &a), owned("b", &b));
        let (sa, sb) = (snapshot(&[("k", "a")]), snapshot(&[("k", "b")]));
        let (oa, ob) = tokio::join!(
            h.publisher.publish(&sa, &ra),
            h.publisher.publish(&sb, &rb)
        );
        assert!(oa.is_fully_published());
        assert!(ob.is_fully_published());
        assert_ne!(oa.content_id(), ob.content_id());
    }

    #[test]
    fn status_message_names_environment() {
        assert!(status_message("production").contains("production"));
        assert!(!is_configured(None));
        assert!(is_configured(Some(&token("tok"))));
    }
}

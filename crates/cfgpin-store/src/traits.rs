use async_trait::async_trait;
use cfgpin_types::{ContentId, ServiceCredential};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::metadata::UploadMetadata;

/// A content-addressed pinning service.
///
/// Implementations must satisfy these invariants:
/// - Identical bytes always yield the same identifier.
/// - A returned identifier names bytes that are already durably stored.
/// - There is no delete: once pinned, a blob stays fetchable.
#[async_trait]
pub trait ContentUploader: Send + Sync {
    /// Check a credential with the service. No data is transferred.
    async fn authenticate(&self, credential: &ServiceCredential) -> StoreResult<()>;

    /// Store a blob under `label` and return its identifier.
    async fn store(
        &self,
        data: &[u8],
        label: &str,
        credential: &ServiceCredential,
        metadata: &UploadMetadata,
    ) -> StoreResult<ContentId>;

    /// Authenticate, then store.
    ///
    /// Fails fast with [`StoreError::Configuration`] when no credential is
    /// given and with [`StoreError::Authentication`] when the service
    /// rejects it; in both cases no bytes leave the process.
    async fn upload(
        &self,
        data: &[u8],
        label: &str,
        credential: Option<&ServiceCredential>,
        metadata: &UploadMetadata,
    ) -> StoreResult<ContentId> {
        let credential = credential.ok_or_else(|| {
            StoreError::Configuration("no service credential configured".into())
        })?;
        self.authenticate(credential).await?;
        debug!(label, bytes = data.len(), "credential accepted, storing blob");
        self.store(data, label, credential, metadata).await
    }
}

/// Whether an upload could be attempted with this credential.
///
/// Pure capability check; makes no network call.
pub fn is_configured(credential: Option<&ServiceCredential>) -> bool {
    credential.is_some_and(|c| !c.expose().trim().is_empty())
}

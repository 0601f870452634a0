use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use cfgpin_crypto::ContentHasher;
use cfgpin_types::{ContentId, ServiceCredential};

use crate::error::{StoreError, StoreResult};
use crate::metadata::UploadMetadata;
use crate::traits::ContentUploader;

/// A blob held by [`InMemoryPinStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinnedBlob {
    pub data: Vec<u8>,
    pub label: String,
    pub metadata: UploadMetadata,
}

/// In-memory, HashMap-based pinning service.
///
/// Intended for tests and dry runs. Identifiers are domain-separated BLAKE3
/// digests of the stored bytes. By default every credential is accepted;
/// [`with_accepted_token`](Self::with_accepted_token) restricts that, and
/// [`fail_transfers`](Self::fail_transfers) makes `store` fail.
pub struct InMemoryPinStore {
    pins: RwLock<HashMap<ContentId, PinnedBlob>>,
    accepted_tokens: Option<HashSet<String>>,
    transfer_failure: RwLock<Option<String>>,
}

impl InMemoryPinStore {
    /// Create a new empty store that accepts any credential.
    pub fn new() -> Self {
        Self {
            pins: RwLock::new(HashMap::new()),
            accepted_tokens: None,
            transfer_failure: RwLock::new(None),
        }
    }

    /// Only accept the given token (may be called repeatedly).
    pub fn with_accepted_token(mut self, token: impl Into<String>) -> Self {
        self.accepted_tokens
            .get_or_insert_with(HashSet::new)
            .insert(token.into());
        self
    }

    /// Make every subsequent `store` call fail with a transfer error.
    pub fn fail_transfers(&self, reason: impl Into<String>) {
        *self
            .transfer_failure
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(reason.into());
    }

    /// Number of pinned blobs.
    pub fn len(&self) -> usize {
        self.pins.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been pinned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a pinned blob by identifier.
    ///
    /// Blobs whose bytes no longer hash to `id` are not returned.
    pub fn get(&self, id: &ContentId) -> Option<PinnedBlob> {
        self.pins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .filter(|blob| ContentHasher::SNAPSHOT.verify(&blob.data, id))
            .cloned()
    }

    /// Returns `true` if the identifier is pinned.
    pub fn contains(&self, id: &ContentId) -> bool {
        self.pins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }
}

impl Default for InMemoryPinStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentUploader for InMemoryPinStore {
    async fn authenticate(&self, credential: &ServiceCredential) -> StoreResult<()> {
        match &self.accepted_tokens {
            Some(tokens) if !tokens.contains(credential.expose()) => Err(
                StoreError::Authentication("service rejected the credential".into()),
            ),
            _ => Ok(()),
        }
    }

    async fn store(
        &self,
        data: &[u8],
        label: &str,
        _credential: &ServiceCredential,
        metadata: &UploadMetadata,
    ) -> StoreResult<ContentId> {
        if let Some(reason) = self
            .transfer_failure
            .read()
            .map_err(|e| StoreError::Transfer(format!("lock poisoned: {e}")))?
            .clone()
        {
            return Err(StoreError::Transfer(reason));
        }
        let id = ContentHasher::SNAPSHOT.content_id(data);
        let mut pins = self
            .pins
            .write()
            .map_err(|e| StoreError::Transfer(format!("lock poisoned: {e}")))?;
        // Idempotent: the first pin of these bytes is kept.
        pins.entry(id.clone()).or_insert_with(|| PinnedBlob {
            data: data.to_vec(),
            label: label.to_string(),
            metadata: metadata.clone(),
        });
        Ok(id)
    }
}

impl std::fmt::Debug for InMemoryPinStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPinStore")
            .field("pin_count", &self.len())
            .field("restricted", &self.accepted_tokens.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cred(token: &str) -> ServiceCredential {
        ServiceCredential::new(token).unwrap()
    }

    #[tokio::test]
    async fn upload_returns_content_id() {
        let store = InMemoryPinStore::new();
        let meta = UploadMetadata::snapshot("dev");
        let id = store
            .upload(b"{\"a\":\"1\"}", "dev-config.json", Some(&cred("t")), &meta)
            .await
            .unwrap();
        assert!(store.contains(&id));
        let blob = store.get(&id).unwrap();
        assert_eq!(blob.data, b"{\"a\":\"1\"}");
        assert_eq!(blob.label, "dev-config.json");
        assert_eq!(blob.metadata, meta);
    }

    #[tokio::test]
    async fn identical_bytes_same_id() {
        let store = InMemoryPinStore::new();
        let meta = UploadMetadata::snapshot("dev");
        let a = store.upload(b"same", "a", Some(&cred("t")), &meta).await.unwrap();
        let b = store.upload(b"same", "b", Some(&cred("t")), &meta).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_credential_is_configuration_error() {
        let store = InMemoryPinStore::new();
        let err = store
            .upload(b"x", "x", None, &UploadMetadata::snapshot("dev"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rejected_credential_stores_nothing() {
        let store = InMemoryPinStore::new().with_accepted_token("good");
        let err = store
            .upload(b"x", "x", Some(&cred("bad")), &UploadMetadata::snapshot("dev"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Authentication(_)));
        assert!(store.is_empty());
        assert!(store.authenticate(&cred("good")).await.is_ok());
    }

    #[tokio::test]
    async fn injected_transfer_failure() {
        let store = InMemoryPinStore::new();
        store.fail_transfers("connection reset");
        let err = store
            .upload(b"x", "x", Some(&cred("t")), &UploadMetadata::snapshot("dev"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Transfer("connection reset".into()));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn corrupted_blob_is_not_served() {
        let store = InMemoryPinStore::new();
        let meta = UploadMetadata::snapshot("dev");
        let id = store
            .upload(b"original", "dev-config.json", Some(&cred("t")), &meta)
            .await
            .unwrap();
        store
            .pins
            .write()
            .unwrap()
            .get_mut(&id)
            .unwrap()
            .data = b"tampered".to_vec();
        assert!(store.contains(&id));
        assert!(store.get(&id).is_none());
    }
}

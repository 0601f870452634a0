//! In-memory naming network for testing and dry runs.
//!
//! [`InMemoryNameNetwork`] keeps the current revision of every name in a
//! `HashMap` protected by a `RwLock`. It enforces the same acceptance rules
//! as a real network: valid signature, unexpired validity, and a sequence no
//! lower than the stored one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use cfgpin_types::{ContentId, Name};
use chrono::Utc;

use crate::error::{NameError, NameResult};
use crate::record::NameRecord;
use crate::traits::NamingNetwork;

/// An in-memory implementation of [`NamingNetwork`].
#[derive(Debug, Default)]
pub struct InMemoryNameNetwork {
    records: RwLock<HashMap<Name, NameRecord>>,
    offline: AtomicBool,
    resolve_calls: AtomicUsize,
    publish_calls: AtomicUsize,
    published: RwLock<Vec<(Name, ContentId)>>,
}

impl InMemoryNameNetwork {
    /// Create a new empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the network being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `resolve` calls received, answered or not.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    /// Number of `publish` calls received, accepted or not.
    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    /// Every accepted (name, value) binding, oldest first.
    pub fn published(&self) -> Vec<(Name, ContentId)> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_online(&self) -> NameResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(NameError::Unreachable("network offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NamingNetwork for InMemoryNameNetwork {
    async fn resolve(&self, name: &Name) -> NameResult<Option<NameRecord>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let records = self
            .records
            .read()
            .map_err(|e| NameError::Unreachable(format!("lock poisoned: {e}")))?;
        Ok(records.get(name).cloned())
    }

    async fn publish(&self, record: &NameRecord) -> NameResult<()> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        record
            .verify()
            .map_err(|e| NameError::Rejected(e.to_string()))?;
        if record.is_expired_at(Utc::now()) {
            return Err(NameError::Rejected("revision already expired".into()));
        }

        let mut records = self
            .records
            .write()
            .map_err(|e| NameError::Unreachable(format!("lock poisoned: {e}")))?;
        if let Some(current) = records.get(&record.name) {
            if record.sequence < current.sequence {
                return Err(NameError::Rejected(format!(
                    "stale sequence {} (current {})",
                    record.sequence, current.sequence
                )));
            }
        }
        records.insert(record.name.clone(), record.clone());
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((record.name.clone(), record.value.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgpin_crypto::OwningCredential;
    use chrono::Duration;

    fn cid(s: &str) -> ContentId {
        ContentId::parse(s).unwrap()
    }

    fn record(cred: &OwningCredential, value: &str, sequence: u64) -> NameRecord {
        NameRecord::sign(cred, cid(value), sequence, Utc::now() + Duration::days(1))
    }

    #[tokio::test]
    async fn unpublished_name_resolves_to_none() {
        let net = InMemoryNameNetwork::new();
        let cred = OwningCredential::generate();
        assert!(net.resolve(&cred.name()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn publish_then_resolve() {
        let net = InMemoryNameNetwork::new();
        let cred = OwningCredential::generate();
        net.publish(&record(&cred, "bafyone", 0)).await.unwrap();
        let current = net.resolve(&cred.name()).await.unwrap().unwrap();
        assert_eq!(current.value, cid("bafyone"));
        assert_eq!(net.published(), vec![(cred.name(), cid("bafyone"))]);
    }

    #[tokio::test]
    async fn later_revision_replaces_earlier() {
        let net = InMemoryNameNetwork::new();
        let cred = OwningCredential::generate();
        net.publish(&record(&cred, "bafyone", 0)).await.unwrap();
        net.publish(&record(&cred, "bafytwo", 1)).await.unwrap();
        let current = net.resolve(&cred.name()).await.unwrap().unwrap();
        assert_eq!(current.value, cid("bafytwo"));
        assert_eq!(current.sequence, 1);
    }

    #[tokio::test]
    async fn same_sequence_last_writer_wins() {
        let net = InMemoryNameNetwork::new();
        let cred = OwningCredential::generate();
        net.publish(&record(&cred, "bafyone", 4)).await.unwrap();
        net.publish(&record(&cred, "bafytwo", 4)).await.unwrap();
        let current = net.resolve(&cred.name()).await.unwrap().unwrap();
        assert_eq!(current.value, cid("bafytwo"));
    }

    #[tokio::test]
    async fn stale_sequence_rejected() {
        let net = InMemoryNameNetwork::new();
        let cred = OwningCredential::generate();
        net.publish(&record(&cred, "bafyone", 5)).await.unwrap();
        let err = net.publish(&record(&cred, "bafytwo", 4)).await.unwrap_err();
        assert!(matches!(err, NameError::Rejected(_)));
    }

    #[tokio::test]
    async fn forged_record_rejected() {
        let net = InMemoryNameNetwork::new();
        let owner = OwningCredential::generate();
        let attacker = OwningCredential::generate();
        let mut forged = record(&attacker, "bafyevil", 0);
        forged.name = owner.name();
        let err = net.publish(&forged).await.unwrap_err();
        assert!(matches!(err, NameError::Rejected(_)));
        assert!(net.resolve(&owner.name()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_record_rejected() {
        let net = InMemoryNameNetwork::new();
        let cred = OwningCredential::generate();
        let expired = NameRecord::sign(&cred, cid("bafyone"), 0, Utc::now() - Duration::hours(1));
        assert!(matches!(
            net.publish(&expired).await,
            Err(NameError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn offline_network_is_unreachable() {
        let net = InMemoryNameNetwork::new();
        let cred = OwningCredential::generate();
        net.set_offline(true);
        assert!(matches!(
            net.resolve(&cred.name()).await,
            Err(NameError::Unreachable(_))
        ));
        assert!(matches!(
            net.publish(&record(&cred, "bafyone", 0)).await,
            Err(NameError::Unreachable(_))
        ));
        assert_eq!(net.publish_calls(), 1);
        assert_eq!(net.resolve_calls(), 1);
    }
}

//! In-memory subscriber registry.
//!
//! An ordered, duplicate-free set of watcher ids. Fan-out iterates a cloned
//! snapshot, so a registration that lands mid-query is simply not part of
//! that query.

use chrono::Utc;
use tokio::sync::RwLock;

use crible_protocol::{SubscriberId, SubscriberInfo};

/// Ordered set of registered watchers, in registration order.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    entries: RwLock<Vec<SubscriberInfo>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` if absent. Returns `true` when it was newly added.
    pub async fn register(&self, id: SubscriberId) -> bool {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.subscriber_id == id) {
            tracing::info!(subscriber_id = %id, "subscription already exists");
            return false;
        }
        tracing::info!(subscriber_id = %id, "added new subscription");
        entries.push(SubscriberInfo {
            subscriber_id: id,
            registered_at: Utc::now(),
        });
        true
    }

    /// Ids in registration order, detached from the lock.
    pub async fn snapshot(&self) -> Vec<SubscriberId> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| e.subscriber_id.clone())
            .collect()
    }

    /// Full entries in registration order.
    pub async fn list(&self) -> Vec<SubscriberInfo> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(raw: &str) -> SubscriberId {
        SubscriberId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn duplicate_registration_is_noop() {
        let registry = SubscriberRegistry::new();
        assert!(registry.register(id("10.0.0.1:3001")).await);
        assert!(!registry.register(id("10.0.0.1:3001")).await);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn preserves_insertion_order() {
        let registry = SubscriberRegistry::new();
        for raw in ["c:1", "a:1", "b:1", "a:1"] {
            registry.register(id(raw)).await;
        }
        let order: Vec<String> = registry
            .snapshot()
            .await
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(order, ["c:1", "a:1", "b:1"]);
    }

    #[tokio::test]
    async fn snapshot_is_detached() {
        let registry = SubscriberRegistry::new();
        registry.register(id("10.0.0.1:3001")).await;
        let snapshot = registry.snapshot().await;
        registry.register(id("10.0.0.2:3001")).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_registrations_keep_one_entry_each() {
        let registry = Arc::new(SubscriberRegistry::new());
        let mut handles = Vec::new();
        for i in 0..50 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let raw = format!("10.0.0.{}:3001", i % 10);
                registry.register(id(&raw)).await;
                registry.snapshot().await.len()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap() <= 10);
        }
        assert_eq!(registry.len().await, 10);
    }

    #[tokio::test]
    async fn list_carries_registration_time() {
        let registry = SubscriberRegistry::new();
        assert!(registry.is_empty().await);
        let before = Utc::now();
        registry.register(id("10.0.0.1:3001")).await;
        let entries = registry.list().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].registered_at >= before);
    }
}

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use log::debug;

use super::{LinkStore, Result};
use crate::errors::StoreError;
use crate::models::LinkRecord;

/// Process-local store for development and tests
#[derive(Default)]
pub struct MemoryLinkStore {
    links: DashMap<String, LinkRecord>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert_if_absent(&self, record: &LinkRecord) -> Result<()> {
        // The entry guard holds the shard lock across check and insert
        match self.links.entry(record.short_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "Short id '{}' already exists",
                record.short_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                debug!("Stored '{}' in memory", record.short_id);
                Ok(())
            }
        }
    }

    async fn get(&self, short_id: &str) -> Result<LinkRecord> {
        self.links
            .get(short_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(format!("Short id '{}' not found", short_id)))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn record(id: &str, url: &str) -> LinkRecord {
        LinkRecord::new(id.to_string(), url.to_string(), None)
    }

    #[tokio::test]
    async fn insert_then_get_returns_record() {
        let store = MemoryLinkStore::new();
        let link = record("abc123", "https://example.com");

        store.insert_if_absent(&link).await.unwrap();

        assert_eq!(store.get("abc123").await.unwrap(), link);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn second_insert_conflicts_and_keeps_first() {
        let store = MemoryLinkStore::new();
        store
            .insert_if_absent(&record("promo", "https://first.example"))
            .await
            .unwrap();

        let err = store
            .insert_if_absent(&record("promo", "https://second.example"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(
            store.get("promo").await.unwrap().long_url,
            "https://first.example"
        );
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let store = MemoryLinkStore::new();
        let err = store.get("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_same_id_have_one_winner() {
        let store = Arc::new(MemoryLinkStore::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert_if_absent(&record("race", &format!("https://example.com/{}", i)))
                        .await
                })
            })
            .collect();

        let mut won = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => won += 1,
                Err(StoreError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(won, 1);
        assert_eq!(conflicts, 31);
        assert_eq!(store.len(), 1);
    }
}

//! Cache storage abstraction
//!
//! Named key-value stores, keyed by normalized request key. The agent only
//! ever sees this trait; [`DiskStorage`](super::DiskStorage) is the
//! persistent implementation and [`MemoryStorage`] backs tests and
//! throwaway sessions.

use crate::cache::entry::CachedEntry;
use crate::error::PaviResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Abstract cache storage interface
///
/// Each single-key write is atomic. Nothing groups writes across keys.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a partition, creating it if absent. Returns `true` if created.
    async fn open(&self, partition: &str) -> PaviResult<bool>;

    /// Read the entry for `key`, if the partition and entry exist
    async fn get(&self, partition: &str, key: &str) -> PaviResult<Option<CachedEntry>>;

    /// Write an entry, replacing any previous one. Creates the partition.
    async fn put(&self, partition: &str, entry: &CachedEntry) -> PaviResult<()>;

    /// Delete one entry. Returns `true` if it existed.
    async fn delete(&self, partition: &str, key: &str) -> PaviResult<bool>;

    /// Delete a whole partition. Returns `true` if it existed.
    async fn delete_partition(&self, partition: &str) -> PaviResult<bool>;

    /// Names of every partition in this storage, sorted
    async fn partitions(&self) -> PaviResult<Vec<String>>;

    /// Keys stored in a partition, sorted
    async fn keys(&self, partition: &str) -> PaviResult<Vec<String>>;
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    partitions: RwLock<BTreeMap<String, BTreeMap<String, CachedEntry>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, partition: &str) -> PaviResult<bool> {
        let mut partitions = self.partitions.write().await;
        if partitions.contains_key(partition) {
            return Ok(false);
        }
        partitions.insert(partition.to_string(), BTreeMap::new());
        Ok(true)
    }

    async fn get(&self, partition: &str, key: &str) -> PaviResult<Option<CachedEntry>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(partition)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put(&self, partition: &str, entry: &CachedEntry) -> PaviResult<()> {
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(partition.to_string())
            .or_default()
            .insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn delete(&self, partition: &str, key: &str) -> PaviResult<bool> {
        let mut partitions = self.partitions.write().await;
        Ok(partitions
            .get_mut(partition)
            .is_some_and(|entries| entries.remove(key).is_some()))
    }

    async fn delete_partition(&self, partition: &str) -> PaviResult<bool> {
        Ok(self.partitions.write().await.remove(partition).is_some())
    }

    async fn partitions(&self) -> PaviResult<Vec<String>> {
        Ok(self.partitions.read().await.keys().cloned().collect())
    }

    async fn keys(&self, partition: &str) -> PaviResult<Vec<String>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(partition)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }
}

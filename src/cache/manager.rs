//! Cache namespace manager
//!
//! Owns the naming of the versioned `core` and `assets` partitions and is
//! the only path through which strategies and the lifecycle controller touch
//! cache storage.

use crate::cache::entry::{request_key, CachedEntry};
use crate::cache::partition::{PartitionName, PartitionRole, PartitionStatus};
use crate::cache::storage::CacheStorage;
use crate::error::PaviResult;
use crate::net::{Request, Response};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Handle to an opened partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionHandle {
    name: PartitionName,
    storage_name: String,
}

impl PartitionHandle {
    fn new(name: PartitionName) -> Self {
        let storage_name = name.to_string();
        Self { name, storage_name }
    }

    pub fn role(&self) -> PartitionRole {
        self.name.role
    }

    /// Full storage name, e.g. `pavi-fast-core-2026.01.15-01`
    pub fn name(&self) -> &str {
        &self.storage_name
    }
}

/// A partition as seen in storage, classified against the current version
#[derive(Debug, Clone)]
pub struct PartitionSummary {
    pub name: String,
    pub status: PartitionStatus,
    pub entries: usize,
}

/// Cache namespace manager
pub struct CacheManager {
    storage: Arc<dyn CacheStorage>,
    prefix: String,
    version: String,
}

impl CacheManager {
    pub fn new(storage: Arc<dyn CacheStorage>, prefix: &str, version: &str) -> Self {
        Self {
            storage,
            prefix: prefix.to_string(),
            version: version.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the current partition for `role`
    pub fn partition_name(&self, role: PartitionRole) -> PartitionName {
        PartitionName::new(&self.prefix, role, &self.version)
    }

    /// The active role+version set
    pub fn current_versions(&self) -> HashMap<PartitionRole, String> {
        PartitionRole::all()
            .iter()
            .map(|role| (*role, self.version.clone()))
            .collect()
    }

    /// Open (creating if absent) the current partition for `role`
    pub async fn open_partition(&self, role: PartitionRole) -> PaviResult<PartitionHandle> {
        let handle = PartitionHandle::new(self.partition_name(role));
        if self.storage.open(handle.name()).await? {
            info!("Created partition {}", handle.name());
        }
        Ok(handle)
    }

    /// Whether the current partition for `role` already exists in storage
    pub async fn partition_exists(&self, role: PartitionRole) -> PaviResult<bool> {
        let name = self.partition_name(role).to_string();
        Ok(self.storage.partitions().await?.contains(&name))
    }

    /// Find the stored entry for `request`, ignoring its query string
    ///
    /// Only `GET` requests can match.
    pub async fn lookup(
        &self,
        handle: &PartitionHandle,
        request: &Request,
    ) -> PaviResult<Option<CachedEntry>> {
        if !request.is_get() {
            return Ok(None);
        }
        let key = request_key(&request.url);
        let entry = self.storage.get(handle.name(), &key).await?;
        debug!(
            "{} {} in {}",
            if entry.is_some() { "Hit" } else { "Miss" },
            key,
            handle.name()
        );
        Ok(entry)
    }

    /// Store `response` for `request`
    ///
    /// Non-ok responses and non-`GET` requests are refused. Returns whether
    /// the entry was written.
    pub async fn store(
        &self,
        handle: &PartitionHandle,
        request: &Request,
        response: &Response,
    ) -> PaviResult<bool> {
        if !request.is_get() || !response.is_ok() {
            debug!(
                "Not storing {} {} (status {})",
                request.method, request.url, response.status
            );
            return Ok(false);
        }

        let entry = CachedEntry::new(request_key(&request.url), response.clone());
        self.storage.put(handle.name(), &entry).await?;
        debug!("Stored {} in {}", entry.key, handle.name());
        Ok(true)
    }

    /// Write back an entry captured earlier with `lookup`
    pub async fn restore(&self, handle: &PartitionHandle, entry: &CachedEntry) -> PaviResult<()> {
        self.storage.put(handle.name(), entry).await?;
        debug!("Restored {} in {}", entry.key, handle.name());
        Ok(())
    }

    /// Remove a single entry by its normalized key
    pub async fn remove(&self, handle: &PartitionHandle, key: &str) -> PaviResult<bool> {
        self.storage.delete(handle.name(), key).await
    }

    /// Delete a partition and everything in it
    pub async fn delete_partition(&self, handle: &PartitionHandle) -> PaviResult<bool> {
        self.storage.delete_partition(handle.name()).await
    }

    /// Classify a storage name against the given role+version set
    fn status_of(&self, name: &str, current: &HashMap<PartitionRole, String>) -> PartitionStatus {
        match PartitionName::parse(&self.prefix, name) {
            Some(parsed) if current.get(&parsed.role) == Some(&parsed.version) => {
                PartitionStatus::Current
            }
            _ if name.starts_with(&self.prefix) => PartitionStatus::Stale,
            _ => PartitionStatus::Foreign,
        }
    }

    /// Delete every prefixed partition whose role+version is not current
    ///
    /// Partitions without the prefix belong to other applications and are
    /// never deleted. Returns the deleted names.
    pub async fn evict_stale_partitions(
        &self,
        current: &HashMap<PartitionRole, String>,
    ) -> PaviResult<Vec<String>> {
        let mut evicted = vec![];
        for name in self.storage.partitions().await? {
            if self.status_of(&name, current) != PartitionStatus::Stale {
                continue;
            }
            if self.storage.delete_partition(&name).await? {
                info!("Evicted stale partition {}", name);
                evicted.push(name);
            }
        }
        Ok(evicted)
    }

    /// Names that `evict_stale_partitions` would delete
    pub async fn stale_partitions(
        &self,
        current: &HashMap<PartitionRole, String>,
    ) -> PaviResult<Vec<String>> {
        Ok(self
            .storage
            .partitions()
            .await?
            .into_iter()
            .filter(|name| self.status_of(name, current) == PartitionStatus::Stale)
            .collect())
    }

    /// Every partition in storage with its status and entry count
    pub async fn list_partitions(&self) -> PaviResult<Vec<PartitionSummary>> {
        let current = self.current_versions();
        let mut summaries = vec![];
        for name in self.storage.partitions().await? {
            let entries = self.storage.keys(&name).await?.len();
            summaries.push(PartitionSummary {
                status: self.status_of(&name, &current),
                name,
                entries,
            });
        }
        Ok(summaries)
    }

    /// Normalized keys stored in a partition
    pub async fn keys(&self, handle: &PartitionHandle) -> PaviResult<Vec<String>> {
        self.storage.keys(handle.name()).await
    }
}

//! Persistent cache storage on the local filesystem
//!
//! Layout:
//!
//! ```text
//! <root>/<origin>/<partition>/<sha256(key)[..32]>.json
//! ```
//!
//! The origin directory keeps storage scoped to one application origin.
//! Entries are written to a unique temp file and renamed into place, so a
//! reader sees either the old entry or the new one.

use crate::cache::entry::CachedEntry;
use crate::cache::storage::CacheStorage;
use crate::error::{PaviError, PaviResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Directory name for an origin, e.g. `https_app.example.com_443`
pub fn origin_dir_name(scope: &Url) -> String {
    format!(
        "{}_{}_{}",
        scope.scheme(),
        scope.host_str().unwrap_or("local"),
        scope.port_or_known_default().unwrap_or(0)
    )
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// Hash a request key into an entry file stem
fn entry_stem(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

/// Filesystem-backed cache storage for one origin
#[derive(Debug, Clone)]
pub struct DiskStorage {
    dir: PathBuf,
}

impl DiskStorage {
    /// Storage for `scope`'s origin under `root`
    pub fn for_origin(root: &Path, scope: &Url) -> Self {
        Self {
            dir: root.join(origin_dir_name(scope)),
        }
    }

    /// Storage rooted directly at `dir`
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn partition_dir(&self, partition: &str) -> PaviResult<PathBuf> {
        if partition.is_empty()
            || partition.contains(['/', '\\'])
            || partition == "."
            || partition == ".."
        {
            return Err(PaviError::storage(partition, "invalid partition name"));
        }
        Ok(self.dir.join(partition))
    }

    fn entry_path(&self, partition: &str, key: &str) -> PaviResult<PathBuf> {
        Ok(self
            .partition_dir(partition)?
            .join(format!("{}.json", entry_stem(key))))
    }

    async fn read_entry(path: &Path) -> PaviResult<Option<CachedEntry>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PaviError::io(
                    format!("reading cache entry {}", path.display()),
                    e,
                ))
            }
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn entry_files(&self, partition: &str) -> PaviResult<Vec<PathBuf>> {
        let dir = self.partition_dir(partition)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(PaviError::io(format!("reading {}", dir.display()), e)),
        };

        let mut files = vec![];
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PaviError::io("reading partition entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl CacheStorage for DiskStorage {
    async fn open(&self, partition: &str) -> PaviResult<bool> {
        let dir = self.partition_dir(partition)?;
        if is_dir(&dir).await {
            return Ok(false);
        }
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| PaviError::io(format!("creating partition {}", dir.display()), e))?;
        debug!("Created partition {}", partition);
        Ok(true)
    }

    async fn get(&self, partition: &str, key: &str) -> PaviResult<Option<CachedEntry>> {
        let path = self.entry_path(partition, key)?;
        let entry = Self::read_entry(&path).await?;
        // Stem collision guard
        Ok(entry.filter(|e| e.key == key))
    }

    async fn put(&self, partition: &str, entry: &CachedEntry) -> PaviResult<()> {
        let dir = self.partition_dir(partition)?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| PaviError::io(format!("creating partition {}", dir.display()), e))?;

        let path = self.entry_path(partition, &entry.key)?;
        let tmp = dir.join(format!("{}.{}.tmp", entry_stem(&entry.key), Uuid::new_v4()));
        let content = serde_json::to_vec(entry)?;

        fs::write(&tmp, content)
            .await
            .map_err(|e| PaviError::io(format!("writing {}", tmp.display()), e))?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(PaviError::io(format!("replacing {}", path.display()), e));
        }
        Ok(())
    }

    async fn delete(&self, partition: &str, key: &str) -> PaviResult<bool> {
        let path = self.entry_path(partition, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PaviError::io(format!("removing {}", path.display()), e)),
        }
    }

    async fn delete_partition(&self, partition: &str) -> PaviResult<bool> {
        let dir = self.partition_dir(partition)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PaviError::io(format!("removing {}", dir.display()), e)),
        }
    }

    async fn partitions(&self) -> PaviResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(PaviError::io(
                    format!("reading {}", self.dir.display()),
                    e,
                ))
            }
        };

        let mut names = vec![];
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PaviError::io("reading storage entry", e))?
        {
            if is_dir(&entry.path()).await {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn keys(&self, partition: &str) -> PaviResult<Vec<String>> {
        let mut keys = vec![];
        for path in self.entry_files(partition).await? {
            match Self::read_entry(&path).await {
                Ok(Some(entry)) => keys.push(entry.key),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable entry {}: {}", path.display(), e),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

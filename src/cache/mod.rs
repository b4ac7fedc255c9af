//! Versioned cache partitions
//!
//! Two partitions are current at any time, `core` (the precached
//! application shell) and `assets` (runtime sub-resources). Both carry the
//! agent's version in their name, so bumping the version yields fresh
//! partitions and turns the previous ones stale.
//!
//! # Partition States
//!
//! | Status | Name | Evicted at activate |
//! |--------|------|---------------------|
//! | Current | `{prefix}{role}-{version}` | no |
//! | Stale | `{prefix}...` otherwise | yes |
//! | Foreign | anything without the prefix | never |

pub mod disk;
pub mod entry;
pub mod manager;
pub mod partition;
pub mod storage;

pub use disk::DiskStorage;
pub use entry::{request_key, CachedEntry};
pub use manager::{CacheManager, PartitionHandle, PartitionSummary};
pub use partition::{PartitionName, PartitionRole, PartitionStatus};
pub use storage::{CacheStorage, MemoryStorage};

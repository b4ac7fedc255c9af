//! Install and activate

use crate::cache::{request_key, CacheManager, CachedEntry, PartitionHandle, PartitionRole};
use crate::error::{PaviError, PaviResult};
use crate::journal::{Journal, LifecycleEvent};
use crate::net::{Fetcher, Request, Response};
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use url::Url;

use super::clients::ClientRegistry;
use super::state::WorkerState;

/// Outcome of a successful install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub partition: String,
    pub stored: usize,
}

/// Outcome of a successful activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    pub evicted: Vec<String>,
    pub claimed: usize,
}

/// Lifecycle controller
///
/// Holds no persistent state of its own; what survives a restart is the set
/// of partitions in cache storage.
pub struct Lifecycle {
    cache: Arc<CacheManager>,
    fetcher: Arc<dyn Fetcher>,
    manifest: Vec<Url>,
    clients: Arc<ClientRegistry>,
    journal: Journal,
    state: Mutex<WorkerState>,
    skip_waiting: AtomicBool,
}

impl Lifecycle {
    pub fn new(
        cache: Arc<CacheManager>,
        fetcher: Arc<dyn Fetcher>,
        manifest: Vec<Url>,
        clients: Arc<ClientRegistry>,
        journal: Journal,
    ) -> Self {
        Self {
            cache,
            fetcher,
            manifest,
            clients,
            journal,
            state: Mutex::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
        debug!("Worker state -> {}", state);
    }

    /// Whether install asked to take over without waiting for old clients
    pub fn skips_waiting(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    pub fn manifest(&self) -> &[Url] {
        &self.manifest
    }

    async fn precache_one(&self, url: &Url) -> PaviResult<(Request, Response)> {
        let request = Request::get(url.clone());
        let response =
            self.fetcher
                .fetch(&request)
                .await
                .map_err(|e| PaviError::PrecacheFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        if !response.is_ok() {
            return Err(PaviError::PrecacheFailed {
                url: url.to_string(),
                reason: format!("status {}", response.status),
            });
        }
        Ok((request, response))
    }

    /// Populate the core partition with the whole manifest
    ///
    /// Every manifest fetch must succeed with an ok status before anything
    /// is written. If a write fails, this attempt's writes are undone.
    pub async fn install(&self) -> PaviResult<InstallReport> {
        let state = self.state();
        if !state.can_install() {
            return Err(PaviError::LifecycleOrder {
                action: "install",
                state: state.to_string(),
            });
        }
        self.set_state(WorkerState::Installing);
        info!(
            "Installing version {} ({} manifest entries)",
            self.cache.version(),
            self.manifest.len()
        );

        match self.populate().await {
            Ok(report) => {
                self.set_state(WorkerState::Installed);
                self.skip_waiting.store(true, Ordering::SeqCst);
                info!("Installed {} entries into {}", report.stored, report.partition);
                self.journal
                    .record(
                        self.cache.version(),
                        LifecycleEvent::InstallCompleted {
                            partition: report.partition.clone(),
                            stored: report.stored,
                        },
                    )
                    .await;
                Ok(report)
            }
            Err(e) => {
                self.set_state(WorkerState::Redundant);
                warn!("Install of version {} failed: {}", self.cache.version(), e);
                self.journal
                    .record(
                        self.cache.version(),
                        LifecycleEvent::InstallFailed {
                            error: e.to_string(),
                        },
                    )
                    .await;
                Err(e)
            }
        }
    }

    async fn populate(&self) -> PaviResult<InstallReport> {
        let fetched = try_join_all(self.manifest.iter().map(|url| self.precache_one(url))).await?;

        let existed = self.cache.partition_exists(PartitionRole::Core).await?;
        let core = self.cache.open_partition(PartitionRole::Core).await?;

        // Entries this attempt overwrites, kept so a failed reinstall can put
        // them back
        let mut previous = HashMap::new();
        if existed {
            for (request, _) in &fetched {
                if let Some(entry) = self.cache.lookup(&core, request).await? {
                    previous.insert(entry.key.clone(), entry);
                }
            }
        }

        let mut written = vec![];
        for (request, response) in &fetched {
            match self.cache.store(&core, request, response).await {
                Ok(true) => written.push(request_key(&request.url)),
                Ok(false) => {}
                Err(e) => {
                    self.roll_back(&core, existed, &written, &previous).await;
                    return Err(e);
                }
            }
        }

        Ok(InstallReport {
            partition: core.name().to_string(),
            stored: written.len(),
        })
    }

    /// Undo this attempt's writes
    ///
    /// A partition created by this attempt is deleted. In a partition that
    /// already existed, new keys are removed and overwritten keys get their
    /// earlier entry back. An overwritten key is never removed, so a failed
    /// restore leaves this attempt's fresh entry in place.
    async fn roll_back(
        &self,
        core: &PartitionHandle,
        existed: bool,
        written: &[String],
        previous: &HashMap<String, CachedEntry>,
    ) {
        if !existed {
            if let Err(e) = self.cache.delete_partition(core).await {
                warn!("Failed to discard partial partition {}: {}", core.name(), e);
            }
            return;
        }
        for key in written {
            let result = match previous.get(key) {
                Some(entry) => self.cache.restore(core, entry).await,
                None => self.cache.remove(core, key).await.map(|_| ()),
            };
            if let Err(e) = result {
                warn!("Failed to roll back {} in {}: {}", key, core.name(), e);
            }
        }
    }

    /// Evict stale partitions and claim every open client
    ///
    /// Requires a completed install in this process, or a core partition
    /// already present for this version.
    pub async fn activate(&self) -> PaviResult<ActivateReport> {
        let state = self.state();
        let ready = match state {
            WorkerState::Installed | WorkerState::Activated => true,
            WorkerState::Parsed => self.cache.partition_exists(PartitionRole::Core).await?,
            _ => false,
        };
        if !ready {
            return Err(PaviError::LifecycleOrder {
                action: "activate",
                state: state.to_string(),
            });
        }

        let version = self.cache.version().to_string();
        if !self.skips_waiting() && self.clients.controlled_by_other(&version) > 0 {
            return Err(PaviError::LifecycleOrder {
                action: "activate",
                state: "waiting for clients of a previous version".to_string(),
            });
        }

        self.set_state(WorkerState::Activating);
        let evicted = match self
            .cache
            .evict_stale_partitions(&self.cache.current_versions())
            .await
        {
            Ok(evicted) => evicted,
            Err(e) => {
                self.set_state(state);
                return Err(e);
            }
        };
        let claimed = self.clients.claim(&version);
        self.set_state(WorkerState::Activated);

        info!(
            "Activated version {}: evicted {} partition(s), claimed {} client(s)",
            version,
            evicted.len(),
            claimed
        );
        self.journal
            .record(
                &version,
                LifecycleEvent::ActivateCompleted {
                    evicted: evicted.clone(),
                    claimed,
                },
            )
            .await;

        Ok(ActivateReport { evicted, claimed })
    }
}

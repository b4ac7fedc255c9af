//! The offline agent
//!
//! Ties the cache, router and lifecycle together for one configured version.

use crate::cache::{CacheManager, CacheStorage, DiskStorage};
use crate::config::{self, schema::Config, ConfigManager};
use crate::error::{PaviError, PaviResult};
use crate::journal::Journal;
use crate::lifecycle::{ActivateReport, ClientRegistry, InstallReport, Lifecycle, WorkerState};
use crate::net::{Fetcher, HttpFetcher, Request};
use crate::routing::{FetchHandler, RouteRules, Router};
use crate::strategy::{FetchOutcome, Strategies};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct OfflineWorker {
    scope: Url,
    cache: Arc<CacheManager>,
    router: Router,
    lifecycle: Lifecycle,
    clients: Arc<ClientRegistry>,
}

impl OfflineWorker {
    /// Build a worker over explicit storage and network
    pub fn new(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        journal: Journal,
    ) -> PaviResult<Self> {
        config::validate(config)?;
        let scope = config::scope_url(config)?;
        let manifest = resolve_manifest(&scope, &config.precache.urls)?;

        let cache = Arc::new(CacheManager::new(
            storage,
            &config.agent.cache_prefix,
            &config.agent.version,
        ));
        let strategies = Strategies::new(cache.clone(), fetcher.clone());
        let router = Router::new(RouteRules::new(&scope, &config.routing), strategies);
        let clients = Arc::new(ClientRegistry::new());
        let lifecycle = Lifecycle::new(
            cache.clone(),
            fetcher,
            manifest,
            clients.clone(),
            journal,
        );

        debug!(
            "Worker {} for {} ({} manifest entries)",
            config.agent.version,
            scope,
            lifecycle.manifest().len()
        );

        Ok(Self {
            scope,
            cache,
            router,
            lifecycle,
            clients,
        })
    }

    /// Build a worker with on-disk storage and the real network
    pub fn from_config(config: &Config) -> PaviResult<Self> {
        let scope = config::scope_url(config)?;
        let storage = DiskStorage::for_origin(&ConfigManager::storage_root(config), &scope);
        debug!("Cache storage at {}", storage.dir().display());

        Self::new(
            config,
            Arc::new(storage),
            Arc::new(HttpFetcher::new()),
            Journal::new(config),
        )
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    pub async fn install(&self) -> PaviResult<InstallReport> {
        self.lifecycle.install().await
    }

    pub async fn activate(&self) -> PaviResult<ActivateReport> {
        self.lifecycle.activate().await
    }

    pub fn state(&self) -> WorkerState {
        self.lifecycle.state()
    }

    pub fn manifest(&self) -> &[Url] {
        self.lifecycle.manifest()
    }

    pub fn clients(&self) -> &Arc<ClientRegistry> {
        &self.clients
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Wait for background revalidations to settle
    pub async fn drain(&self) {
        self.router.strategies().drain().await;
    }
}

#[async_trait]
impl FetchHandler for OfflineWorker {
    async fn handle(&self, request: &Request) -> PaviResult<FetchOutcome> {
        self.router.handle(request).await
    }
}

/// Resolve manifest paths against the scope, keeping their order
fn resolve_manifest(scope: &Url, paths: &[String]) -> PaviResult<Vec<Url>> {
    paths
        .iter()
        .map(|path| {
            scope.join(path).map_err(|e| PaviError::ConfigValue {
                key: "precache.urls".to_string(),
                reason: format!("{}: {}", path, e),
            })
        })
        .collect()
}

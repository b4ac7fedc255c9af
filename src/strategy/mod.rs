//! Fetch strategies
//!
//! - [`Strategies::cache_first`] for page loads: a stored page never
//!   touches the network.
//! - [`Strategies::stale_while_revalidate`] for assets: answer from cache,
//!   refresh in the background.
//! - [`Strategies::network_only`] for the backend and unknown hosts.
//!
//! Cache storage failures degrade: a failed read counts as a miss and a
//! failed write is logged. Neither fails the response.

mod cache_first;
mod revalidate;
mod tasks;

pub use tasks::Revalidations;

use crate::cache::{CacheManager, CachedEntry, PartitionHandle};
use crate::error::PaviResult;
use crate::net::{Fetcher, Request, Response};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of handling one intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served from a cache partition
    Cached(Response),
    /// Served from the network
    Network(Response),
    /// No cached copy and the network fetch failed
    Unavailable,
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Cached(r) | Self::Network(r) => Some(r),
            Self::Unavailable => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Cached(r) | Self::Network(r) => Some(r),
            Self::Unavailable => None,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cached(r) => write!(f, "cache ({})", r.status),
            Self::Network(r) => write!(f, "network ({})", r.status),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Strategy executors sharing one cache manager and one fetcher
#[derive(Clone)]
pub struct Strategies {
    cache: Arc<CacheManager>,
    fetcher: Arc<dyn Fetcher>,
    revalidations: Arc<Revalidations>,
}

impl Strategies {
    pub fn new(cache: Arc<CacheManager>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            cache,
            fetcher,
            revalidations: Arc::new(Revalidations::default()),
        }
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    /// Straight to the network; failures propagate unchanged
    pub async fn network_only(&self, request: &Request) -> PaviResult<FetchOutcome> {
        let response = self.fetcher.fetch(request).await?;
        Ok(FetchOutcome::Network(response))
    }

    /// Wait for every in-flight background revalidation
    pub async fn drain(&self) {
        self.revalidations.drain().await;
    }

    /// Background revalidations not yet finished
    pub fn pending_revalidations(&self) -> usize {
        self.revalidations.pending()
    }

    async fn lookup_or_miss(
        &self,
        handle: &PartitionHandle,
        request: &Request,
    ) -> Option<CachedEntry> {
        match self.cache.lookup(handle, request).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read failed for {}, treating as miss: {}", request.url, e);
                None
            }
        }
    }
}

/// Store a fetched response, logging instead of failing
async fn store_or_warn(
    cache: &CacheManager,
    handle: &PartitionHandle,
    request: &Request,
    response: &Response,
) {
    if let Err(e) = cache.store(handle, request, response).await {
        warn!("Cache write failed for {}: {}", request.url, e);
    }
}

fn log_served(request: &Request, outcome: &FetchOutcome) {
    debug!("{} {} served from {}", request.method, request.url, outcome);
}

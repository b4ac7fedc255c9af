//! Stale-while-revalidate for sub-resources

use super::{log_served, store_or_warn, FetchOutcome, Strategies};
use crate::cache::{CacheManager, PartitionHandle, PartitionRole};
use crate::error::PaviResult;
use crate::net::{Fetcher, Request, Response};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetch and, on an ok response, store. A failed fetch yields `None` and is
/// never surfaced.
async fn revalidate(
    cache: Arc<CacheManager>,
    fetcher: Arc<dyn Fetcher>,
    assets: PartitionHandle,
    request: Request,
) -> Option<Response> {
    match fetcher.fetch(&request).await {
        Ok(response) => {
            store_or_warn(&cache, &assets, &request, &response).await;
            Some(response)
        }
        Err(e) => {
            debug!("Revalidation of {} failed: {}", request.url, e);
            None
        }
    }
}

impl Strategies {
    /// Serve from the assets partition while refreshing it from the network
    ///
    /// The fetch starts before the lookup. With a cached entry the response
    /// is returned at once and the fetch finishes in the background. Without
    /// one the outcome is whatever the fetch produced.
    pub async fn stale_while_revalidate(&self, request: &Request) -> PaviResult<FetchOutcome> {
        let assets = self.cache.open_partition(PartitionRole::Assets).await?;

        let fetch = tokio::spawn(revalidate(
            self.cache.clone(),
            self.fetcher.clone(),
            assets.clone(),
            request.clone(),
        ));

        if let Some(entry) = self.lookup_or_miss(&assets, request).await {
            self.revalidations.track(fetch);
            let outcome = FetchOutcome::Cached(entry.into_response());
            log_served(request, &outcome);
            return Ok(outcome);
        }

        let outcome = match fetch.await {
            Ok(Some(response)) => FetchOutcome::Network(response),
            Ok(None) => FetchOutcome::Unavailable,
            Err(e) => {
                warn!("Revalidation task for {} aborted: {}", request.url, e);
                FetchOutcome::Unavailable
            }
        };
        log_served(request, &outcome);
        Ok(outcome)
    }
}

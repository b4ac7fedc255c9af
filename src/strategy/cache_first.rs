//! Cache-first for HTML navigation

use super::{log_served, store_or_warn, FetchOutcome, Strategies};
use crate::cache::PartitionRole;
use crate::error::{PaviError, PaviResult};
use crate::net::Request;

impl Strategies {
    /// Serve a page from the core partition, fetching only on a miss
    ///
    /// A hit never issues a network call. On a miss, an ok response is
    /// stored before it is returned. If the fetch fails the navigation fails;
    /// nothing is substituted for the missing page.
    pub async fn cache_first(&self, request: &Request) -> PaviResult<FetchOutcome> {
        let core = self.cache.open_partition(PartitionRole::Core).await?;

        if let Some(entry) = self.lookup_or_miss(&core, request).await {
            let outcome = FetchOutcome::Cached(entry.into_response());
            log_served(request, &outcome);
            return Ok(outcome);
        }

        let response = self
            .fetcher
            .fetch(request)
            .await
            .map_err(|e| PaviError::NavigationFailed {
                url: request.url.to_string(),
                source: Box::new(e),
            })?;

        store_or_warn(&self.cache, &core, request, &response).await;

        let outcome = FetchOutcome::Network(response);
        log_served(request, &outcome);
        Ok(outcome)
    }
}

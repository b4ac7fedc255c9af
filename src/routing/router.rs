//! Request router

use crate::error::PaviResult;
use crate::net::Request;
use crate::routing::classify::{classify, RouteRules, RoutingClass};
use crate::strategy::{FetchOutcome, Strategies};
use async_trait::async_trait;
use tracing::debug;

/// Handler invoked once per intercepted request
#[async_trait]
pub trait FetchHandler: Send + Sync {
    async fn handle(&self, request: &Request) -> PaviResult<FetchOutcome>;
}

/// Routes each request to the strategy its class selects
pub struct Router {
    rules: RouteRules,
    strategies: Strategies,
}

impl Router {
    pub fn new(rules: RouteRules, strategies: Strategies) -> Self {
        Self { rules, strategies }
    }

    pub fn classify(&self, request: &Request) -> RoutingClass {
        classify(request, &self.rules)
    }

    pub fn strategies(&self) -> &Strategies {
        &self.strategies
    }
}

#[async_trait]
impl FetchHandler for Router {
    async fn handle(&self, request: &Request) -> PaviResult<FetchOutcome> {
        let class = self.classify(request);
        debug!("{} {} classified as {}", request.method, request.url, class);

        match class {
            RoutingClass::HtmlNavigation => self.strategies.cache_first(request).await,
            RoutingClass::FontOrStyleResource | RoutingClass::SameOriginResource => {
                self.strategies.stale_while_revalidate(request).await
            }
            RoutingClass::NetworkOnly | RoutingClass::Other => {
                self.strategies.network_only(request).await
            }
        }
    }
}

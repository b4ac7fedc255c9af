//! Request classification
//!
//! Maps a request descriptor to the routing class that selects its
//! strategy. Pure: reads only the request and the host rules.

use crate::config::schema::RoutingConfig;
use crate::net::{Request, RequestMode};
use std::fmt;
use url::{Origin, Url};

/// Routing class of an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingClass {
    /// Dynamic backend; never cached
    NetworkOnly,
    /// Same-origin page load; cache-first from core
    HtmlNavigation,
    /// Web-font stylesheet or font file; stale-while-revalidate from assets
    FontOrStyleResource,
    /// Any other same-origin resource; stale-while-revalidate from assets
    SameOriginResource,
    /// Cross-origin, not otherwise known; plain network
    Other,
}

impl fmt::Display for RoutingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NetworkOnly => "network-only",
            Self::HtmlNavigation => "html-navigation",
            Self::FontOrStyleResource => "font-or-style",
            Self::SameOriginResource => "same-origin",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Host rules the classifier decides on
#[derive(Debug, Clone)]
pub struct RouteRules {
    app_origin: Origin,
    backend_host: String,
    backend_provider_domain: String,
    font_hosts: Vec<String>,
}

impl RouteRules {
    pub fn new(scope: &Url, routing: &RoutingConfig) -> Self {
        Self {
            app_origin: scope.origin(),
            backend_host: routing.backend_host.to_ascii_lowercase(),
            backend_provider_domain: routing
                .backend_provider_domain
                .trim_start_matches('.')
                .to_ascii_lowercase(),
            font_hosts: routing
                .font_hosts
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
        }
    }

    fn is_backend(&self, host: &str) -> bool {
        host == self.backend_host || is_subdomain_of(host, &self.backend_provider_domain)
    }

    fn is_font_host(&self, host: &str) -> bool {
        self.font_hosts
            .iter()
            .any(|font| host == font || is_subdomain_of(host, font))
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.app_origin
    }
}

/// `host` is a strict subdomain of `domain`
fn is_subdomain_of(host: &str, domain: &str) -> bool {
    !domain.is_empty()
        && host
            .strip_suffix(domain)
            .is_some_and(|rest| rest.len() > 1 && rest.ends_with('.'))
}

fn wants_html(request: &Request) -> bool {
    request.mode == RequestMode::Navigate
        || request
            .accept
            .as_deref()
            .is_some_and(|accept| accept.contains("text/html"))
}

/// Classify a request. First matching rule wins:
///
/// 1. backend host or provider subdomain
/// 2. same-origin navigation or HTML accept
/// 3. web-font host
/// 4. same-origin
/// 5. anything else
pub fn classify(request: &Request, rules: &RouteRules) -> RoutingClass {
    // url lower-cases hosts for special schemes
    let host = request.url.host_str().unwrap_or_default();

    if rules.is_backend(host) {
        return RoutingClass::NetworkOnly;
    }

    let same_origin = rules.is_same_origin(&request.url);

    if wants_html(request) && same_origin {
        return RoutingClass::HtmlNavigation;
    }

    if rules.is_font_host(host) {
        return RoutingClass::FontOrStyleResource;
    }

    if same_origin {
        return RoutingClass::SameOriginResource;
    }

    RoutingClass::Other
}

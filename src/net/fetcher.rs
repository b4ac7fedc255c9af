//! Network fetch capability
//!
//! The router never talks to the network directly; it goes through a
//! [`Fetcher`], so the real HTTP client can be swapped for a scripted one.

use crate::error::{PaviError, PaviResult};
use crate::net::{Request, Response};
use async_trait::async_trait;
use tracing::debug;
use ureq::{Agent, RequestBuilder};

/// Largest response body read into memory. Fonts and bundled assets stay
/// well under this; anything larger fails the fetch.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Abstract network interface
///
/// A returned `Err` means the fetch itself failed (DNS, connection, TLS).
/// HTTP error statuses are a successful fetch with a non-ok [`Response`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform one fetch. Implementations must not retry.
    async fn fetch(&self, request: &Request) -> PaviResult<Response>;
}

/// Fetcher backed by a blocking `ureq` agent on tokio's blocking pool
#[derive(Clone)]
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn with_accept<B>(builder: RequestBuilder<B>, accept: Option<&str>) -> RequestBuilder<B> {
    match accept {
        Some(value) => builder.header("accept", value),
        None => builder,
    }
}

fn fetch_blocking(agent: &Agent, request: &Request) -> PaviResult<Response> {
    let url = request.url.as_str();
    let accept = request.accept.as_deref();

    let result = match request.method.as_str() {
        "GET" => with_accept(agent.get(url), accept).call(),
        "HEAD" => with_accept(agent.head(url), accept).call(),
        "DELETE" => with_accept(agent.delete(url), accept).call(),
        "OPTIONS" => with_accept(agent.options(url), accept).call(),
        "POST" => with_accept(agent.post(url), accept).send_empty(),
        "PUT" => with_accept(agent.put(url), accept).send_empty(),
        "PATCH" => with_accept(agent.patch(url), accept).send_empty(),
        other => {
            return Err(PaviError::network(
                url,
                format!("unsupported method {}", other),
            ))
        }
    };

    let mut response = result.map_err(|e| PaviError::network(url, e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_vec()
        .map_err(|e| PaviError::network(url, format!("reading body: {}", e)))?;

    debug!("{} {} -> {} ({} bytes)", request.method, url, status, body.len());
    Ok(Response {
        status,
        headers,
        body,
    })
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> PaviResult<Response> {
        let agent = self.agent.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &request))
            .await
            .map_err(|e| PaviError::Internal(format!("fetch task failed: {}", e)))?
    }
}

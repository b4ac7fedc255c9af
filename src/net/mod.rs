//! Request and response types seen by the interception layer
//!
//! A [`Request`] is the descriptor handed to the router for every
//! intercepted fetch. A [`Response`] is what the network produced or what a
//! cache partition stored.

mod fetcher;

pub use fetcher::{Fetcher, HttpFetcher};

use crate::error::{PaviError, PaviResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Declared request mode of an intercepted fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level document load
    Navigate,
    SameOrigin,
    #[default]
    NoCors,
    Cors,
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Navigate => "navigate",
            Self::SameOrigin => "same-origin",
            Self::NoCors => "no-cors",
            Self::Cors => "cors",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RequestMode {
    type Err = PaviError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "navigate" => Ok(Self::Navigate),
            "same-origin" => Ok(Self::SameOrigin),
            "no-cors" => Ok(Self::NoCors),
            "cors" => Ok(Self::Cors),
            other => Err(PaviError::Internal(format!("unknown request mode: {}", other))),
        }
    }
}

/// An intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    /// Upper-case HTTP method
    pub method: String,
    pub mode: RequestMode,
    /// Value of the `Accept` header, if any
    pub accept: Option<String>,
}

impl Request {
    /// A plain `GET` sub-resource request
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: "GET".to_string(),
            mode: RequestMode::NoCors,
            accept: None,
        }
    }

    /// A top-level navigation request for an HTML document
    pub fn navigate(url: Url) -> Self {
        Self {
            url,
            method: "GET".to_string(),
            mode: RequestMode::Navigate,
            accept: Some("text/html,application/xhtml+xml,*/*;q=0.8".to_string()),
        }
    }

    /// Parse a URL string into a `GET` request
    pub fn parse(url: &str) -> PaviResult<Self> {
        let url = Url::parse(url).map_err(|e| PaviError::RequestUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::get(url))
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_ascii_uppercase();
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

/// A response from the network or a cache partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    /// Header name/value pairs in received order
    pub headers: Vec<(String, String)>,
    #[serde(with = "hex")]
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Whether the status is in the 2xx range
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name`, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

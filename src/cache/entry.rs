//! Stored cache entries and request key normalization

use crate::net::Response;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Normalize a request URL into its cache key
///
/// Query string and fragment are dropped so cache-busting parameters map to
/// the same entry. Applied before every read and write.
pub fn request_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_query(None);
    key.set_fragment(None);
    key.into()
}

/// A response stored in a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    /// Normalized request key
    pub key: String,
    pub response: Response,
    pub stored_at: DateTime<Utc>,
}

impl CachedEntry {
    pub fn new(key: String, response: Response) -> Self {
        Self {
            key,
            response,
            stored_at: Utc::now(),
        }
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}

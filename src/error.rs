//! Error types for pavi-offline
//!
//! All modules use `PaviResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pavi-offline operations
pub type PaviResult<T> = Result<T, PaviError>;

/// All errors that can occur in pavi-offline
#[derive(Error, Debug)]
pub enum PaviError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid configuration value {key}: {reason}")]
    ConfigValue { key: String, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Network errors
    #[error("Network request failed: {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Navigation to {url} failed and no cached copy exists")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<PaviError>,
    },

    #[error("Invalid request URL {url}: {reason}")]
    RequestUrl { url: String, reason: String },

    // Lifecycle errors
    #[error("Precache failed for {url}: {reason}")]
    PrecacheFailed { url: String, reason: String },

    #[error("Cannot {action} while worker is {state}")]
    LifecycleOrder { action: &'static str, state: String },

    // Cache storage errors
    #[error("Cache storage error in {partition}: {reason}")]
    Storage { partition: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaviError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a network error for a URL
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage error for a partition
    pub fn storage(partition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Storage {
            partition: partition.into(),
            reason: reason.into(),
        }
    }

    /// Check if error came from the network rather than local state
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::NavigationFailed { .. } | Self::PrecacheFailed { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NavigationFailed { .. } => {
                Some("The page was never cached. Connect once so it can be stored.")
            }
            Self::PrecacheFailed { .. } => {
                Some("Check that every entry in [precache].urls exists on the server")
            }
            Self::LifecycleOrder { .. } => Some("Run: pavi-offline install"),
            Self::ConfigInvalid { .. } | Self::ConfigValue { .. } => {
                Some("Run: pavi-offline config show")
            }
            _ => None,
        }
    }
}

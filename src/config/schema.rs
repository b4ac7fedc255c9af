//! Configuration schema for pavi-offline
//!
//! Configuration is stored at `~/.config/pavi-offline/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Agent identity: version, cache prefix, scope
    pub agent: AgentConfig,

    /// Host rules used by the request classifier
    pub routing: RoutingConfig,

    /// Resources stored in the core partition at install
    pub precache: PrecacheConfig,

    /// Cache storage location
    pub storage: StorageConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable the lifecycle journal
    pub journal: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            journal: true,
        }
    }
}

/// Agent identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Version identifier. Must change whenever the manifest or the
    /// routing logic changes.
    pub version: String,

    /// Prefix shared by every partition this agent owns
    pub cache_prefix: String,

    /// Application scope URL; its origin defines "same-origin"
    pub scope: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: "2026.01.15-01".to_string(),
            cache_prefix: "pavi-fast-".to_string(),
            scope: "http://localhost:8080/".to_string(),
        }
    }
}

/// Classifier host rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Dynamic backend host, always network-only (exact match)
    pub backend_host: String,

    /// Backend hosting provider; any subdomain is network-only
    pub backend_provider_domain: String,

    /// Web-font stylesheet and static-asset hosts
    pub font_hosts: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            backend_host: "script.google.com".to_string(),
            backend_provider_domain: "googleusercontent.com".to_string(),
            font_hosts: vec![
                "fonts.googleapis.com".to_string(),
                "fonts.gstatic.com".to_string(),
            ],
        }
    }
}

/// Precache manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecacheConfig {
    /// Paths relative to the scope URL, in install order
    pub urls: Vec<String>,
}

impl Default for PrecacheConfig {
    fn default() -> Self {
        let urls = [
            "./",
            "./index.html",
            "./FunnelSans-Bold.ttf",
            "./FunnelSans-BoldItalic.ttf",
            "./FunnelSans-Italic.ttf",
            "./FunnelSans-Medium.ttf",
            "./FunnelSans-Regular.ttf",
            "./FunnelSans-SemiBold.ttf",
            "./Roboto-Italic-VariableFont_wdth,wght.ttf",
            "./Roboto-VariableFont_wdth,wght.ttf",
            "./logo.png",
            "./poslog.html",
            "./primeiro_acesso.html",
            "./seletor_lotes.html",
            "./manifest.webmanifest",
        ];
        Self {
            urls: urls.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Cache root override (defaults to the local data directory)
    pub dir: Option<PathBuf>,
}

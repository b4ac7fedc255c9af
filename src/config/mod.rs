//! Configuration management for pavi-offline

pub mod schema;

pub use schema::Config;

use crate::error::{PaviError, PaviResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pavi-offline")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pavi-offline")
    }

    /// Get the lifecycle journal path
    pub fn journal_path() -> PathBuf {
        Self::state_dir().join("journal.log")
    }

    /// Get the cache storage root for a configuration
    ///
    /// Defaults to `<data_local_dir>/pavi-offline/caches`.
    pub fn storage_root(config: &Config) -> PathBuf {
        config.storage.dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pavi-offline")
                .join("caches")
        })
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> PaviResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load and validate configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> PaviResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PaviError::io(format!("reading config from {}", path.display()), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| PaviError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        validate(&config).map_err(|e| PaviError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> PaviResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            PaviError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> PaviResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PaviError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the values the worker cannot run without
pub fn validate(config: &Config) -> PaviResult<()> {
    let agent = &config.agent;

    if agent.version.trim().is_empty() {
        return Err(PaviError::ConfigValue {
            key: "agent.version".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if agent.cache_prefix.is_empty() {
        return Err(PaviError::ConfigValue {
            key: "agent.cache_prefix".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    scope_url(config)?;
    Ok(())
}

/// Parse the configured scope URL
pub fn scope_url(config: &Config) -> PaviResult<Url> {
    let scope = Url::parse(&config.agent.scope).map_err(|e| PaviError::ConfigValue {
        key: "agent.scope".to_string(),
        reason: e.to_string(),
    })?;

    if scope.host_str().is_none() {
        return Err(PaviError::ConfigValue {
            key: "agent.scope".to_string(),
            reason: "must be an absolute URL with a host".to_string(),
        });
    }

    Ok(scope)
}

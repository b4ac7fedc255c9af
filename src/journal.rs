//! Lifecycle journal
//!
//! One JSON object per line in `<state_dir>/journal.log`, recording how each
//! install and activation ended. The journal is write-mostly; a step never
//! fails because its record could not be written.

use crate::config::{schema::Config, ConfigManager};
use crate::error::{PaviError, PaviResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Outcome of a lifecycle step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LifecycleEvent {
    #[serde(rename = "install.completed")]
    InstallCompleted { partition: String, stored: usize },
    #[serde(rename = "install.failed")]
    InstallFailed { error: String },
    #[serde(rename = "activate.completed")]
    ActivateCompleted { evicted: Vec<String>, claimed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub at: DateTime<Utc>,
    pub version: String,
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

#[derive(Debug, Clone)]
pub struct Journal {
    path: Option<PathBuf>,
}

impl Journal {
    /// Journal at the default location, if enabled in config
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.general.journal.then(ConfigManager::journal_path),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Append a record for `version`
    pub async fn record(&self, version: &str, event: LifecycleEvent) {
        let Some(ref path) = self.path else {
            return;
        };

        let record = JournalRecord {
            at: Utc::now(),
            version: version.to_string(),
            event,
        };
        if let Err(e) = append_line(path, &record).await {
            warn!("Journal write to {} failed: {}", path.display(), e);
        }
    }

    /// Every record written so far, oldest first
    ///
    /// Lines that do not parse are skipped.
    pub async fn records(&self) -> PaviResult<Vec<JournalRecord>> {
        let Some(ref path) = self.path else {
            return Ok(vec![]);
        };
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(PaviError::io(format!("reading {}", path.display()), e)),
        };

        Ok(content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

async fn append_line(path: &std::path::Path, record: &JournalRecord) -> PaviResult<()> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PaviError::io(format!("creating {}", parent.display()), e))?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| PaviError::io(format!("opening {}", path.display()), e))?;
    file.write_all(&line)
        .await
        .map_err(|e| PaviError::io(format!("appending to {}", path.display()), e))?;
    Ok(())
}

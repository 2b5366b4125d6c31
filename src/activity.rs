//! Admin activity log
//!
//! Appends JSON lines to `<state_dir>/activity.log`. Enabled by default,
//! switched off with `general.activity_log = false`.

use crate::config::{schema::Config, ConfigManager};
use crate::model::ProductId;
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Something an admin did, or that happened to the admin session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Activity {
    LoggedIn { username: String },
    LoggedOut,
    SessionExpired,
    ProductCreated { id: Option<ProductId>, title: String },
    ProductUpdated { id: ProductId },
    ProductDeleted { id: ProductId },
}

#[derive(Serialize)]
struct Entry<'a> {
    timestamp: String,
    #[serde(flatten)]
    activity: &'a Activity,
}

/// File-based activity logger that appends JSON lines
pub struct ActivityLog {
    enabled: bool,
    path: PathBuf,
}

impl ActivityLog {
    /// Create a logger from config, writing to the default location
    pub fn new(config: &Config) -> Self {
        Self::at(ConfigManager::activity_log_path(), config.general.activity_log)
    }

    /// Create a logger writing to `path`
    pub fn at(path: PathBuf, enabled: bool) -> Self {
        Self { enabled, path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append `activity`
    ///
    /// IO failures are logged and dropped; they never fail the command.
    pub async fn record(&self, activity: Activity) {
        if !self.enabled {
            return;
        }

        let entry = Entry {
            timestamp: Utc::now().to_rfc3339(),
            activity: &activity,
        };

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize activity: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write activity log: {}", e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

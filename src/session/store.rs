//! Credential persistence

use crate::error::{HubError, HubResult};
use crate::session::state::Credential;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::debug;

/// Where the session keeps its credential between runs
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored credential, if any
    async fn load(&self) -> HubResult<Option<Credential>>;

    /// Replace the stored credential
    async fn save(&self, credential: &Credential) -> HubResult<()>;

    /// Remove the stored credential; a no-op when nothing is stored
    async fn clear(&self) -> HubResult<()>;
}

/// On-disk token record
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    stored_at: DateTime<Utc>,
}

/// Token file under the state directory, readable only by the owner
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> HubResult<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            HubError::io(format!("reading token file {}", self.path.display()), e)
        })?;

        let stored: StoredToken = serde_json::from_str(&content)?;
        if stored.token.is_empty() {
            return Ok(None);
        }

        debug!("Loaded credential stored at {}", stored.stored_at);
        Ok(Some(Credential::new(stored.token)))
    }

    async fn save(&self, credential: &Credential) -> HubResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HubError::io("creating state directory", e))?;
        }

        let stored = StoredToken {
            token: credential.secret().expose_secret().to_string(),
            stored_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored)?;

        fs::write(&self.path, content).await.map_err(|e| {
            HubError::io(format!("writing token file {}", self.path.display()), e)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| HubError::io("setting token file permissions", e))?;
        }

        debug!("Stored credential in {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> HubResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).await.map_err(|e| {
                HubError::io(format!("removing token file {}", self.path.display()), e)
            })?;
            debug!("Removed credential file {}", self.path.display());
        }
        Ok(())
    }
}

/// Process-local store for tests and embedding
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a credential already stored
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Whether a credential is currently stored
    pub fn has_token(&self) -> bool {
        self.token
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn slot(&self) -> HubResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| HubError::Internal("token store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> HubResult<Option<Credential>> {
        Ok(self.slot()?.clone().map(Credential::new))
    }

    async fn save(&self, credential: &Credential) -> HubResult<()> {
        *self.slot()? = Some(credential.secret().expose_secret().to_string());
        Ok(())
    }

    async fn clear(&self) -> HubResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

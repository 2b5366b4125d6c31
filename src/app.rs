//! Wiring for a single command invocation
//!
//! Builds the session, gateway, query cache and activity log from the loaded
//! configuration and hands them to commands as one context.

use crate::activity::{Activity, ActivityLog};
use crate::cache::QueryCache;
use crate::config::{Config, ConfigManager};
use crate::error::{HubError, HubResult};
use crate::gateway::{Gateway, HttpGateway};
use crate::mutation::MutationCoordinator;
use crate::session::{FileTokenStore, Session};
use crate::ui::{TerminalNotifier, UiContext};
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs to talk to the storefront
pub struct HubContext {
    pub config: Config,
    pub session: Arc<Session>,
    pub gateway: Arc<HttpGateway>,
    pub cache: QueryCache,
    pub activity: ActivityLog,
    pub ui: UiContext,
}

impl HubContext {
    /// Restore the session from the state directory and connect to the API
    ///
    /// `api_url` wins over `api.base_url` from the config.
    pub async fn build(config: Config, api_url: Option<&str>) -> HubResult<Self> {
        ConfigManager::ensure_state_dirs().await?;

        let store = Arc::new(FileTokenStore::new(ConfigManager::token_path()));
        let session = Arc::new(Session::restore(store).await?);

        let base_url = api_url.unwrap_or(&config.api.base_url);
        let gateway = Arc::new(HttpGateway::new(base_url, Arc::clone(&session))?);
        debug!("Using API at {}", gateway.base_url());

        let cache = QueryCache::new(Arc::clone(&gateway) as Arc<dyn Gateway>);
        let activity = ActivityLog::new(&config);

        Ok(Self {
            config,
            session,
            gateway,
            cache,
            activity,
            ui: UiContext::detect(),
        })
    }

    /// Coordinator for admin writes, reporting to the terminal
    pub fn coordinator(&self) -> MutationCoordinator {
        MutationCoordinator::new(
            Arc::clone(&self.gateway) as Arc<dyn Gateway>,
            self.cache.clone(),
            Arc::new(TerminalNotifier::new(self.ui.clone())),
        )
    }

    /// Pass `result` through, logging a session expiry if the API rejected the credential
    pub async fn track<T>(&self, result: HubResult<T>) -> HubResult<T> {
        if let Err(HubError::AuthExpired) = &result {
            self.activity.record(Activity::SessionExpired).await;
        }
        result
    }
}

//! Session state: whether an admin is logged in

use crate::error::{HubError, HubResult};
use crate::gateway::Gateway;
use crate::model::LoginCredentials;
use crate::session::store::TokenStore;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Opaque bearer token issued by the API
#[derive(Debug)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn secret(&self) -> &SecretString {
        &self.0
    }
}

/// The admin session
///
/// Authentication is derived from whether a credential is held. Shared by
/// the gateway (which attaches and, on rejection, clears the credential) and
/// by the commands that gate the admin surface.
pub struct Session {
    store: Arc<dyn TokenStore>,
    credential: watch::Sender<Option<Credential>>,
}

impl Session {
    /// Build a session from whatever credential `store` holds
    pub async fn restore(store: Arc<dyn TokenStore>) -> HubResult<Self> {
        let credential = store.load().await?;
        debug!(
            "Session restored ({})",
            if credential.is_some() {
                "credential present"
            } else {
                "anonymous"
            }
        );
        Ok(Self::with_credential(store, credential))
    }

    /// Build a session with an explicit starting credential
    pub fn with_credential(store: Arc<dyn TokenStore>, credential: Option<Credential>) -> Self {
        let (credential, _) = watch::channel(credential);
        Self { store, credential }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.borrow().is_some()
    }

    /// Watch authentication changes; the value is `Some` while logged in
    pub fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.credential.subscribe()
    }

    /// Fail with `NotAuthenticated` unless logged in
    pub fn require_authenticated(&self) -> HubResult<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(HubError::NotAuthenticated)
        }
    }

    /// Token to present as `Authorization: Bearer <token>`
    pub(crate) fn bearer_token(&self) -> Option<String> {
        self.credential
            .borrow()
            .as_ref()
            .map(|c| c.secret().expose_secret().to_string())
    }

    /// Exchange credentials for a token and persist it
    pub async fn login(&self, gateway: &dyn Gateway, credentials: &LoginCredentials) -> HubResult<()> {
        let credential = gateway.login(credentials).await?;
        self.store.save(&credential).await?;
        self.credential.send_replace(Some(credential));
        info!("Logged in as {}", credentials.username);
        Ok(())
    }

    /// Forget the credential
    pub async fn logout(&self) -> HubResult<()> {
        self.store.clear().await?;
        self.credential.send_replace(None);
        info!("Logged out");
        Ok(())
    }

    /// Drop a credential the API rejected
    ///
    /// The in-memory credential is cleared even if the store fails.
    pub async fn expire(&self) {
        let had_credential = self.credential.send_replace(None).is_some();
        if let Err(e) = self.store.clear().await {
            warn!("Failed to remove rejected credential: {}", e);
        }
        if had_credential {
            warn!("Credential rejected by the API, session cleared");
        }
    }
}

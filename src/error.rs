//! Error types for AffiliateHub
//!
//! All modules use `HubResult<T>` as their return type.

use crate::model::ValidationErrors;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for AffiliateHub operations
pub type HubResult<T> = Result<T, HubError>;

/// All errors that can occur in AffiliateHub
#[derive(Error, Debug)]
pub enum HubError {
    // Client-side validation
    #[error("Invalid product: {0}")]
    Validation(ValidationErrors),

    // Remote API errors
    #[error("Request failed: {operation}: {reason}")]
    RequestFailed { operation: String, reason: String },

    #[error("Session expired, credential cleared")]
    AuthExpired,

    #[error("Login rejected: invalid username or password")]
    LoginRejected,

    #[error("Not logged in")]
    NotAuthenticated,

    // Mutation errors
    #[error("Product ID is missing")]
    MissingIdentifier,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Another change is still in progress")]
    MutationPending,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

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

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl HubError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a request failure for a gateway operation
    pub fn request_failed(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::RequestFailed {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Recover an owned error from one shared between cache waiters.
    ///
    /// Variants that carry non-cloneable sources collapse into `Internal`.
    pub fn from_shared(err: Arc<HubError>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(|shared| shared.replicate())
    }

    fn replicate(&self) -> Self {
        match self {
            Self::Validation(errors) => Self::Validation(errors.clone()),
            Self::RequestFailed { operation, reason } => Self::RequestFailed {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::AuthExpired => Self::AuthExpired,
            Self::LoginRejected => Self::LoginRejected,
            Self::NotAuthenticated => Self::NotAuthenticated,
            Self::MissingIdentifier => Self::MissingIdentifier,
            Self::ProductNotFound(id) => Self::ProductNotFound(id.clone()),
            Self::MutationPending => Self::MutationPending,
            Self::User(message) => Self::User(message.clone()),
            other => Self::Internal(other.to_string()),
        }
    }

    /// Whether the error means the stored credential is no longer usable
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::AuthExpired | Self::LoginRejected | Self::NotAuthenticated
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AuthExpired | Self::NotAuthenticated => Some("Run: affiliate-hub login"),
            Self::LoginRejected => Some("Check the username and password, then retry"),
            Self::RequestFailed { .. } => {
                Some("Check that the API is reachable (affiliate-hub status)")
            }
            Self::MissingIdentifier => {
                Some("Records without an identifier cannot be edited or removed")
            }
            _ => None,
        }
    }
}

//! Remote data gateway
//!
//! Abstracts the product and auth endpoints of the storefront API so the
//! query cache and mutation coordinator can run against the HTTP client or a
//! test double.

pub mod http;

pub use http::HttpGateway;

use crate::error::HubResult;
use crate::model::{LoginCredentials, NewProduct, Product, ProductId, ProductPatch};
use crate::session::Credential;
use async_trait::async_trait;

/// Storefront API operations
///
/// Implementations attach the session credential to every call. A rejected
/// credential clears the session and surfaces as `HubError::AuthExpired`
/// (`HubError::LoginRejected` for `login`).
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /products`
    async fn list(&self) -> HubResult<Vec<Product>>;

    /// `POST /products`
    async fn create(&self, fields: &NewProduct) -> HubResult<Product>;

    /// `PUT /products/:id`
    async fn update(&self, id: &ProductId, patch: &ProductPatch) -> HubResult<Product>;

    /// `DELETE /products/:id`
    async fn delete(&self, id: &ProductId) -> HubResult<()>;

    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginCredentials) -> HubResult<Credential>;

    /// `GET /auth/verify`
    async fn verify(&self) -> HubResult<()>;
}

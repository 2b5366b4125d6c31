//! HTTP implementation of the gateway over `reqwest`

use crate::error::{HubError, HubResult};
use crate::gateway::Gateway;
use crate::model::product;
use crate::model::{LoginCredentials, NewProduct, Product, ProductId, ProductPatch};
use crate::session::{Credential, Session};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Storefront API client
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

/// Request body for create and update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,

    #[serde(rename = "amazonUrl", skip_serializing_if = "Option::is_none")]
    affiliate_url: Option<&'a str>,
}

impl<'a> ProductPayload<'a> {
    fn create(fields: &'a NewProduct) -> HubResult<Self> {
        let price = fields.price.normalize().map_err(HubError::Validation)?;
        Ok(Self {
            title: Some(&fields.title),
            price: Some(price),
            image_url: Some(&fields.image_url),
            affiliate_url: Some(&fields.affiliate_url),
        })
    }

    fn patch(patch: &'a ProductPatch) -> HubResult<Self> {
        let price = match &patch.price {
            Some(input) => Some(input.normalize().map_err(HubError::Validation)?),
            None => None,
        };
        Ok(Self {
            title: patch.title.as_deref(),
            price,
            image_url: patch.image_url.as_deref(),
            affiliate_url: patch.affiliate_url.as_deref(),
        })
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl HttpGateway {
    /// Create a client for the API rooted at `base_url` (e.g. `http://localhost:5000/api`)
    pub fn new(base_url: &str, session: Arc<Session>) -> HubResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HubError::User(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HubError::User(format!("Invalid API URL '{}'", base_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("affiliate-hub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HubError::Internal(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// API root this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> HubResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HubError::Internal(format!("API URL {} has no path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> HubResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    /// Attach the credential, send, and map rejections
    async fn send(&self, operation: &str, request: RequestBuilder) -> HubResult<Response> {
        let request = match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!("No credential held, sending {} anonymously", operation);
                request
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| HubError::request_failed(operation, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.expire().await;
            return Err(HubError::AuthExpired);
        }

        if !status.is_success() {
            return Err(HubError::request_failed(
                operation,
                describe_failure(status, response).await,
            ));
        }

        Ok(response)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> HubResult<T> {
        response
            .json()
            .await
            .map_err(|e| HubError::request_failed(operation, format!("malformed response: {}", e)))
    }
}

async fn describe_failure(status: StatusCode, response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) if !parsed.message.is_empty() => format!("HTTP {}: {}", status, parsed.message),
        _ => format!("HTTP {}", status),
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list(&self) -> HubResult<Vec<Product>> {
        const OP: &str = "list products";
        let response = self.send(OP, self.request(Method::GET, &["products"])?).await?;
        let products = product::discard_negative_prices(Self::read_json(OP, response).await?);
        debug!("Fetched {} products", products.len());
        Ok(products)
    }

    async fn create(&self, fields: &NewProduct) -> HubResult<Product> {
        const OP: &str = "create product";
        let payload = ProductPayload::create(fields)?;
        let request = self.request(Method::POST, &["products"])?.json(&payload);
        let response = self.send(OP, request).await?;
        Self::read_json(OP, response).await
    }

    async fn update(&self, id: &ProductId, patch: &ProductPatch) -> HubResult<Product> {
        const OP: &str = "update product";
        let payload = ProductPayload::patch(patch)?;
        let request = self
            .request(Method::PUT, &["products", id.as_str()])?
            .json(&payload);
        let response = self.send(OP, request).await?;
        Self::read_json(OP, response).await
    }

    async fn delete(&self, id: &ProductId) -> HubResult<()> {
        const OP: &str = "delete product";
        self.send(OP, self.request(Method::DELETE, &["products", id.as_str()])?)
            .await?;
        Ok(())
    }

    async fn login(&self, credentials: &LoginCredentials) -> HubResult<Credential> {
        const OP: &str = "login";
        let body = LoginRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };
        let request = self.request(Method::POST, &["auth", "login"])?.json(&body);

        let response = match self.send(OP, request).await {
            Err(HubError::AuthExpired) => return Err(HubError::LoginRejected),
            other => other?,
        };

        let LoginResponse { token } = Self::read_json(OP, response).await?;
        if token.is_empty() {
            return Err(HubError::request_failed(OP, "empty token in response"));
        }
        Ok(Credential::new(token))
    }

    async fn verify(&self) -> HubResult<()> {
        self.send("verify session", self.request(Method::GET, &["auth", "verify"])?)
            .await?;
        Ok(())
    }
}

//! Product records as served by the API

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Canonical product identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create an identifier from text
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as it appears in request paths
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProduct", rename_all = "camelCase")]
pub struct Product {
    /// Canonical identifier; `None` for records the API sent without one
    pub id: Option<ProductId>,

    pub title: String,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,

    pub image_url: String,

    /// Vendor purchase link carrying the affiliate tag
    #[serde(rename = "amazonUrl")]
    pub affiliate_url: String,

    /// ISO-8601 creation time as sent by the API
    pub created_at: String,

    pub updated_at: String,
}

impl Product {
    /// Creation time, if the API sent a parseable timestamp
    ///
    /// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Price formatted for display (`$19.99`)
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Identifier as it may appear on the wire
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_id(self) -> Option<ProductId> {
        match self {
            RawId::Text(text) if text.trim().is_empty() => None,
            RawId::Text(text) => Some(ProductId(text)),
            RawId::Number(n) => Some(ProductId(number_text(&n))),
        }
    }
}

/// Decimal text for a numeric id; integral floats lose their `.0`
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
            return format!("{f:.0}");
        }
    }
    n.to_string()
}

/// Drop records whose price breaks the `price >= 0` invariant
pub(crate) fn discard_negative_prices(products: Vec<Product>) -> Vec<Product> {
    products
        .into_iter()
        .filter(|product| {
            let keep = !product.price.is_sign_negative() || product.price.is_zero();
            if !keep {
                warn!(
                    "Skipping '{}' ({}): negative price {}",
                    product.title,
                    product.id.as_ref().map_or("no id", ProductId::as_str),
                    product.price
                );
            }
            keep
        })
        .collect()
}

/// Wire shape of a product, carrying both candidate identifiers
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    #[serde(rename = "_id", default)]
    document_id: Option<RawId>,
    #[serde(default)]
    id: Option<RawId>,
    title: String,
    price: Decimal,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    amazon_url: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        // `_id` is the key the API routes on; plain `id` is the fallback.
        let id = raw
            .document_id
            .and_then(RawId::into_id)
            .or_else(|| raw.id.and_then(RawId::into_id));

        Self {
            id,
            title: raw.title,
            price: raw.price,
            image_url: raw.image_url,
            affiliate_url: raw.amazon_url,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

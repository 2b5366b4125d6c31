//! Configuration schema for affiliate-hub
//!
//! Configuration is stored at `~/.config/affiliate-hub/config.toml`

use crate::view::{SortKey, ViewFilter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Storefront API settings
    pub api: ApiConfig,

    /// Catalog view defaults
    pub catalog: CatalogConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Record admin activity to the activity log
    pub activity_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            activity_log: true,
        }
    }
}

/// Storefront API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root, e.g. `http://localhost:5000/api`
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
        }
    }
}

/// Defaults for the catalog filter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Lowest price shown
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price_min: Decimal,

    /// Highest price shown
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price_max: Decimal,

    /// `price-asc`, `price-desc` or `date-desc`
    pub sort: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let filter = ViewFilter::default();
        Self {
            price_min: filter.price_min,
            price_max: filter.price_max,
            sort: filter.sort.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Starting filter for the catalog view
    pub fn filter(&self) -> ViewFilter {
        ViewFilter {
            search: String::new(),
            price_min: self.price_min,
            price_max: self.price_max,
            sort: self.sort.parse().unwrap_or(SortKey::PriceAsc),
        }
    }
}

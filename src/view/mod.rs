//! Derived catalog view
//!
//! [`derive`] turns the cached collection plus the current [`ViewFilter`]
//! into the list that is actually shown. It is pure and recomputes from
//! scratch on every call.

use crate::model::Product;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Ordering applied after filtering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    /// Newest first by creation time
    DateDesc,
    /// Any other key; input order is kept
    Unrecognized(String),
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "price-asc" => SortKey::PriceAsc,
            "price-desc" => SortKey::PriceDesc,
            "date-desc" => SortKey::DateDesc,
            other => SortKey::Unrecognized(other.to_string()),
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::PriceAsc => f.write_str("price-asc"),
            SortKey::PriceDesc => f.write_str("price-desc"),
            SortKey::DateDesc => f.write_str("date-desc"),
            SortKey::Unrecognized(key) => f.write_str(key),
        }
    }
}

/// What the catalog user has asked to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilter {
    pub search: String,
    pub price_min: Decimal,
    pub price_max: Decimal,
    pub sort: SortKey,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            price_min: Decimal::ZERO,
            price_max: Decimal::from(1000),
            sort: SortKey::PriceAsc,
        }
    }
}

impl ViewFilter {
    /// Title contains the search text (ignoring case) and price is within bounds
    pub fn matches(&self, product: &Product) -> bool {
        let in_range = self.price_min <= product.price && product.price <= self.price_max;
        in_range
            && (self.search.is_empty()
                || product
                    .title
                    .to_lowercase()
                    .contains(&self.search.to_lowercase()))
    }
}

/// Filter and sort `products` for display
pub fn derive(products: &[Product], filter: &ViewFilter) -> Vec<Product> {
    let mut shown: Vec<Product> = products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect();

    match &filter.sort {
        SortKey::PriceAsc => shown.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => shown.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::DateDesc => shown.sort_by_cached_key(|p| {
            let created = p.created();
            (created.is_none(), Reverse(created))
        }),
        SortKey::Unrecognized(_) => {}
    }

    shown
}

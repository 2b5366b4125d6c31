//! Admin input: the product form and the payloads derived from it

use super::product::Product;
use super::validate::{self, ValidationErrors};
use rust_decimal::Decimal;
use secrecy::SecretString;
use std::str::FromStr;

/// A price as entered: a number, or decimal text from a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceInput {
    Number(Decimal),
    Text(String),
}

impl PriceInput {
    /// Normalize to a non-negative decimal
    pub fn normalize(&self) -> Result<Decimal, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let price = match self {
            PriceInput::Number(n) => Some(*n),
            PriceInput::Text(text) if text.trim().is_empty() => {
                errors.push("price", "Price is required");
                None
            }
            PriceInput::Text(text) => match Decimal::from_str(text.trim()) {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.push("price", format!("'{}' is not a number", text.trim()));
                    None
                }
            },
        };

        match price {
            Some(n) if n.is_sign_negative() && !n.is_zero() => {
                errors.push("price", "Price must be positive");
                Err(errors)
            }
            Some(n) => Ok(n),
            None => Err(errors),
        }
    }
}

impl From<Decimal> for PriceInput {
    fn from(n: Decimal) -> Self {
        PriceInput::Number(n)
    }
}

impl From<&str> for PriceInput {
    fn from(text: &str) -> Self {
        PriceInput::Text(text.to_string())
    }
}

/// Fields for a new listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub price: PriceInput,
    pub image_url: String,
    pub affiliate_url: String,
}

impl NewProduct {
    /// Check every field constraint
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        validate::check_title(&self.title, &mut errors);
        if let Err(price_errors) = self.price.normalize() {
            for e in price_errors.fields() {
                errors.push(e.field, e.message.clone());
            }
        }
        validate::check_image_url(&self.image_url, &mut errors);
        validate::check_affiliate_url(&self.affiliate_url, &mut errors);
        errors.into_result()
    }
}

/// A partial update; absent fields are left untouched by the API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<PriceInput>,
    pub image_url: Option<String>,
    pub affiliate_url: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.affiliate_url.is_none()
    }

    /// Check constraints on the fields that are present
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Some(title) = &self.title {
            validate::check_title(title, &mut errors);
        }
        if let Some(price) = &self.price {
            if let Err(price_errors) = price.normalize() {
                for e in price_errors.fields() {
                    errors.push(e.field, e.message.clone());
                }
            }
        }
        if let Some(url) = &self.image_url {
            validate::check_image_url(url, &mut errors);
        }
        if let Some(url) = &self.affiliate_url {
            validate::check_affiliate_url(url, &mut errors);
        }
        errors.into_result()
    }
}

impl From<NewProduct> for ProductPatch {
    fn from(fields: NewProduct) -> Self {
        Self {
            title: Some(fields.title),
            price: Some(fields.price),
            image_url: Some(fields.image_url),
            affiliate_url: Some(fields.affiliate_url),
        }
    }
}

/// The admin product form, holding field text as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub image_url: String,
    pub affiliate_url: String,
}

impl ProductForm {
    /// Prefill the form from an existing listing
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            affiliate_url: product.affiliate_url.clone(),
        }
    }

    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Validate the form and produce the submission payload
    pub fn submission(&self) -> Result<NewProduct, ValidationErrors> {
        let fields = NewProduct {
            title: self.title.trim().to_string(),
            price: PriceInput::Text(self.price.clone()),
            image_url: self.image_url.trim().to_string(),
            affiliate_url: self.affiliate_url.trim().to_string(),
        };
        fields.validate()?;
        Ok(fields)
    }
}

/// Admin login input
#[derive(Debug)]
pub struct LoginCredentials {
    pub username: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

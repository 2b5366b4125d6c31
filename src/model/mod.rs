//! Product data model
//!
//! Wire records are normalized into [`Product`] on ingestion; admin input
//! travels through [`ProductForm`] and is validated before it reaches the
//! gateway.

pub mod form;
pub mod product;
pub mod validate;

pub use form::{LoginCredentials, NewProduct, PriceInput, ProductForm, ProductPatch};
pub use product::{Product, ProductId};
pub use validate::{FieldError, ValidationErrors};

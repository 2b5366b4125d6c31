//! Client-side field constraints for product input

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?[a-z0-9-]+(\.[a-z]{2,})+[/\w .-]*/?$")
        .expect("image URL pattern is valid")
});

static AFFILIATE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https://(www\.amazon\.[a-z]{2,3}|amzn\.to)/.+$")
        .expect("affiliate URL pattern is valid")
});

/// A single failed constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every constraint that failed for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether `field` failed at least one constraint
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub(crate) fn check_title(title: &str, errors: &mut ValidationErrors) {
    if title.trim().is_empty() {
        errors.push("title", "Title is required");
    }
}

pub(crate) fn check_image_url(url: &str, errors: &mut ValidationErrors) {
    if url.trim().is_empty() {
        errors.push("imageUrl", "Image URL is required");
    } else if !IMAGE_URL.is_match(url.trim()) {
        errors.push("imageUrl", "Must be a valid URL");
    }
}

pub(crate) fn check_affiliate_url(url: &str, errors: &mut ValidationErrors) {
    if url.trim().is_empty() {
        errors.push("amazonUrl", "Amazon URL is required");
    } else if !AFFILIATE_URL.is_match(url.trim()) {
        errors.push("amazonUrl", "Must be a valid Amazon URL");
    }
}

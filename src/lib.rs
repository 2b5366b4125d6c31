//! AffiliateHub - affiliate product storefront client
//!
//! Browses the public product catalog and drives the admin surface
//! (login, create, edit, delete) of an AffiliateHub REST API.

pub mod activity;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod mutation;
pub mod session;
pub mod ui;
pub mod view;


pub use error::{HubError, HubResult};

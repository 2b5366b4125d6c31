//! CLI command implementations

pub mod admin;
pub mod catalog;
pub mod completions;
pub mod config;
pub mod login;
pub mod status;

pub use admin::execute as admin;
pub use catalog::execute as catalog;
pub use completions::execute as completions;
pub use config::execute as config;
pub use login::{login, logout};
pub use status::execute as status;

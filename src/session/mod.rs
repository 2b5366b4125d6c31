//! Admin session: the bearer credential and where it is persisted

pub mod state;
pub mod store;

pub use state::{Credential, Session};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

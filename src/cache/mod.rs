//! Cached query layer
//!
//! Holds the product collection fetched from the gateway so repeated reads
//! in one process share a single request. Entries live until a mutation
//! invalidates them; there is no time-based expiry.
//!
//! # Entry States
//!
//! | State | Read behaviour |
//! |-------|----------------|
//! | Absent | fetch, all concurrent readers wait on that one fetch |
//! | Cached | returned without a request |
//! | Invalidated | treated as absent on the next read |

pub mod query;

pub use query::{QueryCache, QueryKey};

//! Mutation coordination for the admin surface
//!
//! Every write goes through [`MutationCoordinator`]: it validates the form,
//! picks create or update from the edit selection, and on success
//! invalidates the cached product collection before reporting completion.

pub mod coordinator;
pub mod notify;

pub use coordinator::{MutationCoordinator, MutationKind, MutationState};
pub use notify::Notifier;

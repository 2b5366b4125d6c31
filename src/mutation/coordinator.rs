//! Create, update and delete with cache invalidation

use crate::cache::{QueryCache, QueryKey};
use crate::error::{HubError, HubResult};
use crate::gateway::Gateway;
use crate::model::{Product, ProductForm, ProductId, ProductPatch};
use crate::mutation::notify::Notifier;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Kind of write being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn success_message(self) -> &'static str {
        match self {
            MutationKind::Create => "Product created successfully",
            MutationKind::Update => "Product updated successfully",
            MutationKind::Delete => "Product deleted successfully",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            MutationKind::Create => "Failed to create product",
            MutationKind::Update => "Failed to update product",
            MutationKind::Delete => "Failed to delete product",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Create => f.write_str("create"),
            MutationKind::Update => f.write_str("update"),
            MutationKind::Delete => f.write_str("delete"),
        }
    }
}

/// Where the latest mutation attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending(MutationKind),
    Succeeded(MutationKind),
    Failed(MutationKind),
}

/// Holds `Pending` for the duration of a request
///
/// Dropping the guard puts the previous state back, so a mutation future
/// dropped mid-request cannot leave the coordinator locked. `settle` sets the
/// final state once the guard is gone.
struct PendingGuard<'a> {
    state: &'a mut MutationState,
    previous: MutationState,
}

impl<'a> PendingGuard<'a> {
    fn enter(state: &'a mut MutationState, kind: MutationKind) -> Self {
        let previous = *state;
        *state = MutationState::Pending(kind);
        Self { state, previous }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.state = self.previous;
    }
}

/// Drives admin writes and keeps the query cache honest
///
/// Local state (cache, selection, form) is only changed after the API
/// confirms a write; a failure leaves all three as they were.
pub struct MutationCoordinator {
    gateway: Arc<dyn Gateway>,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
    state: MutationState,
    selection: Option<ProductId>,
    form: ProductForm,
}

impl MutationCoordinator {
    pub fn new(gateway: Arc<dyn Gateway>, cache: QueryCache, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            cache,
            notifier,
            state: MutationState::Idle,
            selection: None,
            form: ProductForm::default(),
        }
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    /// Whether a write is in flight; submissions are refused meanwhile
    pub fn is_pending(&self) -> bool {
        matches!(self.state, MutationState::Pending(_))
    }

    /// Listing currently being edited
    pub fn selection(&self) -> Option<&ProductId> {
        self.selection.as_ref()
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// Start editing `product`, loading its fields into the form
    pub fn select_for_edit(&mut self, product: &Product) -> HubResult<()> {
        let id = product.id.clone().ok_or_else(|| {
            warn!("Cannot edit '{}': record has no identifier", product.title);
            HubError::MissingIdentifier
        })?;
        debug!("Editing product {}", id);
        self.form = ProductForm::from_product(product);
        self.selection = Some(id);
        Ok(())
    }

    /// Leave edit mode and clear the form
    pub fn cancel_edit(&mut self) {
        self.selection = None;
        self.form.reset();
        if self.is_pending() {
            self.state = MutationState::Idle;
        }
    }

    /// Submit the form: update the selected listing, or create a new one
    ///
    /// Validation failures are returned before any request is made.
    pub async fn submit(&mut self) -> HubResult<Product> {
        self.ensure_idle()?;
        let fields = self.form.submission().map_err(HubError::Validation)?;

        let (kind, result) = match self.selection.clone() {
            Some(id) => {
                let _pending = PendingGuard::enter(&mut self.state, MutationKind::Update);
                let result = self.gateway.update(&id, &ProductPatch::from(fields)).await;
                (MutationKind::Update, result)
            }
            None => {
                let _pending = PendingGuard::enter(&mut self.state, MutationKind::Create);
                (MutationKind::Create, self.gateway.create(&fields).await)
            }
        };
        self.settle(kind, result).await
    }

    /// Delete a listing by identifier
    ///
    /// Without an identifier nothing is sent; the failure is reported locally.
    pub async fn delete(&mut self, id: Option<&ProductId>) -> HubResult<()> {
        self.ensure_idle()?;

        let Some(id) = id else {
            self.notifier.error(HubError::MissingIdentifier.to_string().as_str());
            self.state = MutationState::Failed(MutationKind::Delete);
            return Err(HubError::MissingIdentifier);
        };

        let result = {
            let _pending = PendingGuard::enter(&mut self.state, MutationKind::Delete);
            self.gateway.delete(id).await
        };
        self.settle(MutationKind::Delete, result).await
    }

    fn ensure_idle(&self) -> HubResult<()> {
        if self.is_pending() {
            return Err(HubError::MutationPending);
        }
        Ok(())
    }

    async fn settle<T>(&mut self, kind: MutationKind, result: HubResult<T>) -> HubResult<T> {
        match result {
            Ok(value) => {
                self.cache.invalidate(QueryKey::Products).await;
                self.notifier.success(kind.success_message());
                self.selection = None;
                self.form.reset();
                self.state = MutationState::Succeeded(kind);
                info!("Product {} succeeded", kind);
                Ok(value)
            }
            Err(err) => {
                self.notifier
                    .error(&format!("{}: {}", kind.failure_message(), err));
                self.state = MutationState::Failed(kind);
                warn!("Product {} failed: {}", kind, err);
                Err(err)
            }
        }
    }
}

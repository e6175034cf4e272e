//! Application state shared across handlers.

use std::sync::Arc;

use inkleaf_orders::OrderWorkflow;

use crate::auth::IdentityProvider;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and hands the order workflow
/// and the identity provider to route handlers and extractors.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    workflow: OrderWorkflow,
    identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(workflow: OrderWorkflow, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { workflow, identity }),
        }
    }

    /// Get a reference to the order workflow.
    #[must_use]
    pub fn workflow(&self) -> &OrderWorkflow {
        &self.inner.workflow
    }

    /// Get a reference to the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }
}

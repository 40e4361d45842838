//! The dashboard session: sole owner of the live model.
//!
//! Every accepted change replaces the shared snapshot, bumps the version and
//! schedules a flush. Changes that leave the model as it was are dropped
//! before they reach persistence.

use std::sync::Arc;

use nebula_core::{
    DragMove, GateError, ImportPlan, MutationGate, apply_drag, export_categories, filter_categories,
    reorder,
};
use nebula_types::{AppState, Category, CategoryId, LinkId, PendingAction, Secret};

use crate::persistence::{FlushReport, PersistenceCoordinator};

#[derive(Debug)]
pub struct Dashboard {
    state: Arc<AppState>,
    version: u64,
    gate: MutationGate,
    persistence: PersistenceCoordinator,
}

impl Dashboard {
    /// Wrap a freshly loaded model. The initial state is not flushed.
    #[must_use]
    pub fn new(state: AppState, secret: Option<Secret>, persistence: PersistenceCoordinator) -> Self {
        Self {
            state: Arc::new(state),
            version: 0,
            gate: MutationGate::new(secret),
            persistence,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Cheap shared handle to the current model.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Increments once per accepted change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn persistence(&self) -> &PersistenceCoordinator {
        &self.persistence
    }

    fn install(&mut self, next: AppState) -> bool {
        if next == *self.state {
            return false;
        }
        self.state = Arc::new(next);
        self.version += 1;
        self.persistence.schedule(Arc::clone(&self.state));
        true
    }

    // Gated edits

    /// Park an edit until the password is confirmed. Returns the edit it displaced.
    pub fn request(&mut self, action: PendingAction) -> Option<PendingAction> {
        self.gate.request(action)
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        self.gate.pending()
    }

    #[must_use]
    pub fn prompt(&self) -> Option<String> {
        self.gate.prompt()
    }

    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.gate.cancel()
    }

    /// Confirm the pending edit and install its result.
    pub fn confirm(&mut self, password: &str) -> Result<PendingAction, GateError> {
        let confirmed = self.gate.confirm(password, &self.state)?;
        if confirmed.clears_storage {
            self.persistence.clear_cache();
        }
        self.install(confirmed.state);
        Ok(confirmed.action)
    }

    // Ungated edits

    /// Move a link within its category. `false` when nothing moved.
    pub fn reorder(&mut self, category_id: &CategoryId, old_index: usize, new_index: usize) -> bool {
        match reorder(&self.state.categories, category_id, old_index, new_index) {
            Some(categories) => self.install(self.state.with_categories(categories)),
            None => false,
        }
    }

    /// Drop link `active` onto link `over`, each named with its category.
    pub fn drag(&mut self, active: (&CategoryId, &LinkId), over: (&CategoryId, &LinkId)) -> bool {
        let next = DragMove::from_link_ids(&self.state.categories, active, over)
            .and_then(|drag| apply_drag(&self.state.categories, &drag));
        match next {
            Some(categories) => self.install(self.state.with_categories(categories)),
            None => false,
        }
    }

    /// Replace all categories with a validated import once `affirm` accepts
    /// the overwrite prompt.
    pub fn import(&mut self, plan: ImportPlan, affirm: impl FnOnce(&str) -> bool) -> bool {
        if !affirm(&plan.prompt()) {
            tracing::info!(count = plan.count(), "Import declined");
            return false;
        }
        let count = plan.count();
        let changed = self.install(self.state.with_categories(plan.into_categories()));
        tracing::info!(count, changed, "Import applied");
        true
    }

    pub fn export(&self) -> serde_json::Result<String> {
        export_categories(&self.state.categories)
    }

    pub fn set_background_image(&mut self, image: Option<String>) -> bool {
        let next = AppState {
            background_image: image.filter(|s| !s.is_empty()),
            ..AppState::clone(&self.state)
        };
        self.install(next)
    }

    pub fn set_logo_text(&mut self, text: impl Into<String>) -> bool {
        let next = AppState {
            logo_text: text.into(),
            ..AppState::clone(&self.state)
        };
        self.install(next)
    }

    pub fn set_logo_image(&mut self, image: Option<String>) -> bool {
        let next = AppState {
            logo_image: image.filter(|s| !s.is_empty()),
            ..AppState::clone(&self.state)
        };
        self.install(next)
    }

    // Views

    #[must_use]
    pub fn filtered(&self, query: &str) -> Vec<Category> {
        filter_categories(&self.state.categories, query)
    }

    // Persistence

    pub async fn flush_now(&self) -> Option<FlushReport> {
        self.persistence.flush_now().await
    }

    /// Flush and stop persistence, handing back the final model.
    pub async fn shutdown(self) -> (Arc<AppState>, Option<FlushReport>) {
        let report = self.persistence.shutdown().await;
        (self.state, report)
    }
}

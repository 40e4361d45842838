//! Password confirmation gate for state-changing actions.
//!
//! The gate is a single-slot queue: requesting a second action before the
//! first is confirmed silently replaces it. Confirmation compares against the
//! one configured [`Secret`] and, on success, hands back the transformed
//! model for the caller to install.
//!
//! ```text
//! Idle --request--> PendingConfirmation --confirm(ok)--> Idle
//!                    |  ^    |
//!                    |  |    +--cancel / confirm(no secret)--> Idle
//!                    +--+ request (replace) / confirm(wrong password)
//! ```

use std::mem;

use nebula_types::{AppState, PendingAction, Secret};

use crate::errors::GateError;
use crate::mutate::{self, Applied};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    PendingConfirmation(PendingAction),
}

/// A confirmed action together with the model it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    pub action: PendingAction,
    pub state: AppState,
    pub clears_storage: bool,
}

#[derive(Debug)]
pub struct MutationGate {
    secret: Option<Secret>,
    state: GateState,
}

impl MutationGate {
    #[must_use]
    pub fn new(secret: Option<Secret>) -> Self {
        Self {
            secret,
            state: GateState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GateState {
        &self.state
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        match &self.state {
            GateState::Idle => None,
            GateState::PendingConfirmation(action) => Some(action),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    /// Text for the confirmation prompt, if something is waiting.
    #[must_use]
    pub fn prompt(&self) -> Option<String> {
        self.pending().map(PendingAction::describe)
    }

    /// Park `action` as the pending action.
    ///
    /// Returns the action it displaced, which is dropped without effect.
    pub fn request(&mut self, action: PendingAction) -> Option<PendingAction> {
        tracing::debug!(kind = action.kind(), "Action awaiting confirmation");
        match mem::replace(&mut self.state, GateState::PendingConfirmation(action)) {
            GateState::Idle => None,
            GateState::PendingConfirmation(previous) => {
                tracing::debug!(kind = previous.kind(), "Pending action replaced");
                Some(previous)
            }
        }
    }

    /// Discard the pending action, if any.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        match mem::replace(&mut self.state, GateState::Idle) {
            GateState::Idle => None,
            GateState::PendingConfirmation(action) => Some(action),
        }
    }

    /// Check `password` and, on success, apply the pending action to `current`.
    ///
    /// - No secret configured: the pending action is discarded.
    /// - Wrong password: the pending action stays so the user can retry.
    pub fn confirm(&mut self, password: &str, current: &AppState) -> Result<Confirmed, GateError> {
        if !self.is_pending() {
            return Err(GateError::NothingPending);
        }

        let Some(secret) = self.secret.as_ref() else {
            let dropped = self.cancel();
            tracing::warn!(
                kind = dropped.as_ref().map_or("none", PendingAction::kind),
                "Confirmation rejected: no password configured"
            );
            return Err(GateError::Configuration);
        };

        if !secret.matches(password) {
            tracing::info!("Confirmation rejected: wrong password");
            return Err(GateError::Authorization);
        }

        let GateState::PendingConfirmation(action) =
            mem::replace(&mut self.state, GateState::Idle)
        else {
            return Err(GateError::NothingPending);
        };

        let Applied {
            state,
            clears_storage,
        } = mutate::apply(current, &action);
        tracing::info!(kind = action.kind(), "Action confirmed");

        Ok(Confirmed {
            action,
            state,
            clears_storage,
        })
    }
}

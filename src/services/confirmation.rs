//! Confirmation gate for destructive chat actions.
//!
//! DESIGN
//! ======
//! Per-session two-state machine: no entry in the map is `NONE`, an entry is
//! `PENDING(action)`. A new request overwrites the old one; confirm and cancel
//! both remove the entry, so a second confirm resolves to nothing.
//!
//! Each request remembers what opened it. A request opened by the list
//! view's clear button can only be resolved from the yes/no prompt, so
//! pressing that button twice never clears.
//!
//! TRADE-OFFS
//! ==========
//! Pending requests never expire. A stale prompt left in the chat can still
//! be confirmed later, matching how the buttons behaved before the gate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use time::OffsetDateTime;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    ClearList,
}

impl PendingAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClearList => "clear-list",
        }
    }
}

/// What opened a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// A `/clear` command.
    Command,
    /// The clear button on a list message.
    Button,
}

/// Outstanding request for one chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub action: PendingAction,
    pub origin: RequestOrigin,
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Default)]
pub struct ConfirmationGate {
    pending: Arc<Mutex<HashMap<String, ConfirmationRequest>>>,
}

impl ConfirmationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `session_id` to `PENDING(action)`, replacing any earlier request.
    pub fn request(&self, session_id: &str, action: PendingAction) -> ConfirmationRequest {
        self.request_from(session_id, action, RequestOrigin::Command)
    }

    pub fn request_from(&self, session_id: &str, action: PendingAction, origin: RequestOrigin) -> ConfirmationRequest {
        let request = ConfirmationRequest { action, origin, created_at: OffsetDateTime::now_utc() };
        self.lock().insert(session_id.to_owned(), request);
        request
    }

    /// Resolve the pending action, if any. Confirming with nothing pending is a no-op.
    pub fn confirm(&self, session_id: &str) -> Option<PendingAction> {
        let request = self.lock().remove(session_id)?;
        Some(Self::resolved(session_id, request))
    }

    /// Resolve the pending action only if it was opened by `origin`. Any other
    /// request is left in place.
    pub fn confirm_opened_by(&self, session_id: &str, origin: RequestOrigin) -> Option<PendingAction> {
        let request = {
            let mut pending = self.lock();
            if pending.get(session_id)?.origin != origin {
                return None;
            }
            pending.remove(session_id)?
        };
        Some(Self::resolved(session_id, request))
    }

    fn resolved(session_id: &str, request: ConfirmationRequest) -> PendingAction {
        debug!(
            session_id,
            action = request.action.as_str(),
            pending_for = %(OffsetDateTime::now_utc() - request.created_at),
            "confirmation resolved"
        );
        request.action
    }

    /// Drop any pending request. Returns whether one existed.
    pub fn cancel(&self, session_id: &str) -> bool {
        self.lock().remove(session_id).is_some()
    }

    #[must_use]
    pub fn pending(&self, session_id: &str) -> Option<ConfirmationRequest> {
        self.lock().get(session_id).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ConfirmationRequest>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "confirmation_test.rs"]
mod tests;

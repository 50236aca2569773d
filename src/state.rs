//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! list store and confirmation gate are the only mutable state in the
//! process; both gateways and the admin routes hold clones of the same
//! handles. The chat gateway exists only when the chat channel is configured.

use std::sync::Arc;

use crate::services::chat::ChatCommandGateway;
use crate::services::confirmation::ConfirmationGate;
use crate::services::list::ShoppingListStore;
use crate::services::notify::NotificationDispatcher;
use crate::services::render::ListRenderer;
use crate::services::voice::VoiceIntentGateway;
use crate::telegram::ChatTransport;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-backed handles.
#[derive(Clone)]
pub struct AppState {
    pub store: ShoppingListStore,
    pub gate: ConfirmationGate,
    pub dispatcher: NotificationDispatcher,
    pub voice: VoiceIntentGateway,
    /// `None` if the chat channel is not configured.
    pub chat: Option<ChatCommandGateway>,
}

impl AppState {
    #[must_use]
    pub fn new(
        renderer: ListRenderer,
        dispatcher: NotificationDispatcher,
        transport: Option<Arc<dyn ChatTransport>>,
    ) -> Self {
        let store = ShoppingListStore::new();
        let gate = ConfirmationGate::new();
        let voice = VoiceIntentGateway::new(store.clone(), dispatcher.clone());
        let chat = transport.map(|t| ChatCommandGateway::new(store.clone(), gate.clone(), renderer, dispatcher.clone(), t));
        Self { store, gate, dispatcher, voice, chat }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

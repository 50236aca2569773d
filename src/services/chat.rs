//! Chat command gateway: bot commands and inline button presses.
//!
//! ARCHITECTURE
//! ============
//! Inbound updates arrive as a closed [`ChatEvent`]. Commands read the list
//! and reply with a new message; buttons edit the message they were pressed
//! on and always answer the callback, even when delivery of the edit fails.
//!
//! The destructive path runs through [`ConfirmationGate`]: the list is only
//! cleared when a pending `clear-list` request for the same chat resolves.
//! The clear button on a list message resolves only requests opened by
//! `/clear`; its own requests need the prompt's confirm button.
//!
//! A chat clear is fanned out to the notification chat unless it happened
//! in that chat, where the edited message already shows it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::services::confirmation::{ConfirmationGate, PendingAction, RequestOrigin};
use crate::services::list::ShoppingListStore;
use crate::services::notify::NotificationDispatcher;
use crate::services::render::{self, ListRenderer};
use crate::telegram::{ChatError, ChatTransport};

pub const HELP_TEXT: &str = "🛒 Lista de compras\n\n\
Comandos disponibles:\n\
/list: ver la lista actual\n\
/clear: limpiar la lista (pide confirmación)\n\
/help: mostrar esta ayuda\n\n\
Para agregar productos díselo a Alexa, por ejemplo: \"agrega leche\".";

pub const FAILURE_ACK: &str = "⚠️ Algo salió mal. Intenta de nuevo.";
const NOTHING_PENDING_ACK: &str = "No hay nada pendiente de confirmar.";
const UNKNOWN_BUTTON_ACK: &str = "Acción no disponible.";

// =============================================================================
// EVENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    List,
    Clear,
    Help,
    Unknown(String),
}

impl ChatCommand {
    /// Parse a `/command`, ignoring arguments and any `@botname` suffix.
    /// Returns `None` for text that is not a command.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(name, _)| name);
        Some(match name.to_lowercase().as_str() {
            "list" | "lista" => Self::List,
            "clear" | "limpiar" => Self::Clear,
            "help" | "start" | "ayuda" => Self::Help,
            other => Self::Unknown(other.to_owned()),
        })
    }
}

/// Button ids carried in callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonId {
    ListAgain,
    ClearList,
    ConfirmClear,
    CancelClear,
    Unknown(String),
}

impl ButtonId {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "list-again" => Self::ListAgain,
            "clear-list" => Self::ClearList,
            "confirm-clear" => Self::ConfirmClear,
            "cancel-clear" => Self::CancelClear,
            other => Self::Unknown(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ListAgain => "list-again",
            Self::ClearList => "clear-list",
            Self::ConfirmClear => "confirm-clear",
            Self::CancelClear => "cancel-clear",
            Self::Unknown(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Command {
        session_id: String,
        command: ChatCommand,
    },
    Button {
        session_id: String,
        message_id: i64,
        callback_id: String,
        button: ButtonId,
    },
}

/// What a button press did to shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonOutcome {
    Refreshed,
    /// Confirmation prompt shown; nothing cleared yet.
    Prompted,
    Cleared(usize),
    Cancelled { had_pending: bool },
    NothingPending,
    Ignored,
}

// =============================================================================
// GATEWAY
// =============================================================================

#[derive(Clone)]
pub struct ChatCommandGateway {
    store: ShoppingListStore,
    gate: ConfirmationGate,
    renderer: ListRenderer,
    dispatcher: NotificationDispatcher,
    transport: Arc<dyn ChatTransport>,
}

impl ChatCommandGateway {
    #[must_use]
    pub fn new(
        store: ShoppingListStore,
        gate: ConfirmationGate,
        renderer: ListRenderer,
        dispatcher: NotificationDispatcher,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self { store, gate, renderer, dispatcher, transport }
    }

    pub async fn handle(&self, event: ChatEvent) {
        match event {
            ChatEvent::Command { session_id, command } => match command {
                ChatCommand::List => self.handle_list_command(&session_id).await,
                ChatCommand::Clear => self.handle_clear_command(&session_id).await,
                ChatCommand::Help => self.handle_help_command(&session_id).await,
                ChatCommand::Unknown(name) => self.handle_unknown_command(&session_id, &name).await,
            },
            ChatEvent::Button { session_id, message_id, callback_id, button } => {
                let outcome = self
                    .handle_button(&session_id, message_id, &callback_id, &button)
                    .await;
                debug!(session_id, ?outcome, "button handled");
            }
        }
    }

    /// Tell the user an update could not be handled: answer the button press,
    /// or reply in the chat for a command.
    pub async fn report_failure(&self, event: &ChatEvent) {
        match event {
            ChatEvent::Command { session_id, .. } => self.reply(session_id, FAILURE_ACK, &[]).await,
            ChatEvent::Button { callback_id, .. } => self.answer(callback_id, FAILURE_ACK).await,
        }
    }

    pub async fn handle_list_command(&self, session_id: &str) {
        let text = self.renderer.render(&self.store.snapshot());
        self.reply(session_id, &text, &render::clear_button()).await;
    }

    pub async fn handle_clear_command(&self, session_id: &str) {
        let request = self.gate.request(session_id, PendingAction::ClearList);
        info!(session_id, action = request.action.as_str(), "confirmation requested");
        let text = render::clear_prompt(self.store.size());
        self.reply(session_id, &text, &render::confirm_buttons()).await;
    }

    pub async fn handle_help_command(&self, session_id: &str) {
        self.reply(session_id, HELP_TEXT, &[]).await;
    }

    pub async fn handle_unknown_command(&self, session_id: &str, name: &str) {
        let text = format!("No conozco el comando /{name}. Usa /help para ver los comandos.");
        self.reply(session_id, &text, &[]).await;
    }

    pub async fn handle_button(
        &self,
        session_id: &str,
        message_id: i64,
        callback_id: &str,
        button: &ButtonId,
    ) -> ButtonOutcome {
        match button {
            ButtonId::ListAgain => {
                let text = self.renderer.render(&self.store.snapshot());
                let edited = self
                    .transport
                    .edit_message(session_id, message_id, &text, &render::list_buttons())
                    .await;
                self.finish(callback_id, edited, "Lista actualizada").await;
                ButtonOutcome::Refreshed
            }
            ButtonId::ClearList => {
                if self.gate.confirm_opened_by(session_id, RequestOrigin::Command) == Some(PendingAction::ClearList) {
                    return self.clear_confirmed(session_id, message_id, callback_id).await;
                }
                // Pressed from the list view (again, on a double tap): (re)open the prompt.
                self.gate
                    .request_from(session_id, PendingAction::ClearList, RequestOrigin::Button);
                let text = render::clear_prompt(self.store.size());
                let edited = self
                    .transport
                    .edit_message(session_id, message_id, &text, &render::confirm_buttons())
                    .await;
                self.finish(callback_id, edited, "Confirma para limpiar").await;
                ButtonOutcome::Prompted
            }
            ButtonId::ConfirmClear => match self.gate.confirm(session_id) {
                Some(PendingAction::ClearList) => self.clear_confirmed(session_id, message_id, callback_id).await,
                None => {
                    self.answer(callback_id, NOTHING_PENDING_ACK).await;
                    ButtonOutcome::NothingPending
                }
            },
            ButtonId::CancelClear => {
                let had_pending = self.gate.cancel(session_id);
                let edited = self
                    .transport
                    .edit_message(session_id, message_id, render::CANCELLED_NOTICE, &[])
                    .await;
                self.finish(callback_id, edited, "Cancelado").await;
                ButtonOutcome::Cancelled { had_pending }
            }
            ButtonId::Unknown(raw) => {
                info!(session_id, button = %raw, "unknown button id");
                self.answer(callback_id, UNKNOWN_BUTTON_ACK).await;
                ButtonOutcome::Ignored
            }
        }
    }

    async fn clear_confirmed(&self, session_id: &str, message_id: i64, callback_id: &str) -> ButtonOutcome {
        let removed = self.store.clear();
        info!(session_id, removed, "shopping list cleared from chat");
        if self.dispatcher.destination() != Some(session_id) {
            self.dispatcher.notify_mutation(Vec::new());
        }
        let edited = self
            .transport
            .edit_message(session_id, message_id, &render::cleared_notice(removed), &[])
            .await;
        self.finish(callback_id, edited, "Lista limpiada").await;
        ButtonOutcome::Cleared(removed)
    }

    /// Answer the callback, swapping in a failure notice when the edit did not land.
    async fn finish(&self, callback_id: &str, edited: Result<(), ChatError>, ok_text: &str) {
        match edited {
            Ok(()) => self.answer(callback_id, ok_text).await,
            Err(e) if is_not_modified(&e) => self.answer(callback_id, ok_text).await,
            Err(e) => {
                warn!(error = %e, "chat edit failed");
                self.answer(callback_id, FAILURE_ACK).await;
            }
        }
    }

    async fn answer(&self, callback_id: &str, text: &str) {
        if let Err(e) = self.transport.answer_callback(callback_id, text).await {
            warn!(error = %e, "chat callback answer failed");
        }
    }

    async fn reply(&self, session_id: &str, text: &str, buttons: &[crate::telegram::Button]) {
        if let Err(e) = self.transport.send_message(session_id, text, buttons).await {
            warn!(error = %e, session_id, "chat reply failed");
        }
    }
}

/// Telegram rejects edits that leave the message unchanged; the user already sees the right text.
fn is_not_modified(err: &ChatError) -> bool {
    matches!(err, ChatError::Api { description, .. } if description.contains("message is not modified"))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

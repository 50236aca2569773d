//! Chat transport types: outbound buttons, inbound updates, errors.
//!
//! The wire shapes follow the Telegram Bot API. Only the fields the gateway
//! reads are modelled; everything else in an update is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::services::chat::{ButtonId, ChatCommand, ChatEvent};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by chat delivery. Callers log and swallow these.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The HTTP request to the Bot API failed.
    #[error("chat request failed: {0}")]
    Request(String),

    /// The Bot API answered `ok: false` or a non-success status.
    #[error("chat API error: status {status}: {description}")]
    Api { status: u16, description: String },

    /// The Bot API response body could not be deserialized.
    #[error("chat response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// Delivery did not finish inside the notification timeout.
    #[error("chat delivery timed out after {0}s")]
    Timeout(u64),
}

// =============================================================================
// BUTTONS
// =============================================================================

/// One inline keyboard button. `callback_data` carries the protocol button id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    pub callback_data: String,
}

impl Button {
    #[must_use]
    pub fn new(text: &str, id: ButtonId) -> Self {
        Self { text: text.to_owned(), callback_data: id.as_str().to_owned() }
    }
}

// =============================================================================
// CHAT TRANSPORT TRAIT
// =============================================================================

/// Outbound chat operations. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a new message, buttons laid out in a single row. Returns the message id.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] if delivery fails.
    async fn send_message(&self, chat_id: &str, text: &str, buttons: &[Button]) -> Result<i64, ChatError>;

    /// Replace the text (and keyboard) of an existing message.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] if delivery fails.
    async fn edit_message(&self, chat_id: &str, message_id: i64, text: &str, buttons: &[Button])
    -> Result<(), ChatError>;

    /// Acknowledge a button press with a short toast.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] if delivery fails.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), ChatError>;
}

// =============================================================================
// INBOUND UPDATES
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub message: Option<IncomingMessage>,
    pub data: Option<String>,
}

impl Update {
    /// Translate into a gateway event. `None` for updates the bot does not act on
    /// (plain text, stickers, callbacks detached from a message).
    #[must_use]
    pub fn into_event(self) -> Option<ChatEvent> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(ChatEvent::Button {
                session_id: message.chat.id.to_string(),
                message_id: message.message_id,
                callback_id: query.id,
                button: ButtonId::parse(query.data.as_deref().unwrap_or_default()),
            });
        }

        let message = self.message?;
        let command = ChatCommand::parse(message.text.as_deref()?)?;
        Some(ChatEvent::Command { session_id: message.chat.id.to_string(), command })
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

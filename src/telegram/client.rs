//! Telegram Bot API client.
//!
//! Thin HTTP wrapper over `sendMessage`, `editMessageText` and
//! `answerCallbackQuery`. Pure parsing in `parse_response` for testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{Button, ChatError, ChatTransport};
use crate::config::TelegramConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Build a client from the parsed chat configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ChatError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.clone(), token: config.bot_token.clone() })
    }

    async fn call<B: Serialize + Sync>(&self, method: &str, body: &B) -> Result<serde_json::Value, ChatError> {
        let url = format!("{}/bot{}/{method}", self.base_url, self.token);

        // The URL embeds the bot token; strip it from any error we surface.
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Request(e.without_url().to_string()))?;

        parse_response(status, &text)
    }
}

#[async_trait::async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(&self, chat_id: &str, text: &str, buttons: &[Button]) -> Result<i64, ChatError> {
        let body = SendMessage { chat_id, text, reply_markup: keyboard(buttons) };
        let result = self.call("sendMessage", &body).await?;
        let sent: SentMessage = serde_json::from_value(result).map_err(|e| ChatError::Parse(e.to_string()))?;
        Ok(sent.message_id)
    }

    async fn edit_message(
        &self,
        chat_id: &str,
        message_id: i64,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), ChatError> {
        let body = EditMessageText { chat_id, message_id, text, reply_markup: keyboard(buttons) };
        self.call("editMessageText", &body).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), ChatError> {
        let body = AnswerCallbackQuery { callback_query_id: callback_id, text };
        self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Serialize)]
struct EditMessageText<'a> {
    chat_id: &'a str,
    message_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup<'a> {
    inline_keyboard: [&'a [Button]; 1],
}

fn keyboard(buttons: &[Button]) -> Option<InlineKeyboardMarkup<'_>> {
    if buttons.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup { inline_keyboard: [buttons] })
    }
}

#[derive(Deserialize)]
struct ApiEnvelope {
    ok: bool,
    description: Option<String>,
    result: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct SentMessage {
    message_id: i64,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(status: u16, body: &str) -> Result<serde_json::Value, ChatError> {
    let envelope: ApiEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !(200..300).contains(&status) => {
            return Err(ChatError::Api { status, description: body.to_owned() });
        }
        Err(e) => return Err(ChatError::Parse(e.to_string())),
    };

    if !envelope.ok || !(200..300).contains(&status) {
        return Err(ChatError::Api {
            status,
            description: envelope.description.unwrap_or_default(),
        });
    }

    Ok(envelope.result.unwrap_or(serde_json::Value::Null))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

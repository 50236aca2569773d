//! Telegram: chat transport for list notifications and bot commands.
//!
//! DESIGN
//! ======
//! Gateways only see the [`ChatTransport`] trait. The concrete
//! [`TelegramClient`] is built from config at startup; when the bot token or
//! destination chat is missing the service runs with chat disabled.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{Button, ChatError, ChatTransport, Update};

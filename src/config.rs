//! Service configuration parsed from environment variables.

use time::UtcOffset;
use time::macros::format_description;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_TELEGRAM_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TELEGRAM_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_NOTIFY_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_NOTIFY_SEND_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid DISPLAY_UTC_OFFSET '{0}' (expected +HH:MM or -HH:MM)")]
    InvalidOffset(String),
}

/// Chat channel settings. Present only when both token and chat id are set.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Destination for list notifications.
    pub chat_id: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

// Keep the bot token out of logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyConfig {
    pub queue_capacity: usize,
    pub send_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub telegram: Option<TelegramConfig>,
    pub notify: NotifyConfig,
    pub display_offset: UtcOffset,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `TELEGRAM_BOT_TOKEN` + `TELEGRAM_CHAT_ID`: chat disabled unless both are set
    /// - `TELEGRAM_API_BASE_URL`: default Bot API host
    /// - `TELEGRAM_REQUEST_TIMEOUT_SECS`: default 10
    /// - `TELEGRAM_CONNECT_TIMEOUT_SECS`: default 5
    /// - `NOTIFY_QUEUE_CAPACITY`: default 64
    /// - `NOTIFY_SEND_TIMEOUT_SECS`: default 15
    /// - `DISPLAY_UTC_OFFSET`: `+HH:MM` / `-HH:MM`, default `+00:00`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOffset`] if `DISPLAY_UTC_OFFSET` does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let display_offset = match non_empty_var("DISPLAY_UTC_OFFSET") {
            Some(raw) => parse_offset(&raw)?,
            None => UtcOffset::UTC,
        };

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            telegram: telegram_from_env(),
            notify: NotifyConfig {
                queue_capacity: env_parse("NOTIFY_QUEUE_CAPACITY", DEFAULT_NOTIFY_QUEUE_CAPACITY).max(1),
                send_timeout_secs: env_parse("NOTIFY_SEND_TIMEOUT_SECS", DEFAULT_NOTIFY_SEND_TIMEOUT_SECS),
            },
            display_offset,
        })
    }
}

fn telegram_from_env() -> Option<TelegramConfig> {
    let bot_token = non_empty_var("TELEGRAM_BOT_TOKEN")?;
    let chat_id = non_empty_var("TELEGRAM_CHAT_ID")?;
    let api_base_url = non_empty_var("TELEGRAM_API_BASE_URL")
        .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    Some(TelegramConfig {
        bot_token,
        chat_id,
        api_base_url,
        request_timeout_secs: env_parse("TELEGRAM_REQUEST_TIMEOUT_SECS", DEFAULT_TELEGRAM_REQUEST_TIMEOUT_SECS),
        connect_timeout_secs: env_parse("TELEGRAM_CONNECT_TIMEOUT_SECS", DEFAULT_TELEGRAM_CONNECT_TIMEOUT_SECS),
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_offset(raw: &str) -> Result<UtcOffset, ConfigError> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw, format).map_err(|_| ConfigError::InvalidOffset(raw.to_string()))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

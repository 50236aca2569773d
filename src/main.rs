mod alexa;
mod catalog;
mod config;
mod routes;
mod services;
mod state;
mod telegram;

use std::sync::Arc;

use services::notify::NotificationDispatcher;
use services::render::ListRenderer;
use telegram::{ChatTransport, TelegramClient};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let renderer = ListRenderer::new(config.display_offset);

    // Chat is optional: voice keeps working, notifications are skipped.
    let (dispatcher, transport) = match &config.telegram {
        Some(tg) => match TelegramClient::new(tg) {
            Ok(client) => {
                tracing::info!(chat_id = %tg.chat_id, "chat channel enabled");
                let transport: Arc<dyn ChatTransport> = Arc::new(client);
                let dispatcher =
                    NotificationDispatcher::spawn(transport.clone(), tg.chat_id.clone(), renderer, config.notify);
                (dispatcher, Some(transport))
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat client failed to build; chat disabled");
                (NotificationDispatcher::disabled(), None)
            }
        },
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set; chat disabled");
            (NotificationDispatcher::disabled(), None)
        }
    };

    let state = state::AppState::new(renderer, dispatcher, transport);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "shopping bridge listening");
    axum::serve(listener, app).await.expect("server failed");
}

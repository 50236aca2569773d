//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two inbound channels share one router: the voice skill posts to `/alexa`
//! and the chat platform posts updates to `/telegram/webhook`. The list
//! routes are plumbing for health checks and manual administration.

pub mod alexa;
pub mod lista;
pub mod telegram;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(lista::status))
        .route("/lista", get(lista::list_entries).delete(lista::clear_entries))
        .route("/alexa", post(alexa::handle_alexa))
        .route("/telegram/webhook", post(telegram::handle_webhook))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

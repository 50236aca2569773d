//! Chat bot webhook.

use std::panic::AssertUnwindSafe;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use futures::FutureExt;
use tracing::{debug, error};

use crate::state::AppState;
use crate::telegram::Update;

/// `POST /telegram/webhook`: always 200 so the platform does not redeliver.
pub async fn handle_webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let Some(gateway) = &state.chat else {
        debug!("chat update received while chat is disabled");
        return StatusCode::OK;
    };

    let update = match serde_json::from_slice::<Update>(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "ignoring undecodable chat update");
            return StatusCode::OK;
        }
    };

    let update_id = update.update_id;
    let Some(event) = update.into_event() else {
        debug!(update_id, "ignoring chat update");
        return StatusCode::OK;
    };

    // A panicking handler still answers the user.
    let handled = AssertUnwindSafe(gateway.handle(event.clone()))
        .catch_unwind()
        .await;
    if handled.is_err() {
        error!(update_id, "chat handler panicked");
        gateway.report_failure(&event).await;
    }
    StatusCode::OK
}

#[cfg(test)]
#[path = "telegram_test.rs"]
mod tests;

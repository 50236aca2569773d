//! Voice skill endpoint.

use std::panic::AssertUnwindSafe;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;

use crate::alexa::{self, ResponseEnvelope};
use crate::services::voice::{VoiceError, VoiceIntentGateway};
use crate::state::AppState;

/// `POST /alexa`: always answers 200 with a speakable response envelope.
pub async fn handle_alexa(State(state): State<AppState>, body: Bytes) -> Json<ResponseEnvelope> {
    let intent = alexa::parse_intent(&body);
    let reply = std::panic::catch_unwind(AssertUnwindSafe(|| state.voice.handle(intent))).unwrap_or_else(|_| {
        VoiceIntentGateway::handle_unrecognized(&VoiceError::Internal("voice handler panicked".into()))
    });
    Json(reply.into())
}

#[cfg(test)]
#[path = "alexa_test.rs"]
mod tests;

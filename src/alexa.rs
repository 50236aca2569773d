//! Alexa skill wire format: request envelope in, response envelope out.
//!
//! Only the request type, intent name and slot values are read. Both the
//! English and Spanish intent/slot names of the add-product intent are accepted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::services::voice::{SpokenReply, VoiceError, VoiceIntent};

const ADD_PRODUCT_INTENTS: [&str; 2] = ["AddProductIntent", "AgregarProductoIntent"];
const PRODUCT_SLOTS: [&str; 2] = ["product", "producto"];

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    pub request: AlexaRequest,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum AlexaRequest {
    LaunchRequest {},
    IntentRequest { intent: Intent },
    SessionEndedRequest {},
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Deserialize)]
pub struct Slot {
    pub value: Option<String>,
}

/// Decode a raw request body into a voice intent. Undecodable bodies become
/// [`VoiceIntent::Unrecognized`] so the caller still answers with speech.
#[must_use]
pub fn parse_intent(body: &[u8]) -> VoiceIntent {
    match serde_json::from_slice::<RequestEnvelope>(body) {
        Ok(envelope) => envelope.request.into_intent(),
        Err(e) => VoiceIntent::Unrecognized(VoiceError::Unrecognized(format!("malformed envelope: {e}"))),
    }
}

impl AlexaRequest {
    #[must_use]
    pub fn into_intent(self) -> VoiceIntent {
        match self {
            Self::LaunchRequest {} => VoiceIntent::Launch,
            Self::SessionEndedRequest {} => VoiceIntent::Stop,
            Self::IntentRequest { intent } => intent.into_voice_intent(),
            Self::Other => VoiceIntent::Unrecognized(VoiceError::Unrecognized("unsupported request type".into())),
        }
    }
}

impl Intent {
    fn into_voice_intent(mut self) -> VoiceIntent {
        match self.name.as_str() {
            name if ADD_PRODUCT_INTENTS.contains(&name) => {
                let product = PRODUCT_SLOTS
                    .iter()
                    .find_map(|slot| self.slots.remove(*slot).and_then(|s| s.value));
                VoiceIntent::AddProduct { product }
            }
            "AMAZON.HelpIntent" => VoiceIntent::Help,
            "AMAZON.CancelIntent" | "AMAZON.StopIntent" => VoiceIntent::Stop,
            other => VoiceIntent::Unrecognized(VoiceError::Unrecognized(format!("unknown intent {other}"))),
        }
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    version: &'static str,
    response: ResponseBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBody {
    output_speech: OutputSpeech,
    #[serde(skip_serializing_if = "Option::is_none")]
    reprompt: Option<Reprompt>,
    should_end_session: bool,
}

#[derive(Debug, Serialize)]
struct OutputSpeech {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl OutputSpeech {
    fn plain(text: String) -> Self {
        Self { kind: "PlainText", text }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reprompt {
    output_speech: OutputSpeech,
}

impl From<SpokenReply> for ResponseEnvelope {
    fn from(reply: SpokenReply) -> Self {
        Self {
            version: "1.0",
            response: ResponseBody {
                output_speech: OutputSpeech::plain(reply.speech),
                reprompt: reply
                    .reprompt
                    .map(|text| Reprompt { output_speech: OutputSpeech::plain(text) }),
                should_end_session: reply.end_session,
            },
        }
    }
}

#[cfg(test)]
#[path = "alexa_test.rs"]
mod tests;

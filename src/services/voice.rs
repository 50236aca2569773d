//! Voice intent gateway: turns assistant intents into list mutations and speech.
//!
//! Every path returns a [`SpokenReply`]; the voice channel never sees an error.

use tracing::{error, info, warn};

use crate::services::list::{ListError, ShoppingListStore};
use crate::services::notify::NotificationDispatcher;

pub const LAUNCH_SPEECH: &str = "¡Hola! Dime qué producto necesitas agregar a tu lista del super.";
pub const ADD_REPROMPT: &str = "¿Necesitas agregar otro producto?";
pub const MISSING_PRODUCT_SPEECH: &str = "No entendí qué producto quieres agregar. ¿Qué necesitas?";
pub const HELP_SPEECH: &str =
    "Puedes decirme cosas como: agregar leche, necesito pan, o comprar huevos. ¿Qué necesitas?";
pub const STOP_SPEECH: &str = "¡Hasta luego!";
pub const ERROR_SPEECH: &str = "Lo siento, hubo un problema. Por favor intenta de nuevo.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    /// The request matched no known intent or could not be decoded.
    #[error("unrecognized voice request: {0}")]
    Unrecognized(String),
    /// Something failed while handling a recognized intent.
    #[error("internal fault: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceIntent {
    Launch,
    AddProduct { product: Option<String> },
    Help,
    Stop,
    Unrecognized(VoiceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenReply {
    pub speech: String,
    pub reprompt: Option<String>,
    pub end_session: bool,
}

impl SpokenReply {
    fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self { speech: speech.into(), reprompt: Some(reprompt.into()), end_session: false }
    }

    fn tell(speech: impl Into<String>) -> Self {
        Self { speech: speech.into(), reprompt: None, end_session: true }
    }
}

#[derive(Clone)]
pub struct VoiceIntentGateway {
    store: ShoppingListStore,
    dispatcher: NotificationDispatcher,
}

impl VoiceIntentGateway {
    #[must_use]
    pub fn new(store: ShoppingListStore, dispatcher: NotificationDispatcher) -> Self {
        Self { store, dispatcher }
    }

    #[must_use]
    pub fn handle(&self, intent: VoiceIntent) -> SpokenReply {
        match intent {
            VoiceIntent::Launch => Self::handle_launch(),
            VoiceIntent::AddProduct { product } => self.handle_add_product(product.as_deref()),
            VoiceIntent::Help => Self::handle_help(),
            VoiceIntent::Stop => Self::handle_stop(),
            VoiceIntent::Unrecognized(err) => Self::handle_unrecognized(&err),
        }
    }

    #[must_use]
    pub fn handle_launch() -> SpokenReply {
        SpokenReply::ask(LAUNCH_SPEECH, LAUNCH_SPEECH)
    }

    /// Append the slot value and queue a chat notification. A missing or blank
    /// slot reprompts without touching the list.
    #[must_use]
    pub fn handle_add_product(&self, product: Option<&str>) -> SpokenReply {
        let (entry, snapshot) = match self.store.append_with_snapshot(product.unwrap_or_default()) {
            Ok(appended) => appended,
            Err(ListError::InvalidProduct) => {
                warn!("add product intent without a product");
                return SpokenReply::ask(MISSING_PRODUCT_SPEECH, MISSING_PRODUCT_SPEECH);
            }
        };

        info!(product = %entry.product, count = snapshot.len(), "product added by voice");
        self.dispatcher.notify_mutation(snapshot);

        SpokenReply::ask(
            format!("He agregado {} a tu lista del super. ¿Algo más?", entry.product),
            ADD_REPROMPT,
        )
    }

    #[must_use]
    pub fn handle_help() -> SpokenReply {
        SpokenReply::ask(HELP_SPEECH, HELP_SPEECH)
    }

    #[must_use]
    pub fn handle_stop() -> SpokenReply {
        SpokenReply::tell(STOP_SPEECH)
    }

    #[must_use]
    pub fn handle_unrecognized(err: &VoiceError) -> SpokenReply {
        match err {
            VoiceError::Unrecognized(_) => warn!(error = %err, "voice request not handled"),
            VoiceError::Internal(_) => error!(error = %err, "voice request failed"),
        }
        SpokenReply::ask(ERROR_SPEECH, ERROR_SPEECH)
    }
}

#[cfg(test)]
#[path = "voice_test.rs"]
mod tests;

//! Notification dispatcher: pushes the rendered list to the household chat.
//!
//! DESIGN
//! ======
//! Gateways hand over a snapshot and move on: `notify_mutation` only does a
//! non-blocking `try_send` onto a bounded queue. A single background worker
//! renders each snapshot and delivers it with the list-view buttons, bounded
//! by a send timeout.
//!
//! ERROR HANDLING
//! ==============
//! Delivery failures are logged and dropped. The voice reply or chat answer
//! that triggered the mutation has already been decided by then.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::config::NotifyConfig;
use crate::services::list::ShoppingListEntry;
use crate::services::render::{self, ListRenderer};
use crate::telegram::{ChatError, ChatTransport};

#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: Option<mpsc::Sender<Vec<ShoppingListEntry>>>,
    chat_id: Option<String>,
}

impl NotificationDispatcher {
    /// Dispatcher that accepts and discards everything (chat not configured).
    #[must_use]
    pub fn disabled() -> Self {
        Self { tx: None, chat_id: None }
    }

    /// Spawn the delivery worker and return a dispatcher feeding it.
    #[must_use]
    pub fn spawn(
        transport: Arc<dyn ChatTransport>,
        chat_id: String,
        renderer: ListRenderer,
        config: NotifyConfig,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<Vec<ShoppingListEntry>>(config.queue_capacity);
        let send_timeout = Duration::from_secs(config.send_timeout_secs);

        info!(
            queue_capacity = config.queue_capacity,
            send_timeout_secs = config.send_timeout_secs,
            "chat notification worker configured"
        );

        let destination = chat_id.clone();
        tokio::spawn(async move {
            while let Some(list) = rx.recv().await {
                let count = list.len();
                match deliver(transport.as_ref(), &chat_id, &renderer, &list, send_timeout).await {
                    Ok(()) => debug!(count, "list notification delivered"),
                    Err(e) => warn!(error = %e, count, "list notification failed; dropping"),
                }
            }
        });

        Self { tx: Some(tx), chat_id: Some(destination) }
    }

    /// Chat that receives notifications, if enabled.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    /// Queue a snapshot for delivery. Returns `false` when it was dropped.
    pub fn notify_mutation(&self, list: Vec<ShoppingListEntry>) -> bool {
        let Some(tx) = &self.tx else {
            debug!("chat notifications disabled; skipping");
            return false;
        };

        match tx.try_send(list) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("notification queue full; dropping list update");
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("notification queue closed; dropping list update");
                false
            }
        }
    }
}

async fn deliver(
    transport: &dyn ChatTransport,
    chat_id: &str,
    renderer: &ListRenderer,
    list: &[ShoppingListEntry],
    send_timeout: Duration,
) -> Result<(), ChatError> {
    let text = renderer.render(list);
    let buttons = render::list_buttons();
    tokio::time::timeout(send_timeout, transport.send_message(chat_id, &text, &buttons))
        .await
        .map_err(|_| ChatError::Timeout(send_timeout.as_secs()))??;
    Ok(())
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;

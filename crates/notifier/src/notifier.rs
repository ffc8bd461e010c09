use crate::ChatTransport;

/// Delivers text to a fixed chat.
pub struct Notifier<C> {
    transport: C,
    chat_id: String,
}

impl<C: ChatTransport> Notifier<C> {
    pub fn new(transport: C, chat_id: impl Into<String>) -> Self {
        Self {
            transport,
            chat_id: chat_id.into(),
        }
    }

    /// Make exactly one delivery attempt.
    ///
    /// Returns `true` when the transport accepted the message. Failures are
    /// logged here and reported only through the return value.
    pub async fn notify(&self, text: &str) -> bool {
        match self.transport.send_message(&self.chat_id, text).await {
            Ok(()) => {
                tracing::info!(
                    chat_id = %self.chat_id,
                    message = text,
                    "Message delivered to chat"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    chat_id = %self.chat_id,
                    message = text,
                    error = %e,
                    "Failed to deliver message to chat"
                );
                false
            }
        }
    }
}

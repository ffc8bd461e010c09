//! Chat delivery for status notifications.
//!
//! The [`Notifier`] sends one message per call through a [`ChatTransport`] and
//! reports the outcome as a plain boolean. It never retries; the poll loop
//! simply tries again on its next cycle.

pub mod notifier;
pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;

pub use notifier::Notifier;
pub use telegram::TelegramTransport;

/// Why a message did not reach the chat.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request to messaging API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("messaging API rejected the message: {description}")]
    Rejected { description: String },
}

/// A messaging backend able to post a text message into a chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), NotifyError>;
}

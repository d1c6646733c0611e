//! Notifier Port - interface for delivering the summary to the user.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::summary::SummaryBreakdown;

/// Port for sending the session wrap-up as an email.
///
/// Implementations own the presentation: how the breakdown becomes a
/// message body is a transport concern, not a flow concern.
#[async_trait]
pub trait SummaryNotifier: Send + Sync {
    /// Delivers the summary to `recipient`.
    async fn send_summary(
        &self,
        recipient: &str,
        subject: &str,
        summary: &SummaryBreakdown,
    ) -> Result<(), NotifyError>;
}

/// Notifier errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The recipient address is not a plausible email address.
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// The transport failed before a response was received.
    #[error("email transport error: {0}")]
    Transport(String),

    /// The delivery service rejected the request.
    #[error("email delivery rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the service.
        status: u16,
        /// Response detail.
        message: String,
    },
}

impl NotifyError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a rejected error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

//! The ordered transcript of a coaching session.
//!
//! # Invariants
//!
//! - Never empty: the transcript is rooted in exactly one system message.
//! - The system message is never removed or reordered.
//! - Messages are append-only; `append_exchange` is the only way to grow
//!   the transcript and always adds an assistant/user pair.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::{Message, Role};

/// Ordered sequence of messages, always starting with one system message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript rooted in the given system message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the system message is blank.
    pub fn new(system_message: impl Into<String>) -> Result<Self, ValidationError> {
        let system_message = system_message.into();
        if system_message.trim().is_empty() {
            return Err(ValidationError::empty_field("system_message"));
        }

        Ok(Self {
            messages: vec![Message::system(system_message)],
        })
    }

    /// Appends an assistant turn carrying `prior_reply` followed by a user
    /// turn carrying `next_prompt`.
    ///
    /// `prior_reply` may be empty on the very first exchange, before any
    /// model reply exists.
    pub fn append_exchange(&mut self, prior_reply: impl Into<String>, next_prompt: impl Into<String>) {
        self.messages.push(Message::assistant(prior_reply));
        self.messages.push(Message::user(next_prompt));
    }

    /// Truncates the transcript back to the single system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Returns the messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages, including the system message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: a transcript holds at least its system message.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the system message content.
    pub fn system_message(&self) -> &str {
        // Invariant: first message exists and is the system message.
        &self.messages[0].content
    }
}

//! Conversation model - role-tagged messages and the session transcript.

mod message;
mod transcript;

pub use message::{Message, Role};
pub use transcript::Transcript;

//! Ports - interfaces the application core depends on.
//!
//! Adapters implement these traits; the application and domain layers
//! never reference a concrete provider, store, or transport.

pub mod ai_provider;
pub mod content_store;
pub mod notifier;

pub use ai_provider::{AIError, AIProvider, CompletionRequest, CompletionStream, FinishReason, StreamChunk};
pub use content_store::{ContentError, ContentStore, PageCopy, TopicPrompts};
pub use notifier::{NotifyError, SummaryNotifier};

//! Application layer - use-case orchestration over the domain and ports.

pub mod completion;
pub mod flow;

pub use completion::{CompletionError, CompletionService, RetryPolicy};
pub use flow::{FlowError, SessionFlow};

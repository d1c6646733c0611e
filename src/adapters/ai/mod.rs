//! AI provider adapters.

pub mod mock_provider;
pub mod openai_provider;

pub use mock_provider::{MockAiProvider, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};

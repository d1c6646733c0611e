//! AI Provider Port - interface for chat-completion providers.
//!
//! This port abstracts the streaming completion call so the application
//! layer can obtain model replies without coupling to a specific vendor.
//! A provider performs exactly one attempt per call; retry policy lives
//! in the application layer.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::domain::conversation::{Message, Transcript};

/// Boxed stream of completion chunks.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, AIError>> + Send>>;

/// Port for chat-completion provider interactions.
///
/// Implementations connect to an external model API and translate between
/// the provider wire format and our domain messages.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Starts a streaming completion for the given request.
    ///
    /// Returns a stream of chunks as they arrive from the provider. The
    /// stream ends after the provider signals completion.
    async fn stream_complete(&self, request: CompletionRequest) -> Result<CompletionStream, AIError>;
}

/// Request for a streaming completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full conversation history, system message first.
    pub messages: Vec<Message>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Builds a request from a session transcript.
    pub fn from_transcript(transcript: &Transcript) -> Self {
        Self {
            messages: transcript.messages().to_vec(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

/// Streaming chunk from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    /// New content in this chunk.
    pub delta: String,
    /// If present, generation is complete.
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// Creates a content chunk.
    pub fn content(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            finish_reason: None,
        }
    }

    /// Creates a final chunk.
    pub fn finished(finish_reason: FinishReason) -> Self {
        Self {
            delta: String::new(),
            finish_reason: Some(finish_reason),
        }
    }

    /// Returns true if this is the final chunk.
    pub fn is_final(&self) -> bool {
        self.finish_reason.is_some()
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit max_tokens limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
}

/// AI provider errors. Every variant is treated as transient by the
/// application-layer retry loop.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Provider is unavailable or returned a server error.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request or mid-stream.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AIError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

//! Mock AI provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling a real model API.
//!
//! # Features
//!
//! - Queued responses, consumed in order
//! - Mid-stream error injection for retry testing
//! - Simulated delays
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAiProvider::new()
//!     .with_response(MockResponse::success("Hello, I'm the assistant!"));
//!
//! let stream = provider.stream_complete(request).await?;
//! ```

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionStream, FinishReason, StreamChunk};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Stream the content as word chunks, optionally failing mid-stream.
    Success {
        content: String,
        /// Emit this many word chunks, then yield a network error.
        fail_after: Option<usize>,
    },
    /// Fail before the stream opens.
    Error { message: String },
}

impl MockResponse {
    /// A successful streamed reply.
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success {
            content: content.into(),
            fail_after: None,
        }
    }

    /// A call that fails before any content arrives.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Injects a mid-stream failure after `chunks` word chunks.
    pub fn failing_after(mut self, chunks: usize) -> Self {
        if let Self::Success { fail_after, .. } = &mut self {
            *fail_after = Some(chunks);
        }
        self
    }
}

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAiProvider {
    /// Queued responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Number of calls made.
    call_count: Arc<AtomicUsize>,
    /// Recorded requests for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiProvider {
    /// Creates a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a response.
    pub fn with_response(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Returns a handle to the call counter that survives moving the
    /// provider into a service.
    pub fn call_count_handle(&self) -> Arc<AtomicUsize> {
        self.call_count.clone()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::success("Mock response"))
    }
}

#[async_trait]
impl AIProvider for MockAiProvider {
    async fn stream_complete(&self, request: CompletionRequest) -> Result<CompletionStream, AIError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success { content, fail_after } => {
                // Split content into word chunks for streaming simulation.
                let mut chunks: Vec<Result<StreamChunk, AIError>> = content
                    .split_whitespace()
                    .map(|word| Ok(StreamChunk::content(format!("{} ", word))))
                    .collect();

                match fail_after {
                    Some(emit) => {
                        chunks.truncate(emit);
                        chunks.push(Err(AIError::network("stream interrupted")));
                    }
                    None => {
                        chunks.push(Ok(StreamChunk::finished(FinishReason::Stop)));
                    }
                }

                Ok(Box::pin(stream::iter(chunks)))
            }
            MockResponse::Error { message } => Err(AIError::unavailable(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Transcript;

    fn test_request() -> CompletionRequest {
        let mut transcript = Transcript::new("Be a coach.").unwrap();
        transcript.append_exchange("", "Hello");
        CompletionRequest::from_transcript(&transcript)
    }

    async fn collect(provider: &MockAiProvider) -> Vec<Result<StreamChunk, AIError>> {
        provider
            .stream_complete(test_request())
            .await
            .unwrap()
            .collect()
            .await
    }

    #[tokio::test]
    async fn streams_content_as_word_chunks() {
        let provider = MockAiProvider::new().with_response(MockResponse::success("one two three"));

        let chunks = collect(&provider).await;

        // Three word chunks plus the final chunk.
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].as_ref().unwrap().delta, "one ");
        assert!(chunks[3].as_ref().unwrap().is_final());
    }

    #[tokio::test]
    async fn consumes_responses_in_order() {
        let provider = MockAiProvider::new()
            .with_response(MockResponse::success("first"))
            .with_response(MockResponse::error("down"));

        let first = collect(&provider).await;
        assert_eq!(first[0].as_ref().unwrap().delta, "first ");

        let second = provider.stream_complete(test_request()).await;
        assert!(matches!(second, Err(AIError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn mid_stream_failure_truncates_content() {
        let provider = MockAiProvider::new()
            .with_response(MockResponse::success("one two three").failing_after(1));

        let chunks = collect(&provider).await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().delta, "one ");
        assert!(matches!(chunks[1], Err(AIError::Network(_))));
    }

    #[tokio::test]
    async fn records_calls_for_verification() {
        let provider = MockAiProvider::new();
        let _ = collect(&provider).await;
        let _ = collect(&provider).await;

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.get_calls().len(), 2);
        assert_eq!(provider.get_calls()[0].messages.len(), 3);
    }
}

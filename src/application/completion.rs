//! Completion service - streaming model calls with bounded retry.
//!
//! Providers perform a single attempt; this service wraps them in the
//! retry loop. Any provider failure, whether before the stream opens or
//! mid-stream, counts as a failed attempt. Partial content from a failed
//! attempt is discarded and the next attempt starts clean.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use crate::domain::conversation::Transcript;
use crate::ports::{AIError, AIProvider, CompletionRequest};

/// Bounded-retry policy for completion attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

/// Completion errors surfaced to callers.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Every attempt failed; carries the last provider error.
    #[error("provider exhausted after {attempts} attempts: {last_error}")]
    ProviderExhausted {
        /// Attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        last_error: AIError,
    },
}

/// Obtains model replies for a transcript, retrying on any failure.
pub struct CompletionService {
    provider: Arc<dyn AIProvider>,
    policy: RetryPolicy,
}

impl CompletionService {
    pub fn new(provider: Arc<dyn AIProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Streams a completion for the transcript, retrying failed attempts
    /// up to the policy bound.
    ///
    /// `on_progress` receives the accumulated reply so far, trimmed, once
    /// per received fragment. After a mid-stream failure it starts over
    /// from the beginning of the next attempt's content.
    ///
    /// Returns the finalized reply, trimmed of surrounding whitespace.
    pub async fn complete<F>(
        &self,
        transcript: &Transcript,
        mut on_progress: F,
    ) -> Result<String, CompletionError>
    where
        F: FnMut(&str) + Send,
    {
        let mut last_error: Option<AIError> = None;

        for attempt in 1..=self.policy.max_attempts {
            match self.attempt(transcript, &mut on_progress).await {
                Ok(reply) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "completion succeeded after retry");
                    }
                    return Ok(reply);
                }
                Err(error) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %error,
                        "completion attempt failed"
                    );
                    last_error = Some(error);
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        let last_error = last_error
            .unwrap_or_else(|| AIError::InvalidRequest("retry policy allows zero attempts".into()));
        Err(CompletionError::ProviderExhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }

    async fn attempt<F>(&self, transcript: &Transcript, on_progress: &mut F) -> Result<String, AIError>
    where
        F: FnMut(&str) + Send,
    {
        let request = CompletionRequest::from_transcript(transcript);
        let mut stream = self.provider.stream_complete(request).await?;

        let mut accumulated = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.delta.is_empty() {
                accumulated.push_str(&chunk.delta);
                on_progress(accumulated.trim());
            }
        }

        Ok(accumulated.trim().to_string())
    }
}

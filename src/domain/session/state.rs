//! Per-session mutable state and its transitions.
//!
//! A `SessionState` owns the transcript and counters for one user session.
//! It is exclusively owned by the session's control loop; nothing here is
//! shared across sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::conversation::Transcript;
use crate::domain::foundation::{StateMachine, ValidationError};

use super::Page;

/// Minimum accepted reply length, in characters.
pub const MIN_REPLY_CHARS: usize = 3;

/// Placeholder substituted with the user's comma-joined strengths when
/// building a topic's guidance prompt.
const STRENGTHS_PLACEHOLDER: &str = "{strengths}";

/// Errors raised by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The typed reply is too short to accept. No state change.
    #[error("reply too short: {length} characters, need at least {MIN_REPLY_CHARS}")]
    ReplyTooShort { length: usize },

    /// The event is not valid on the current page.
    #[error("cannot {action} on the {page:?} page")]
    WrongPage { action: &'static str, page: Page },

    /// A model reply must be obtained before this event is accepted.
    #[error("a model reply is pending; it must be obtained first")]
    CompletionPending,

    /// Question rounds remain; the summary cannot start yet.
    #[error("question rounds still remaining")]
    QuestionsRemaining,

    /// All question rounds are answered; only the summary may follow.
    #[error("all question rounds are answered")]
    QuestionsExhausted,

    /// Invalid page transition or value.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Builds a guidance prompt from a topic template and the selected
/// strengths, joined with `", "`.
pub fn build_guidance_prompt(template: &str, strengths: &[String]) -> String {
    template.replace(STRENGTHS_PLACEHOLDER, &strengths.join(", "))
}

/// Mutable state for a single questionnaire session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    page: Page,
    transcript: Transcript,
    /// Finalized reply for the current turn; empty while a completion is
    /// pending.
    model_reply: String,
    /// The user's typed reply. Preserved when a submission is rejected.
    user_reply: String,
    current_topic: Option<String>,
    selected_strengths: Vec<String>,
    /// 1-based count of the current question round.
    question_count: u32,
    max_questions: u32,
    created_at: DateTime<Utc>,
}

impl SessionState {
    /// Creates a fresh session on the Intro page.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the system message is blank.
    pub fn new(system_message: impl Into<String>, max_questions: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            page: Page::Intro,
            transcript: Transcript::new(system_message)?,
            model_reply: String::new(),
            user_reply: String::new(),
            current_topic: None,
            selected_strengths: Vec::new(),
            question_count: 1,
            max_questions,
            created_at: Utc::now(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model_reply(&self) -> &str {
        &self.model_reply
    }

    pub fn user_reply(&self) -> &str {
        &self.user_reply
    }

    pub fn current_topic(&self) -> Option<&str> {
        self.current_topic.as_deref()
    }

    pub fn selected_strengths(&self) -> &[String] {
        &self.selected_strengths
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn max_questions(&self) -> u32 {
        self.max_questions
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True while more question rounds are to be answered.
    pub fn questions_remaining(&self) -> bool {
        self.question_count <= self.max_questions
    }

    /// True when the current page needs a model reply before any further
    /// transition is allowed.
    pub fn needs_completion(&self) -> bool {
        matches!(self.page, Page::Questions | Page::Summary) && self.model_reply.is_empty()
    }

    /// Records the finalized model reply for the current turn, trimmed of
    /// surrounding whitespace.
    pub fn store_model_reply(&mut self, reply: &str) {
        self.model_reply = reply.trim().to_string();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────

    /// Intro → Questions: the user confirmed topic and strength selection.
    ///
    /// Appends the guidance prompt as the opening exchange. The assistant
    /// side is empty since no model turn has occurred yet.
    pub fn confirm_topic(
        &mut self,
        topic: impl Into<String>,
        strengths: Vec<String>,
        guidance_prompt: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.page != Page::Intro {
            return Err(SessionError::WrongPage {
                action: "confirm a topic",
                page: self.page,
            });
        }

        self.page = self.page.transition_to(Page::Questions)?;
        self.current_topic = Some(topic.into());
        self.selected_strengths = strengths;
        self.transcript.append_exchange("", guidance_prompt);
        self.model_reply.clear();
        self.user_reply.clear();
        Ok(())
    }

    /// Questions → Questions: accepts the user's reply for this round.
    ///
    /// Replies of fewer than [`MIN_REPLY_CHARS`] characters are rejected
    /// with no state change; the typed reply is preserved for re-editing.
    pub fn submit_reply(&mut self, reply: &str) -> Result<(), SessionError> {
        if self.page != Page::Questions {
            return Err(SessionError::WrongPage {
                action: "submit a reply",
                page: self.page,
            });
        }
        if self.model_reply.is_empty() {
            return Err(SessionError::CompletionPending);
        }
        if !self.questions_remaining() {
            return Err(SessionError::QuestionsExhausted);
        }

        let length = reply.chars().count();
        if length < MIN_REPLY_CHARS {
            self.user_reply = reply.to_string();
            return Err(SessionError::ReplyTooShort { length });
        }

        self.page = self.page.transition_to(Page::Questions)?;
        let prior_reply = std::mem::take(&mut self.model_reply);
        self.transcript.append_exchange(prior_reply, reply);
        self.question_count += 1;
        self.user_reply.clear();
        Ok(())
    }

    /// Questions → Summary: all rounds answered, request the wrap-up.
    pub fn begin_summary(&mut self, summary_prompt: impl Into<String>) -> Result<(), SessionError> {
        if self.page != Page::Questions {
            return Err(SessionError::WrongPage {
                action: "begin the summary",
                page: self.page,
            });
        }
        if self.model_reply.is_empty() {
            return Err(SessionError::CompletionPending);
        }
        if self.questions_remaining() {
            return Err(SessionError::QuestionsRemaining);
        }

        self.page = self.page.transition_to(Page::Summary)?;
        let prior_reply = std::mem::take(&mut self.model_reply);
        self.transcript.append_exchange(prior_reply, summary_prompt);
        Ok(())
    }

    /// Summary → Intro: discuss another topic.
    ///
    /// Resets the transcript to its system message and the question count
    /// to 1. Selected strengths survive the restart; the Intro page lets
    /// the user adjust them.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.page != Page::Summary {
            return Err(SessionError::WrongPage {
                action: "restart",
                page: self.page,
            });
        }

        self.page = self.page.transition_to(Page::Intro)?;
        self.transcript.reset();
        self.question_count = 1;
        self.model_reply.clear();
        self.user_reply.clear();
        Ok(())
    }
}

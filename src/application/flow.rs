//! Session flow - orchestrates pages, prompts, completions, and email.
//!
//! The flow owns no session storage; callers hold the `SessionState` and
//! pass it in mutably. This keeps the flow free of locking concerns and
//! lets the HTTP layer decide how sessions are kept.

use std::sync::Arc;
use thiserror::Error;

use crate::application::completion::{CompletionError, CompletionService};
use crate::domain::foundation::ValidationError;
use crate::domain::session::{build_guidance_prompt, Page, SessionError, SessionState};
use crate::domain::summary::SummaryBreakdown;
use crate::ports::{ContentError, ContentStore, NotifyError, PageCopy, SummaryNotifier};

/// Errors surfaced by flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An operation needed the session's topic before one was confirmed.
    #[error("no topic has been selected")]
    NoTopic,
}

/// Orchestrates one questionnaire session over the ports.
pub struct SessionFlow {
    content: Arc<dyn ContentStore>,
    completion: CompletionService,
    notifier: Arc<dyn SummaryNotifier>,
    max_questions: u32,
}

impl SessionFlow {
    pub fn new(
        content: Arc<dyn ContentStore>,
        completion: CompletionService,
        notifier: Arc<dyn SummaryNotifier>,
        max_questions: u32,
    ) -> Self {
        Self {
            content,
            completion,
            notifier,
            max_questions,
        }
    }

    /// The content store, for view copy lookups.
    pub fn content(&self) -> &dyn ContentStore {
        self.content.as_ref()
    }

    /// Display copy for a page.
    pub fn page_copy(&self, page: Page) -> Result<PageCopy, FlowError> {
        Ok(self.content.page_copy(page)?)
    }

    /// Creates a fresh session rooted in the configured system prompt.
    pub fn new_session(&self) -> Result<SessionState, FlowError> {
        let system_prompt = self.content.system_prompt()?;
        Ok(SessionState::new(system_prompt, self.max_questions)?)
    }

    /// Confirms the topic and strength selection, seeding the transcript
    /// with the topic's guidance prompt.
    pub fn select_topic(
        &self,
        state: &mut SessionState,
        topic: &str,
        strengths: Vec<String>,
    ) -> Result<(), FlowError> {
        let prompts = self.content.topic_prompts(topic)?;
        let guidance = build_guidance_prompt(&prompts.guidance_prompt, &strengths);
        state.confirm_topic(topic, strengths, guidance)?;
        Ok(())
    }

    /// Obtains the model reply for the current turn if one is pending.
    ///
    /// Returns the turn's reply either way, so callers can re-render
    /// without re-invoking the provider.
    pub async fn ensure_reply<F>(
        &self,
        state: &mut SessionState,
        on_progress: F,
    ) -> Result<String, FlowError>
    where
        F: FnMut(&str) + Send,
    {
        if state.needs_completion() {
            let reply = self.completion.complete(state.transcript(), on_progress).await?;
            state.store_model_reply(&reply);
        }
        Ok(state.model_reply().to_string())
    }

    /// Advances past the current question round.
    ///
    /// While rounds remain the reply is validated and recorded; after the
    /// final round the summary prompt is appended instead and the reply
    /// text is ignored.
    pub fn advance(&self, state: &mut SessionState, reply: &str) -> Result<(), FlowError> {
        if state.questions_remaining() {
            state.submit_reply(reply)?;
        } else {
            let topic = state.current_topic().ok_or(FlowError::NoTopic)?;
            let prompts = self.content.topic_prompts(topic)?;
            state.begin_summary(prompts.summary_prompt)?;
        }
        Ok(())
    }

    /// Emails the summary breakdown to `recipient`.
    ///
    /// `edited_actions` replaces actions positionally where the user
    /// reworded them; extra entries are ignored.
    pub async fn send_summary_email(
        &self,
        state: &SessionState,
        recipient: &str,
        edited_actions: Option<&[String]>,
    ) -> Result<(), FlowError> {
        if state.page() != Page::Summary {
            return Err(SessionError::WrongPage {
                action: "email the summary",
                page: state.page(),
            }
            .into());
        }
        if state.model_reply().is_empty() {
            return Err(SessionError::CompletionPending.into());
        }

        let mut breakdown = SummaryBreakdown::parse(state.model_reply());
        if let Some(actions) = edited_actions {
            for (index, action) in actions.iter().enumerate() {
                breakdown.set_action(index, action);
            }
        }

        let subject = self.content.text("email_subject")?;
        self.notifier
            .send_summary(recipient, &subject, &breakdown)
            .await?;

        tracing::info!(recipient, "summary email sent");
        Ok(())
    }

    /// Returns the session to the Intro page for another topic.
    pub fn restart(&self, state: &mut SessionState) -> Result<(), FlowError> {
        state.restart()?;
        Ok(())
    }
}

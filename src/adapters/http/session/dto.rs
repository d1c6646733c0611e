//! Request and response types for session endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::session::Page;
use crate::ports::PageCopy;

/// Request to confirm the topic and strength selection.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectTopicRequest {
    pub topic: String,
    #[serde(default)]
    pub strengths: Vec<String>,
}

/// Request to advance past the current question round.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvanceRequest {
    /// The user's reply. Ignored once all rounds are answered.
    #[serde(default)]
    pub reply: String,
}

/// Request to email the summary.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRequest {
    pub email_address: String,
    /// Actions as edited by the user, positionally replacing the parsed
    /// ones.
    #[serde(default)]
    pub actions: Option<Vec<String>>,
}

/// Simple acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Full view of a session, enough to render the current page.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub page: Page,
    pub page_copy: PageCopyView,
    pub question_count: u32,
    pub max_questions: u32,
    pub questions_remaining: bool,
    pub needs_completion: bool,
    pub model_reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_topic: Option<String>,
    pub selected_strengths: Vec<String>,
    /// Topics available for selection.
    pub topics: Vec<String>,
    /// Strengths available for selection.
    pub strengths: Vec<String>,
    /// Present on the Summary page once the wrap-up reply exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryView>,
}

/// Display copy for the current page.
#[derive(Debug, Clone, Serialize)]
pub struct PageCopyView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

impl From<PageCopy> for PageCopyView {
    fn from(copy: PageCopy) -> Self {
        Self {
            title: copy.title,
            subheader: copy.subheader,
            markdown: copy.markdown,
        }
    }
}

/// The parsed summary, with actions in editable form.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub narrative: String,
    pub actions: Vec<String>,
}

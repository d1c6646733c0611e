//! Content Store Port - interface for questionnaire copy and prompts.
//!
//! All user-facing text, the model prompts, and the selection lists live
//! behind this port so the flow logic never embeds copy. The store is
//! organized as named tables of keyed rows, mirroring the authored
//! content file.

use thiserror::Error;

use crate::domain::session::Page;

/// Port for reading authored questionnaire content.
///
/// Implementations load content at startup and serve it from memory;
/// every method is infallible lookup apart from missing-key errors.
pub trait ContentStore: Send + Sync {
    /// The system message that roots every transcript.
    fn system_prompt(&self) -> Result<String, ContentError>;

    /// Display copy for a page, keyed by [`Page::content_key`].
    fn page_copy(&self, page: Page) -> Result<PageCopy, ContentError>;

    /// Topics available for selection, in authored order.
    fn topics(&self) -> Vec<String>;

    /// The guidance and summary prompt templates for a topic.
    fn topic_prompts(&self, topic: &str) -> Result<TopicPrompts, ContentError>;

    /// The selectable strengths, in authored order.
    fn strengths(&self) -> Vec<String>;

    /// A keyed piece of interface text (labels, errors, email subject).
    fn text(&self, key: &str) -> Result<String, ContentError>;
}

/// Display copy for one page. Absent fields are simply not rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCopy {
    /// Page title.
    pub title: Option<String>,
    /// Subheader shown under the title.
    pub subheader: Option<String>,
    /// Markdown body.
    pub markdown: Option<String>,
}

/// Prompt templates for one topic.
///
/// The guidance template contains a `{strengths}` placeholder filled in
/// at topic confirmation; the summary prompt is sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPrompts {
    /// Template for the opening guidance prompt.
    pub guidance_prompt: String,
    /// Prompt requesting the delimited wrap-up.
    pub summary_prompt: String,
}

/// Content store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// A whole content table is absent.
    #[error("missing content table: {table}")]
    MissingTable {
        /// Table name.
        table: String,
    },

    /// A key is absent from an existing table.
    #[error("missing content key: {table}.{key}")]
    MissingKey {
        /// Table name.
        table: String,
        /// Row key.
        key: String,
    },

    /// Failed to read the content source.
    #[error("content io error: {0}")]
    Io(String),

    /// Failed to parse the content source.
    #[error("content parse error: {0}")]
    Parse(String),
}

impl ContentError {
    /// Creates a missing table error.
    pub fn missing_table(table: impl Into<String>) -> Self {
        Self::MissingTable {
            table: table.into(),
        }
    }

    /// Creates a missing key error.
    pub fn missing_key(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKey {
            table: table.into(),
            key: key.into(),
        }
    }
}

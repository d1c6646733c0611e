//! Email template - renders the summary breakdown into the HTML shell.
//!
//! The shell is an authored HTML file with `{summary}` and `{actions}`
//! placeholders. Both are filled with HTML converted from the markdown
//! the model produced (plus the bullet list built from the actions).

use pulldown_cmark::{html, Options, Parser};
use std::path::Path;

use crate::domain::summary::SummaryBreakdown;
use crate::ports::NotifyError;

const SUMMARY_PLACEHOLDER: &str = "{summary}";
const ACTIONS_PLACEHOLDER: &str = "{actions}";

/// Converts markdown text to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// The authored HTML shell for summary emails.
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    shell: String,
}

impl EmailTemplate {
    /// Wraps an already-loaded HTML shell.
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Loads the shell from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, NotifyError> {
        let shell = std::fs::read_to_string(path)
            .map_err(|e| NotifyError::transport(format!("Failed to read email template: {}", e)))?;
        Ok(Self::new(shell))
    }

    /// Renders the breakdown into the shell.
    pub fn render(&self, summary: &SummaryBreakdown) -> String {
        self.shell
            .replace(SUMMARY_PLACEHOLDER, &markdown_to_html(summary.narrative()))
            .replace(ACTIONS_PLACEHOLDER, &markdown_to_html(&summary.action_bullets()))
    }
}

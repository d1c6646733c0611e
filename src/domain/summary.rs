//! Parsing of the model's summary reply into narrative and actions.
//!
//! The summary prompt instructs the model to separate each suggested
//! action with [`SUGGESTION_DELIMITER`]. Everything before the first
//! delimiter is the narrative wrap-up; each following segment is one
//! actionable suggestion.

use serde::{Deserialize, Serialize};

/// Marker the summary prompt asks the model to place before each action.
pub const SUGGESTION_DELIMITER: &str = "::Suggestion::";

/// A summary reply split into its narrative and editable action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBreakdown {
    narrative: String,
    actions: Vec<String>,
}

impl SummaryBreakdown {
    /// Splits a raw summary reply on [`SUGGESTION_DELIMITER`].
    ///
    /// Segments are trimmed. Every delimiter occurrence yields one action,
    /// so a blank segment stays as an empty, editable action. A reply
    /// without any delimiter yields a narrative and no actions.
    pub fn parse(reply: &str) -> Self {
        let mut segments = reply.split(SUGGESTION_DELIMITER);

        let narrative = segments
            .next()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let actions = segments.map(str::trim).map(str::to_string).collect();

        Self { narrative, actions }
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Replaces one action with user-edited text. Out-of-range indices
    /// are ignored.
    pub fn set_action(&mut self, index: usize, text: impl Into<String>) {
        if let Some(action) = self.actions.get_mut(index) {
            *action = text.into();
        }
    }

    /// Renders the actions as a markdown bullet list, one bullet per line.
    pub fn action_bullets(&self) -> String {
        self.actions
            .iter()
            .map(|action| format!("* {action}\n"))
            .collect()
    }
}

//! The page a session is currently showing.
//!
//! The questionnaire is a linear, page-based flow. Unlike most lifecycle
//! enums there is no terminal page: `Summary` loops back to `Intro` when
//! the user picks another topic.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Logical page of the questionnaire flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Topic and strength selection.
    Intro,
    /// The questioning self-loop.
    Questions,
    /// Wrap-up with actionable suggestions.
    Summary,
}

impl Page {
    /// Returns the row key used by the content store's `pages` table.
    pub fn content_key(&self) -> &'static str {
        match self {
            Page::Intro => "Intro",
            Page::Questions => "Questions",
            Page::Summary => "Summary",
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Intro
    }
}

impl StateMachine for Page {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Page::*;
        matches!(
            (self, target),
            (Intro, Questions) | (Questions, Questions) | (Questions, Summary) | (Summary, Intro)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Page::*;
        match self {
            Intro => vec![Questions],
            Questions => vec![Questions, Summary],
            Summary => vec![Intro],
        }
    }
}

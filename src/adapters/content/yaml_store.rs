//! YAML Content Store - file-backed implementation of ContentStore.
//!
//! Content is authored as a single YAML file, loaded once at startup and
//! served from memory. Missing required rows fail fast at load time so a
//! misauthored file never reaches a live session.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::session::Page;
use crate::ports::{ContentError, ContentStore, PageCopy, TopicPrompts};

/// Text rows every deployment must provide.
const REQUIRED_TEXT_KEYS: &[&str] = &[
    "page_title",
    "strength_selection_text",
    "topic_selection_text",
    "user_reply_placeholder",
    "error_too_short",
    "email_subject",
    "email_sent",
    "email_error",
    "button_discuss_another_topic",
];

/// In-memory content store deserialized from a YAML file.
pub struct YamlContentStore {
    file: ContentFile,
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    system_prompt: String,
    pages: HashMap<String, PageEntry>,
    /// Topics in authored order.
    topics: Vec<TopicEntry>,
    /// Strengths in authored order.
    strengths: Vec<String>,
    text: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subheader: Option<String>,
    #[serde(default)]
    markdown: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopicEntry {
    name: String,
    guidance_prompt: String,
    summary_prompt: String,
}

impl YamlContentStore {
    /// Loads and validates content from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;
        Self::from_yaml(&raw)
    }

    /// Parses and validates content from a YAML string.
    pub fn from_yaml(raw: &str) -> Result<Self, ContentError> {
        let file: ContentFile =
            serde_yaml::from_str(raw).map_err(|e| ContentError::Parse(e.to_string()))?;
        let store = Self { file };
        store.validate_required()?;
        Ok(store)
    }

    /// Checks that every row a session can reach is present.
    fn validate_required(&self) -> Result<(), ContentError> {
        if self.file.system_prompt.trim().is_empty() {
            return Err(ContentError::missing_key("prompts", "system_prompt"));
        }

        for page in [Page::Intro, Page::Questions, Page::Summary] {
            if !self.file.pages.contains_key(page.content_key()) {
                return Err(ContentError::missing_key("pages", page.content_key()));
            }
        }

        if self.file.topics.is_empty() {
            return Err(ContentError::missing_table("topics"));
        }
        if self.file.strengths.is_empty() {
            return Err(ContentError::missing_table("strengths"));
        }

        for key in REQUIRED_TEXT_KEYS {
            if !self.file.text.contains_key(*key) {
                return Err(ContentError::missing_key("text", *key));
            }
        }

        Ok(())
    }
}

impl ContentStore for YamlContentStore {
    fn system_prompt(&self) -> Result<String, ContentError> {
        Ok(self.file.system_prompt.clone())
    }

    fn page_copy(&self, page: Page) -> Result<PageCopy, ContentError> {
        let entry = self
            .file
            .pages
            .get(page.content_key())
            .ok_or_else(|| ContentError::missing_key("pages", page.content_key()))?;

        Ok(PageCopy {
            title: entry.title.clone(),
            subheader: entry.subheader.clone(),
            markdown: entry.markdown.clone(),
        })
    }

    fn topics(&self) -> Vec<String> {
        self.file.topics.iter().map(|t| t.name.clone()).collect()
    }

    fn topic_prompts(&self, topic: &str) -> Result<TopicPrompts, ContentError> {
        let entry = self
            .file
            .topics
            .iter()
            .find(|t| t.name == topic)
            .ok_or_else(|| ContentError::missing_key("topic_prompts", topic))?;

        Ok(TopicPrompts {
            guidance_prompt: entry.guidance_prompt.clone(),
            summary_prompt: entry.summary_prompt.clone(),
        })
    }

    fn strengths(&self) -> Vec<String> {
        self.file.strengths.clone()
    }

    fn text(&self, key: &str) -> Result<String, ContentError> {
        self.file
            .text
            .get(key)
            .cloned()
            .ok_or_else(|| ContentError::missing_key("text", key))
    }
}

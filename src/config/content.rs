//! Content configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Content configuration (authored files and questionnaire shape)
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Path to the YAML content file
    #[serde(default = "default_content_path")]
    pub content_path: String,

    /// Path to the HTML email template
    #[serde(default = "default_email_template_path")]
    pub email_template_path: String,

    /// Question rounds per session
    #[serde(default = "default_max_questions")]
    pub max_questions: u32,
}

impl ContentConfig {
    /// Validate content configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content_path.is_empty() || self.email_template_path.is_empty() {
            return Err(ValidationError::MissingContentPath);
        }
        if self.max_questions == 0 {
            return Err(ValidationError::InvalidQuestionCount);
        }
        Ok(())
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_path: default_content_path(),
            email_template_path: default_email_template_path(),
            max_questions: default_max_questions(),
        }
    }
}

fn default_content_path() -> String {
    "content/content.yaml".to_string()
}

fn default_email_template_path() -> String {
    "content/email_template.html".to_string()
}

fn default_max_questions() -> u32 {
    3
}

//! Adapters - implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completion providers (OpenAI, mock)
//! - `content` - Authored questionnaire content (YAML file)
//! - `email` - Summary delivery via Resend
//! - `http` - The axum API surface

pub mod ai;
pub mod content;
pub mod email;
pub mod http;

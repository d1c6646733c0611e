//! Strengths Coach - Guided Self-Reflection Questionnaire
//!
//! This crate walks a user through a short, topic-specific questioning
//! round with a conversational AI coach and produces an emailable summary
//! with actionable suggestions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

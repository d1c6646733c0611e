//! Email adapters.

pub mod resend_notifier;
pub mod template;

pub use resend_notifier::{ResendConfig, ResendNotifier};
pub use template::{markdown_to_html, EmailTemplate};

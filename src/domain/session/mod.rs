//! Session state - the page state machine and per-session counters.

mod page;
mod state;

pub use page::Page;
pub use state::{build_guidance_prompt, SessionError, SessionState, MIN_REPLY_CHARS};

//! Domain layer - pure conversation and session logic.

pub mod conversation;
pub mod foundation;
pub mod session;
pub mod summary;

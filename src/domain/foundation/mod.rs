//! Shared domain building blocks.

mod errors;
mod state_machine;

pub use errors::ValidationError;
pub use state_machine::StateMachine;

//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    advance, create_session, get_session, restart, select_topic, send_email, stream_reply,
    AppState,
};

/// Creates the session router with all endpoints.
pub fn session_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session))
        .route("/:id/topic", post(select_topic))
        .route("/:id/next", post(advance))
        .route("/:id/reply", get(stream_reply))
        .route("/:id/email", post(send_email))
        .route("/:id/restart", post(restart))
        .with_state(state)
}

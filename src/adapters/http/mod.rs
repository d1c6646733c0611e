//! HTTP adapter - the axum API surface.

pub mod registry;
pub mod session;

pub use registry::{SessionId, SessionRegistry, SharedSession};
pub use session::handlers::AppState;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the full API router with tracing and CORS layers applied.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/sessions", session::routes::session_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

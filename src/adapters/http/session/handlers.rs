//! HTTP handlers for session endpoints.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::channel::mpsc;

use crate::application::{FlowError, SessionFlow};
use crate::domain::session::{Page, SessionError, SessionState};
use crate::domain::summary::SummaryBreakdown;
use crate::ports::{ContentError, NotifyError};

use super::super::registry::{SessionId, SessionRegistry, SharedSession};
use super::dto::{
    AdvanceRequest, EmailRequest, ErrorResponse, MessageResponse, SelectTopicRequest, SessionView,
    SummaryView,
};

/// Shared state for all session handlers.
#[derive(Clone)]
pub struct AppState {
    flow: Arc<SessionFlow>,
    sessions: SessionRegistry,
}

impl AppState {
    pub fn new(flow: Arc<SessionFlow>, sessions: SessionRegistry) -> Self {
        Self { flow, sessions }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - start a new session on the Intro page.
pub async fn create_session(State(state): State<AppState>) -> Response {
    let session = match state.flow.new_session() {
        Ok(session) => session,
        Err(error) => return flow_error_response(&state.flow, error),
    };

    let id = state.sessions.insert(session.clone()).await;
    tracing::info!(session_id = %id, "session created");

    match session_view(&state.flow, id, &session) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => flow_error_response(&state.flow, error),
    }
}

/// GET /api/sessions/:id - current view of a session.
pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (id, session) = match lookup(&state, &id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    let guard = session.lock().await;
    match session_view(&state.flow, id, &guard) {
        Ok(view) => Json(view).into_response(),
        Err(error) => flow_error_response(&state.flow, error),
    }
}

/// POST /api/sessions/:id/topic - confirm topic and strengths.
pub async fn select_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectTopicRequest>,
) -> Response {
    let (id, session) = match lookup(&state, &id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    let mut guard = session.lock().await;
    if let Err(error) = state.flow.select_topic(&mut guard, &req.topic, req.strengths) {
        return flow_error_response(&state.flow, error);
    }

    match session_view(&state.flow, id, &guard) {
        Ok(view) => Json(view).into_response(),
        Err(error) => flow_error_response(&state.flow, error),
    }
}

/// POST /api/sessions/:id/next - submit a reply or move to the summary.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AdvanceRequest>,
) -> Response {
    let (id, session) = match lookup(&state, &id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    let mut guard = session.lock().await;
    if let Err(error) = state.flow.advance(&mut guard, &req.reply) {
        return flow_error_response(&state.flow, error);
    }

    match session_view(&state.flow, id, &guard) {
        Ok(view) => Json(view).into_response(),
        Err(error) => flow_error_response(&state.flow, error),
    }
}

/// GET /api/sessions/:id/reply - stream the pending model reply via SSE.
///
/// Emits `partial` events carrying the accumulated reply so far, then a
/// single `complete` event with the final text, or an `error` event if
/// every attempt failed.
pub async fn stream_reply(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (_, session) = match lookup(&state, &id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    let flow = state.flow.clone();
    let (tx, rx) = mpsc::unbounded::<Result<Event, Infallible>>();

    tokio::spawn(stream_reply_task(flow, session, tx));

    Sse::new(rx).keep_alive(KeepAlive::default()).into_response()
}

async fn stream_reply_task(
    flow: Arc<SessionFlow>,
    session: SharedSession,
    tx: mpsc::UnboundedSender<Result<Event, Infallible>>,
) {
    let mut guard = session.lock().await;

    let result = flow
        .ensure_reply(&mut guard, |partial| {
            let _ = tx.unbounded_send(Ok(Event::default().event("partial").data(partial)));
        })
        .await;

    match result {
        Ok(reply) => {
            let _ = tx.unbounded_send(Ok(Event::default().event("complete").data(reply)));
        }
        Err(error) => {
            tracing::error!(error = %error, "failed to obtain model reply");
            let _ = tx.unbounded_send(Ok(Event::default().event("error").data(error.to_string())));
        }
    }
}

/// POST /api/sessions/:id/email - send the summary to the given address.
pub async fn send_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EmailRequest>,
) -> Response {
    let (_, session) = match lookup(&state, &id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    let guard = session.lock().await;
    let result = state
        .flow
        .send_summary_email(&guard, &req.email_address, req.actions.as_deref())
        .await;

    match result {
        Ok(()) => {
            let message = state
                .flow
                .content()
                .text("email_sent")
                .unwrap_or_else(|_| "Email sent!".to_string());
            Json(MessageResponse { message }).into_response()
        }
        Err(error) => flow_error_response(&state.flow, error),
    }
}

/// POST /api/sessions/:id/restart - back to the Intro page.
pub async fn restart(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (id, session) = match lookup(&state, &id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    let mut guard = session.lock().await;
    if let Err(error) = state.flow.restart(&mut guard) {
        return flow_error_response(&state.flow, error);
    }

    match session_view(&state.flow, id, &guard) {
        Ok(view) => Json(view).into_response(),
        Err(error) => flow_error_response(&state.flow, error),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

async fn lookup(state: &AppState, raw_id: &str) -> Result<(SessionId, SharedSession), Response> {
    let id: SessionId = raw_id.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid session ID")),
        )
            .into_response()
    })?;

    let session = state.sessions.get(&id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Session not found")),
        )
            .into_response()
    })?;

    Ok((id, session))
}

fn session_view(
    flow: &SessionFlow,
    id: SessionId,
    session: &SessionState,
) -> Result<SessionView, FlowError> {
    let page_copy = flow.page_copy(session.page())?;

    let summary = if session.page() == Page::Summary && !session.needs_completion() {
        let breakdown = SummaryBreakdown::parse(session.model_reply());
        Some(SummaryView {
            narrative: breakdown.narrative().to_string(),
            actions: breakdown.actions().to_vec(),
        })
    } else {
        None
    };

    Ok(SessionView {
        session_id: id.to_string(),
        created_at: session.created_at(),
        page: session.page(),
        page_copy: page_copy.into(),
        question_count: session.question_count(),
        max_questions: session.max_questions(),
        questions_remaining: session.questions_remaining(),
        needs_completion: session.needs_completion(),
        model_reply: session.model_reply().to_string(),
        current_topic: session.current_topic().map(str::to_string),
        selected_strengths: session.selected_strengths().to_vec(),
        topics: flow.content().topics(),
        strengths: flow.content().strengths(),
        summary,
    })
}

fn flow_error_response(flow: &SessionFlow, error: FlowError) -> Response {
    let (status, message) = match &error {
        FlowError::Session(SessionError::ReplyTooShort { .. }) => {
            let message = flow
                .content()
                .text("error_too_short")
                .unwrap_or_else(|_| error.to_string());
            (StatusCode::UNPROCESSABLE_ENTITY, message)
        }
        FlowError::Session(_) | FlowError::NoTopic => (StatusCode::CONFLICT, error.to_string()),
        FlowError::Content(ContentError::MissingKey { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        FlowError::Content(_) => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        FlowError::Completion(_) => (StatusCode::BAD_GATEWAY, error.to_string()),
        FlowError::Notify(NotifyError::InvalidRecipient(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        FlowError::Notify(_) => {
            let message = flow
                .content()
                .text("email_error")
                .unwrap_or_else(|_| error.to_string());
            (StatusCode::BAD_GATEWAY, message)
        }
        FlowError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
    };

    if status.is_server_error() {
        tracing::error!(error = %error, status = status.as_u16(), "request failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "request rejected");
    }

    (status, Json(ErrorResponse::new(message))).into_response()
}

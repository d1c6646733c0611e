//! Integration tests for the session HTTP API.
//!
//! These tests drive the real router with the mock AI provider and the
//! YAML content store, covering the full questionnaire flow:
//! 1. Session creation on the Intro page
//! 2. Topic confirmation and the question rounds
//! 3. Streaming the model reply over SSE
//! 4. Summary parsing, email delivery, and restart

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use strengths_coach::adapters::ai::{MockAiProvider, MockResponse};
use strengths_coach::adapters::content::YamlContentStore;
use strengths_coach::adapters::http::{api_router, AppState, SessionRegistry};
use strengths_coach::application::{CompletionService, RetryPolicy, SessionFlow};
use strengths_coach::domain::summary::SummaryBreakdown;
use strengths_coach::ports::{NotifyError, SummaryNotifier};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CONTENT_YAML: &str = r#"
system_prompt: "You are a reflective strengths coach."

pages:
  Intro:
    title: "Strengths Coach"
    markdown: "Pick a topic to get started."
  Questions:
    title: "Let's talk"
  Summary:
    title: "Your summary"

topics:
  - name: Career
    guidance_prompt: "Coach me on my career. My strengths: {strengths}."
    summary_prompt: "Summarize and delimit each action."

strengths:
  - Achiever
  - Strategic

text:
  page_title: "Strengths Coach"
  strength_selection_text: "Pick your strengths"
  topic_selection_text: "Pick a topic"
  user_reply_placeholder: "Type here"
  error_too_short: "Please write a little more before continuing."
  email_subject: "Your coaching summary"
  email_sent: "Email sent!"
  email_error: "We couldn't send your email."
  button_discuss_another_topic: "Discuss another topic"
"#;

/// Records sent emails instead of delivering them.
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, SummaryBreakdown)>>,
}

#[async_trait]
impl SummaryNotifier for RecordingNotifier {
    async fn send_summary(
        &self,
        recipient: &str,
        subject: &str,
        summary: &SummaryBreakdown,
    ) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push((
            recipient.to_string(),
            subject.to_string(),
            summary.clone(),
        ));
        Ok(())
    }
}

fn test_app(provider: MockAiProvider, notifier: Arc<RecordingNotifier>) -> Router {
    let content = Arc::new(YamlContentStore::from_yaml(CONTENT_YAML).unwrap());
    let completion = CompletionService::new(
        Arc::new(provider),
        RetryPolicy {
            max_attempts: 10,
            delay: Duration::from_millis(1),
        },
    );
    let flow = Arc::new(SessionFlow::new(content, completion, notifier, 3));
    api_router(AppState::new(flow, SessionRegistry::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Reads the SSE reply stream to completion and returns the raw body.
async fn read_reply_stream(app: &Router, session_id: &str) -> String {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/sessions/{session_id}/reply"))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

async fn create_session(app: &Router) -> String {
    let (status, view) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    view["session_id"].as_str().unwrap().to_string()
}

async fn confirm_topic(app: &Router, id: &str) {
    let (status, view) = send(
        app,
        "POST",
        &format!("/api/sessions/{id}/topic"),
        Some(json!({"topic": "Career", "strengths": ["Achiever", "Strategic"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "questions");
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn create_session_starts_on_intro() {
    let app = test_app(MockAiProvider::new(), Arc::new(RecordingNotifier::default()));

    let (status, view) = send(&app, "POST", "/api/sessions", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["page"], "intro");
    assert_eq!(view["question_count"], 1);
    assert_eq!(view["max_questions"], 3);
    assert_eq!(view["page_copy"]["title"], "Strengths Coach");
    assert_eq!(view["topics"][0], "Career");
    assert_eq!(view["strengths"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = test_app(MockAiProvider::new(), Arc::new(RecordingNotifier::default()));

    let (status, body) = send(
        &app,
        "GET",
        "/api/sessions/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn malformed_session_id_is_bad_request() {
    let app = test_app(MockAiProvider::new(), Arc::new(RecordingNotifier::default()));

    let (status, _) = send(&app, "GET", "/api/sessions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reply_stream_emits_partials_then_complete() {
    let provider =
        MockAiProvider::new().with_response(MockResponse::success("What energizes you at work?"));
    let app = test_app(provider, Arc::new(RecordingNotifier::default()));

    let id = create_session(&app).await;
    confirm_topic(&app, &id).await;

    let body = read_reply_stream(&app, &id).await;

    assert!(body.contains("event: partial"));
    assert!(body.contains("event: complete"));
    assert!(body.contains("What energizes you at work?"));

    // The reply is now pinned on the session.
    let (_, view) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(view["model_reply"], "What energizes you at work?");
    assert_eq!(view["needs_completion"], false);
}

#[tokio::test]
async fn reply_stream_retries_through_provider_failures() {
    let provider = MockAiProvider::new()
        .with_response(MockResponse::error("503 unavailable"))
        .with_response(MockResponse::error("503 unavailable"))
        .with_response(MockResponse::success("Third time lucky?"));
    let app = test_app(provider, Arc::new(RecordingNotifier::default()));

    let id = create_session(&app).await;
    confirm_topic(&app, &id).await;

    let body = read_reply_stream(&app, &id).await;

    assert!(body.contains("event: complete"));
    assert!(body.contains("Third time lucky?"));
    assert!(!body.contains("event: error"));
}

#[tokio::test]
async fn reply_stream_reports_exhaustion_as_error_event() {
    let mut provider = MockAiProvider::new();
    for _ in 0..10 {
        provider = provider.with_response(MockResponse::error("503 unavailable"));
    }
    let app = test_app(provider, Arc::new(RecordingNotifier::default()));

    let id = create_session(&app).await;
    confirm_topic(&app, &id).await;

    let body = read_reply_stream(&app, &id).await;

    assert!(body.contains("event: error"));
    assert!(body.contains("provider exhausted after 10 attempts"));
    assert!(!body.contains("event: complete"));
}

#[tokio::test]
async fn short_reply_is_rejected_with_content_copy() {
    let provider = MockAiProvider::new().with_response(MockResponse::success("A question?"));
    let app = test_app(provider, Arc::new(RecordingNotifier::default()));

    let id = create_session(&app).await;
    confirm_topic(&app, &id).await;
    read_reply_stream(&app, &id).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/next"),
        Some(json!({"reply": "ok"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please write a little more before continuing.");

    // No state change.
    let (_, view) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(view["question_count"], 1);
}

#[tokio::test]
async fn advancing_before_any_reply_is_a_conflict() {
    let app = test_app(MockAiProvider::new(), Arc::new(RecordingNotifier::default()));

    let id = create_session(&app).await;
    confirm_topic(&app, &id).await;

    // No SSE call has stored a model reply yet.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/next"),
        Some(json!({"reply": "a perfectly long reply"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn full_session_reaches_summary_and_emails_a_copy() {
    let provider = MockAiProvider::new()
        .with_response(MockResponse::success("Question one?"))
        .with_response(MockResponse::success("Question two?"))
        .with_response(MockResponse::success("Question three?"))
        .with_response(MockResponse::success("Thanks for sharing."))
        .with_response(MockResponse::success(
            "Great progress! ::Suggestion::Do X::Suggestion::Do Y",
        ));
    let notifier = Arc::new(RecordingNotifier::default());
    let app = test_app(provider, notifier.clone());

    let id = create_session(&app).await;
    confirm_topic(&app, &id).await;

    for round in 1..=3u32 {
        read_reply_stream(&app, &id).await;
        let (status, view) = send(
            &app,
            "POST",
            &format!("/api/sessions/{id}/next"),
            Some(json!({"reply": format!("a thoughtful reply number {round}")})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["question_count"], round + 1);
    }

    // Acknowledgement reply for the final round, then the summary turn.
    read_reply_stream(&app, &id).await;
    let (status, view) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/next"),
        Some(json!({"reply": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "summary");
    assert_eq!(view["needs_completion"], true);

    read_reply_stream(&app, &id).await;
    let (_, view) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(view["summary"]["narrative"], "Great progress!");
    assert_eq!(view["summary"]["actions"][0], "Do X");
    assert_eq!(view["summary"]["actions"][1], "Do Y");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/email"),
        Some(json!({
            "email_address": "user@example.com",
            "actions": ["Do X, every morning"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email sent!");

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (recipient, subject, breakdown) = &sent[0];
    assert_eq!(recipient, "user@example.com");
    assert_eq!(subject, "Your coaching summary");
    assert_eq!(breakdown.actions(), ["Do X, every morning", "Do Y"]);
}

#[tokio::test]
async fn restart_returns_to_intro_keeping_the_session() {
    let provider = MockAiProvider::new()
        .with_response(MockResponse::success("Q1?"))
        .with_response(MockResponse::success("Q2?"))
        .with_response(MockResponse::success("Q3?"))
        .with_response(MockResponse::success("Ack."))
        .with_response(MockResponse::success("Summary text"));
    let app = test_app(provider, Arc::new(RecordingNotifier::default()));

    let id = create_session(&app).await;
    confirm_topic(&app, &id).await;
    for _ in 0..3 {
        read_reply_stream(&app, &id).await;
        send(
            &app,
            "POST",
            &format!("/api/sessions/{id}/next"),
            Some(json!({"reply": "a long enough reply"})),
        )
        .await;
    }
    read_reply_stream(&app, &id).await;
    send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/next"),
        Some(json!({"reply": ""})),
    )
    .await;
    read_reply_stream(&app, &id).await;

    let (status, view) = send(&app, "POST", &format!("/api/sessions/{id}/restart"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "intro");
    assert_eq!(view["question_count"], 1);
    // Strengths survive for the next topic.
    assert_eq!(view["selected_strengths"].as_array().unwrap().len(), 2);

    // Restarting twice is rejected.
    let (status, _) = send(&app, "POST", &format!("/api/sessions/{id}/restart"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn emailing_before_the_summary_is_a_conflict() {
    let app = test_app(MockAiProvider::new(), Arc::new(RecordingNotifier::default()));

    let id = create_session(&app).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/email"),
        Some(json!({"email_address": "user@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

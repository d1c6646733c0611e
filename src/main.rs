//! Strengths Coach server binary.
//!
//! Loads configuration from the environment, wires the adapters into the
//! session flow, and serves the HTTP API.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use strengths_coach::adapters::ai::{OpenAIConfig, OpenAIProvider};
use strengths_coach::adapters::content::YamlContentStore;
use strengths_coach::adapters::email::{EmailTemplate, ResendConfig, ResendNotifier};
use strengths_coach::adapters::http::{api_router, AppState, SessionRegistry};
use strengths_coach::application::{CompletionService, RetryPolicy, SessionFlow};
use strengths_coach::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let content = Arc::new(YamlContentStore::from_path(&config.content.content_path)?);
    tracing::info!(path = %config.content.content_path, "content loaded");

    let template = EmailTemplate::from_path(&config.content.email_template_path)?;
    let notifier = Arc::new(ResendNotifier::new(
        ResendConfig::new(config.email.resend_api_key.clone(), config.email.from_header()),
        template,
    ));

    let provider = Arc::new(OpenAIProvider::new(
        OpenAIConfig::new(config.ai.openai_api_key.clone())
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.request_timeout()),
    ));
    let completion = CompletionService::new(
        provider,
        RetryPolicy {
            max_attempts: config.ai.max_attempts,
            delay: config.ai.retry_delay(),
        },
    );

    let flow = Arc::new(SessionFlow::new(
        content,
        completion,
        notifier,
        config.content.max_questions,
    ));
    let state = AppState::new(flow, SessionRegistry::new());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, model = %config.ai.model, "starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, api_router(state)).await?;

    Ok(())
}

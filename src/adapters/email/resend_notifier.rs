//! Resend Notifier - delivers summary emails through the Resend API.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::summary::SummaryBreakdown;
use crate::ports::{NotifyError, SummaryNotifier};

use super::template::EmailTemplate;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Configuration for the Resend notifier.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    api_key: Secret<String>,
    /// Formatted "From" header, e.g. `Strengths Coach <noreply@example.com>`.
    pub from_header: String,
    /// Endpoint override for tests.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from_header: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            from_header: from_header.into(),
            endpoint: RESEND_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Overrides the API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Sends summary emails via Resend, rendering them through the authored
/// HTML template.
pub struct ResendNotifier {
    config: ResendConfig,
    template: EmailTemplate,
    client: Client,
}

impl ResendNotifier {
    pub fn new(config: ResendConfig, template: EmailTemplate) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            template,
            client,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl SummaryNotifier for ResendNotifier {
    async fn send_summary(
        &self,
        recipient: &str,
        subject: &str,
        summary: &SummaryBreakdown,
    ) -> Result<(), NotifyError> {
        if !recipient.contains('@') {
            return Err(NotifyError::InvalidRecipient(recipient.to_string()));
        }

        let html = self.template.render(summary);
        let request = ResendRequest {
            from: &self.config.from_header,
            to: [recipient],
            subject,
            html: &html,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "email delivery rejected");
            return Err(NotifyError::rejected(status.as_u16(), body));
        }

        tracing::debug!("summary email accepted for delivery");
        Ok(())
    }
}

//! Webhook summary notifier

use crate::adapters::traits::SummaryNotifier;
use crate::config::SecretString;
use crate::core::sync::RunCounters;
use crate::domain::{Result, SyncError};
use async_trait::async_trait;
use chrono::Local;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::time::Duration;

/// JSON body posted to the webhook
#[derive(Debug, Serialize)]
struct SummaryMessage<'a> {
    job_name: &'a str,
    finished_at: String,
    total: usize,
    #[serde(flatten)]
    counters: &'a RunCounters,
}

/// Sends the run summary to an HTTP webhook
pub struct WebhookNotifier {
    client: Client,
    url: String,
    token: Option<SecretString>,
    job_name: String,
}

impl WebhookNotifier {
    /// Create a webhook notifier
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: String, token: Option<SecretString>, job_name: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Notification(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            token,
            job_name: job_name.to_string(),
        })
    }
}

#[async_trait]
impl SummaryNotifier for WebhookNotifier {
    async fn send_summary(&self, counters: &RunCounters) -> Result<()> {
        let message = SummaryMessage {
            job_name: &self.job_name,
            finished_at: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
            total: counters.total(),
            counters,
        };

        tracing::debug!(url = %self.url, "Sending run summary to webhook");

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&message);

        if let Some(ref token) = self.token {
            request = request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret().as_str()),
            );
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Notification(format!("Failed to send summary: {e}")))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = %status, "Run summary delivered");
            Ok(())
        } else {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                error = %error_body,
                "Webhook rejected run summary"
            );
            Err(SyncError::Notification(format!(
                "Webhook returned status {status}: {error_body}"
            )))
        }
    }
}

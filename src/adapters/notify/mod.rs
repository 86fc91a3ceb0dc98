//! Run summary notifiers
//!
//! - [`LogNotifier`] writes the summary as a structured tracing event
//! - [`WebhookNotifier`] POSTs the summary as JSON to an operator webhook

pub mod webhook;

pub use webhook::WebhookNotifier;

use crate::adapters::traits::SummaryNotifier;
use crate::config::NotificationConfig;
use crate::core::sync::RunCounters;
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Notifier that only logs the summary
#[derive(Debug, Clone)]
pub struct LogNotifier {
    job_name: String,
}

impl LogNotifier {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
        }
    }
}

#[async_trait]
impl SummaryNotifier for LogNotifier {
    async fn send_summary(&self, counters: &RunCounters) -> Result<()> {
        tracing::info!(
            job_name = %self.job_name,
            new = counters.new,
            updated = counters.updated,
            inactivated = counters.inactivated,
            errors = counters.errors,
            "Integration summary"
        );
        Ok(())
    }
}

/// Builds the notifier selected by the `[notification]` section
///
/// A configured webhook wins; otherwise the summary is only logged.
///
/// # Errors
///
/// Returns an error if the webhook HTTP client cannot be built.
pub fn create_notifier(
    config: &NotificationConfig,
    job_name: &str,
) -> Result<Arc<dyn SummaryNotifier>> {
    match config.webhook_url {
        Some(ref url) => {
            tracing::info!(webhook = %url, "Run summary will be sent to webhook");
            Ok(Arc::new(WebhookNotifier::new(
                url.clone(),
                config.webhook_token.clone(),
                job_name,
            )?))
        }
        None => Ok(Arc::new(LogNotifier::new(job_name))),
    }
}

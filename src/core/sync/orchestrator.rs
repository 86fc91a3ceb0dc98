//! Sync orchestrator - drives one batch run
//!
//! This module ties the pipeline together: it pulls the pending records,
//! classifies and submits each one in source order, folds the outcomes into
//! a [`RunSummary`] and hands the result to the completion sink and the
//! summary notifier.

use super::summary::RunSummary;
use crate::adapters::traits::{
    BeneficiarySource, CompletionSink, EventLevel, IntegrationEventLog, OutcomeLog,
    SummaryNotifier,
};
use crate::config::{RunConfig, SyncConfig};
use crate::core::classify::{classify, plan_for, ApiEndpoints, Operation};
use crate::core::outcome::interpret;
use crate::core::submit::{FailureLedger, Submitter};
use crate::domain::{BeneficiaryRecord, Result};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;

/// Collaborators the orchestrator calls into
#[derive(Clone)]
pub struct SyncCollaborators {
    pub source: Arc<dyn BeneficiarySource>,
    pub completion: Arc<dyn CompletionSink>,
    pub notifier: Arc<dyn SummaryNotifier>,
    pub events: Arc<dyn IntegrationEventLog>,
    pub outcomes: Arc<dyn OutcomeLog>,
}

/// Sync orchestrator
pub struct SyncOrchestrator {
    submitter: Submitter,
    endpoints: ApiEndpoints,
    contract: String,
    settings: RunConfig,
    collaborators: SyncCollaborators,
}

impl SyncOrchestrator {
    /// Create an orchestrator from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SyncConfig, collaborators: SyncCollaborators) -> Result<Self> {
        let ledger = FailureLedger::new(config.logging.ledger_path());
        let submitter = Submitter::new(&config.api, ledger)?;

        Ok(Self {
            submitter,
            endpoints: ApiEndpoints::from_base_url(&config.api.base_url),
            contract: config.api.contract_number.clone(),
            settings: config.sync.clone(),
            collaborators,
        })
    }

    /// Abort the batch on the first record-level failure
    pub fn with_halt_on_record_error(mut self, halt: bool) -> Self {
        self.settings.halt_on_record_error = halt;
        self
    }

    /// Execute one batch run
    ///
    /// This is the main entry point of the sync process. It:
    /// 1. Clears the log artifacts of the previous run
    /// 2. Fetches the pending records
    /// 3. For each record, in order:
    ///    - Classifies the operation
    ///    - Builds and submits the payload
    ///    - Interprets the response
    /// 4. Marks integrated records as complete
    /// 5. Sends the run summary
    ///
    /// Steps 4 and 5 also run when the batch is aborted part-way. An empty
    /// pending set ends the run before any collaborator is called.
    ///
    /// # Errors
    ///
    /// Returns an error only if the pending records cannot be fetched.
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();

        if let Err(e) = self.collaborators.outcomes.reset() {
            tracing::warn!(error = %e, "Failed to clear previous run logs");
        }

        tracing::info!("Fetching pending beneficiaries");
        let records = self.collaborators.source.fetch_pending_records().await?;
        summary.total_records = records.len();

        if records.is_empty() {
            tracing::warn!("No pending beneficiaries to synchronize");
            return Ok(summary.with_duration(start_time.elapsed()));
        }

        tracing::info!(
            total = records.len(),
            halt_on_record_error = self.settings.halt_on_record_error,
            "Processing pending beneficiaries"
        );

        let total = records.len();
        for (index, record) in records.iter().enumerate() {
            self.report_progress(index + 1, total);

            if let Err(e) = self.process_record(record, &mut summary).await {
                let message = format!("failed to process beneficiary: {e}");
                tracing::error!(
                    person_id = %record.person_id,
                    card_number = %record.card_label(),
                    error = %e,
                    "Failed to process beneficiary"
                );
                self.collaborators
                    .outcomes
                    .error(&record.person_id, record.card_label(), &message);
                self.log_event(record, EventLevel::Error, &message).await;
                summary.record_failure(record);

                if self.settings.halt_on_record_error {
                    tracing::error!(
                        processed = summary.total_processed(),
                        total,
                        "Aborting batch after record failure"
                    );
                    summary.aborted = true;
                    break;
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        self.finalize(&summary).await;
        Ok(summary)
    }

    async fn process_record(
        &self,
        record: &BeneficiaryRecord,
        summary: &mut RunSummary,
    ) -> Result<()> {
        tracing::info!(
            person_id = %record.person_id,
            card_number = %record.card_label(),
            operation = %record.operation,
            "Checking beneficiary"
        );
        self.log_event(record, EventLevel::Info, "checking beneficiary")
            .await;

        let operation = classify(record, Local::now().naive_local());

        if let Operation::Unrecognized(marker) = &operation {
            let message = format!("invalid operation type '{marker}'");
            tracing::warn!(
                person_id = %record.person_id,
                marker = %marker,
                "Skipping beneficiary with invalid operation type"
            );
            self.collaborators
                .outcomes
                .error(&record.person_id, record.card_label(), &message);
            self.log_event(record, EventLevel::Error, &message).await;
            summary.record_failure(record);
            return Ok(());
        }

        let plan = plan_for(record, operation, &self.endpoints, &self.contract)?;

        let response = self
            .submitter
            .submit(&plan.url, &plan.payload, plan.method, &record.person_id)
            .await;

        let outcome = interpret(
            record,
            &plan.operation,
            response.as_ref(),
            Local::now().date_naive(),
            self.collaborators.outcomes.as_ref(),
        );
        summary.record_outcome(record, outcome);

        let level = if outcome.is_success() {
            EventLevel::Info
        } else {
            EventLevel::Error
        };
        self.log_event(
            record,
            level,
            &format!("{} via {}: {outcome}", plan.operation, plan.method),
        )
        .await;

        Ok(())
    }

    async fn finalize(&self, summary: &RunSummary) {
        summary.log_summary();

        if !summary.integrated.is_empty() {
            if let Err(e) = self
                .collaborators
                .completion
                .mark_integration_complete(&summary.integrated, &self.settings.completion_status)
                .await
            {
                tracing::error!(
                    error = %e,
                    count = summary.integrated.len(),
                    "Failed to mark beneficiaries as integrated"
                );
            }
        }

        if let Err(e) = self
            .collaborators
            .notifier
            .send_summary(&summary.counters)
            .await
        {
            tracing::error!(error = %e, "Failed to send run summary");
        }
    }

    fn report_progress(&self, position: usize, total: usize) {
        if should_report_progress(position, self.settings.progress_interval) {
            println!("Processing record {position}/{total}");
            crate::log_sync_progress!(position, total);
        }
    }

    async fn log_event(&self, record: &BeneficiaryRecord, level: EventLevel, message: &str) {
        let card_number = record.card_number.as_deref().unwrap_or_default();
        if let Err(e) = self
            .collaborators
            .events
            .log_event(&record.person_id, card_number, level, message)
            .await
        {
            tracing::warn!(
                person_id = %record.person_id,
                error = %e,
                "Failed to write integration event"
            );
        }
    }
}

/// Progress is reported on the first record and every `interval` records
fn should_report_progress(position: usize, interval: usize) -> bool {
    position == 1 || (interval > 0 && position % interval == 0)
}

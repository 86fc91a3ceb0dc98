//! PostgreSQL adapter implementing the collaborator traits
//!
//! One adapter serves as pending-record source, completion sink,
//! integration event log and run-status recorder.

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    PendingBeneficiaryRow, INSERT_EVENT_STATEMENT, INSERT_RUN_STATUS_STATEMENT,
    MARK_COMPLETE_STATEMENT, PENDING_QUERY,
};
use crate::adapters::traits::{
    BeneficiarySource, CompletionSink, EventLevel, IntegrationEventLog, RunState,
    RunStatusRecorder,
};
use crate::domain::{BeneficiaryRecord, IntegratedBeneficiary, PersonId, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// PostgreSQL implementation of the collaborator traits
///
/// This wraps the PostgreSQLClient and implements the source, sink, event
/// log and status traits over the `benesync` schema.
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl BeneficiarySource for PostgreSQLAdapter {
    async fn fetch_pending_records(&self) -> Result<Vec<BeneficiaryRecord>> {
        let rows = self.client.query(PENDING_QUERY, &[]).await?;

        let records = rows
            .iter()
            .map(|row| PendingBeneficiaryRow::from_row(row).map(PendingBeneficiaryRow::into_record))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(count = records.len(), "Fetched pending beneficiaries");
        Ok(records)
    }
}

#[async_trait]
impl CompletionSink for PostgreSQLAdapter {
    async fn mark_integration_complete(
        &self,
        integrated: &[IntegratedBeneficiary],
        status: &str,
    ) -> Result<()> {
        if integrated.is_empty() {
            return Ok(());
        }

        let (person_ids, card_numbers): (Vec<String>, Vec<String>) = integrated
            .iter()
            .map(|b| (b.person_id.as_str().to_string(), b.card_number.clone()))
            .unzip();

        let updated = self
            .client
            .execute(
                MARK_COMPLETE_STATEMENT,
                &[&status, &person_ids, &card_numbers],
            )
            .await?;

        tracing::info!(
            requested = integrated.len(),
            updated,
            status = %status,
            "Marked beneficiaries as integrated"
        );
        Ok(())
    }
}

#[async_trait]
impl IntegrationEventLog for PostgreSQLAdapter {
    async fn log_event(
        &self,
        person_id: &PersonId,
        card_number: &str,
        level: EventLevel,
        message: &str,
    ) -> Result<()> {
        self.client
            .execute(
                INSERT_EVENT_STATEMENT,
                &[&person_id.as_str(), &card_number, &level.as_str(), &message],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RunStatusRecorder for PostgreSQLAdapter {
    async fn record_run_status(
        &self,
        job_name: &str,
        state: RunState,
        message: &str,
        started_at: NaiveDateTime,
        finished_at: Option<NaiveDateTime>,
    ) -> Result<()> {
        self.client
            .execute(
                INSERT_RUN_STATUS_STATEMENT,
                &[&job_name, &state.as_str(), &message, &started_at, &finished_at],
            )
            .await?;

        tracing::debug!(job_name = %job_name, state = %state, "Recorded run status");
        Ok(())
    }
}

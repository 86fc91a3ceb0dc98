//! Collaborator traits
//!
//! This module defines the interfaces the sync pipeline calls into: where
//! pending records come from, where completion is written back, how the run
//! summary is delivered and where per-record events go. Concrete
//! implementations live in [`crate::adapters::postgresql`],
//! [`crate::adapters::notify`] and [`crate::logging::channels`].

use crate::core::sync::RunCounters;
use crate::domain::{BeneficiaryRecord, IntegratedBeneficiary, PersonId, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::fmt;

/// Severity of an integration event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

impl EventLevel {
    /// Level name as stored in the integration log
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLevel::Info => "INFO",
            EventLevel::Warning => "WARNING",
            EventLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a job run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Run in progress
    Running,
    /// Run finished
    Succeeded,
    /// Run aborted by an error
    Failed,
}

impl RunState {
    /// State label as stored in the job status table
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Running => "executando",
            RunState::Succeeded => "sucesso",
            RunState::Failed => "erro",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of pending beneficiary records
#[async_trait]
pub trait BeneficiarySource: Send + Sync {
    /// Fetch every record awaiting synchronization, in processing order
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be queried.
    async fn fetch_pending_records(&self) -> Result<Vec<BeneficiaryRecord>>;
}

/// Write-back of integrated records
#[async_trait]
pub trait CompletionSink: Send + Sync {
    /// Mark a batch of records as integrated with the given status
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be written.
    async fn mark_integration_complete(
        &self,
        integrated: &[IntegratedBeneficiary],
        status: &str,
    ) -> Result<()>;
}

/// Delivery of the end-of-run summary
#[async_trait]
pub trait SummaryNotifier: Send + Sync {
    /// Send the run counters to operators
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    async fn send_summary(&self, counters: &RunCounters) -> Result<()>;
}

/// Persistent per-record integration log
#[async_trait]
pub trait IntegrationEventLog: Send + Sync {
    /// Record one event about a beneficiary
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be stored.
    async fn log_event(
        &self,
        person_id: &PersonId,
        card_number: &str,
        level: EventLevel,
        message: &str,
    ) -> Result<()>;
}

/// Job status bookkeeping
#[async_trait]
pub trait RunStatusRecorder: Send + Sync {
    /// Record a state transition of the job
    ///
    /// # Errors
    ///
    /// Returns an error if the status could not be stored.
    async fn record_run_status(
        &self,
        job_name: &str,
        state: RunState,
        message: &str,
        started_at: NaiveDateTime,
        finished_at: Option<NaiveDateTime>,
    ) -> Result<()>;
}

/// Dedicated success and error channels for submission outcomes
///
/// Implementations handle their own I/O failures; logging an outcome never
/// fails the record.
pub trait OutcomeLog: Send + Sync {
    /// Record an accepted submission
    fn success(&self, person_id: &PersonId, card_number: &str, message: &str);

    /// Record a rejected or failed submission
    fn error(&self, person_id: &PersonId, card_number: &str, message: &str);

    /// Clear the artifacts left by the previous run
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact exists but cannot be truncated.
    fn reset(&self) -> Result<()> {
        Ok(())
    }
}

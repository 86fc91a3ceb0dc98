//! Run summary and reporting
//!
//! This module defines the structures that accumulate the result of one
//! batch execution.

use crate::core::outcome::SubmissionOutcome;
use crate::domain::{BeneficiaryRecord, IntegratedBeneficiary, PersonId};
use serde::Serialize;
use std::time::Duration;

/// Outcome counters delivered to the summary notifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    /// New enrollments accepted
    pub new: usize,

    /// Updates accepted
    pub updated: usize,

    /// Inactivations accepted
    pub inactivated: usize,

    /// Records that ended in error
    pub errors: usize,

    /// Identifiers of the records that ended in error
    pub failed_ids: Vec<PersonId>,
}

impl RunCounters {
    /// Number of records with an outcome
    pub fn total(&self) -> usize {
        self.new + self.updated + self.inactivated + self.errors
    }

    /// Number of records accepted by the API
    pub fn succeeded(&self) -> usize {
        self.new + self.updated + self.inactivated
    }
}

/// Summary of one sync run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of pending records fetched
    pub total_records: usize,

    /// Outcome counters
    pub counters: RunCounters,

    /// Records accepted by the API, in processing order
    pub integrated: Vec<IntegratedBeneficiary>,

    /// Whether the run stopped before the last record
    pub aborted: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Fold the outcome of one record into the summary
    pub fn record_outcome(&mut self, record: &BeneficiaryRecord, outcome: SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Created => self.counters.new += 1,
            SubmissionOutcome::Updated => self.counters.updated += 1,
            SubmissionOutcome::Inactivated => self.counters.inactivated += 1,
            SubmissionOutcome::Error => {
                self.record_failure(record);
                return;
            }
        }
        self.integrated.push(record.integration_key());
    }

    /// Count a record as failed
    pub fn record_failure(&mut self, record: &BeneficiaryRecord) {
        self.counters.errors += 1;
        self.counters.failed_ids.push(record.person_id.clone());
    }

    /// Number of records that reached an outcome
    pub fn total_processed(&self) -> usize {
        self.counters.total()
    }

    /// Check if the run finished without errors
    pub fn is_successful(&self) -> bool {
        self.counters.errors == 0 && !self.aborted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_records = self.total_records,
            processed = self.total_processed(),
            succeeded = self.counters.succeeded(),
            new = self.counters.new,
            updated = self.counters.updated,
            inactivated = self.counters.inactivated,
            errors = self.counters.errors,
            aborted = self.aborted,
            duration_secs = self.duration.as_secs(),
            "Sync completed"
        );

        if !self.counters.failed_ids.is_empty() {
            let failed: Vec<&str> = self
                .counters
                .failed_ids
                .iter()
                .map(PersonId::as_str)
                .collect();
            tracing::warn!(
                error_count = failed.len(),
                failed_ids = %failed.join(", "),
                "Sync completed with errors"
            );
        }
    }
}

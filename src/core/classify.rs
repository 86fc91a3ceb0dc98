//! Operation classification
//!
//! Decides, per pending record, which API call represents it: a new
//! enrollment, an idempotent update or an inactivation. The decision only
//! depends on the operation marker, the termination date and the reference
//! instant passed in by the caller.

use super::payload::{build_inactivation_payload, build_upsert_payload, OutboundPayload};
use crate::domain::{BeneficiaryRecord, OperationMarker, Result, SyncError};
use chrono::NaiveDateTime;
use std::fmt;

/// Path of the create/update endpoint
pub const CREATE_PATH: &str = "/Contatos/PessoaFisica/Post";

/// Path of the inactivation endpoint
pub const INACTIVATE_PATH: &str = "/Contatos/InativarBeneficiario/Put";

/// Classified operation for a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// New enrollment
    Create,
    /// Update of an existing enrollment
    Update,
    /// Coverage ended before the reference instant
    Inactivate {
        /// Parsed termination instant
        terminated_at: NaiveDateTime,
    },
    /// Marker that is neither `N` nor `U`
    Unrecognized(String),
}

impl Operation {
    /// Short label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Inactivate { .. } => "inactivate",
            Operation::Unrecognized(_) => "unrecognized",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// HTTP method used by a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Create and update calls
    Post,
    /// Inactivation calls
    Put,
}

impl HttpMethod {
    /// Method name as sent on the wire
    ///
    /// ```
    /// use benesync::core::classify::HttpMethod;
    ///
    /// assert_eq!(HttpMethod::Put.as_str(), "PUT");
    /// assert_eq!(HttpMethod::Post.to_string(), "POST");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute URLs of the two beneficiary endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Create and update endpoint (`POST`)
    pub create_url: String,
    /// Inactivation endpoint (`PUT`)
    pub inactivate_url: String,
}

impl ApiEndpoints {
    /// Derives both endpoint URLs from the API base URL
    ///
    /// # Example
    ///
    /// ```
    /// use benesync::core::classify::ApiEndpoints;
    ///
    /// let endpoints = ApiEndpoints::from_base_url("https://api.example.com/");
    /// assert_eq!(
    ///     endpoints.create_url,
    ///     "https://api.example.com/Contatos/PessoaFisica/Post"
    /// );
    /// ```
    pub fn from_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            create_url: format!("{base}{CREATE_PATH}"),
            inactivate_url: format!("{base}{INACTIVATE_PATH}"),
        }
    }
}

/// A fully prepared API call for one record
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPlan {
    /// Classified operation
    pub operation: Operation,
    /// HTTP method for the call
    pub method: HttpMethod,
    /// Absolute endpoint URL
    pub url: String,
    /// Request body, already filtered for empty values
    pub payload: OutboundPayload,
}

/// Classifies a record against the reference instant `now`
///
/// An update whose termination date lies strictly before `now` is an
/// inactivation. A termination date equal to `now` is still a standard
/// update. New enrollments ignore the termination date.
pub fn classify(record: &BeneficiaryRecord, now: NaiveDateTime) -> Operation {
    match &record.operation {
        OperationMarker::New => Operation::Create,
        OperationMarker::Update => match termination_instant(record) {
            Some(terminated_at) if terminated_at < now => Operation::Inactivate { terminated_at },
            _ => Operation::Update,
        },
        OperationMarker::Unrecognized(marker) => Operation::Unrecognized(marker.clone()),
    }
}

/// Classifies a record and builds the matching submission
///
/// # Errors
///
/// - [`SyncError::Validation`] for an unrecognized marker
/// - [`SyncError::Format`] when the identifier cannot be normalized
pub fn plan(
    record: &BeneficiaryRecord,
    now: NaiveDateTime,
    endpoints: &ApiEndpoints,
    contract: &str,
) -> Result<SubmissionPlan> {
    plan_for(record, classify(record, now), endpoints, contract)
}

/// Builds the submission for an already classified record
///
/// # Errors
///
/// Same as [`plan`].
pub fn plan_for(
    record: &BeneficiaryRecord,
    operation: Operation,
    endpoints: &ApiEndpoints,
    contract: &str,
) -> Result<SubmissionPlan> {
    let (method, url, payload) = match &operation {
        Operation::Create | Operation::Update => (
            HttpMethod::Post,
            endpoints.create_url.clone(),
            build_upsert_payload(record, contract)?,
        ),
        Operation::Inactivate { .. } => (
            HttpMethod::Put,
            endpoints.inactivate_url.clone(),
            build_inactivation_payload(record, contract),
        ),
        Operation::Unrecognized(marker) => {
            return Err(SyncError::Validation(format!(
                "unrecognized operation marker '{marker}'"
            )));
        }
    };

    Ok(SubmissionPlan {
        operation,
        method,
        url,
        payload,
    })
}

fn termination_instant(record: &BeneficiaryRecord) -> Option<NaiveDateTime> {
    let date = record.termination()?;
    let parsed = date.to_datetime();
    if parsed.is_none() {
        tracing::warn!(
            person_id = %record.person_id,
            termination_date = %date,
            "Unparsable termination date, treating record as a standard update"
        );
    }
    parsed
}

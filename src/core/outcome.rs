//! Outcome interpretation
//!
//! Maps the raw result of a submission to a [`SubmissionOutcome`] and writes
//! exactly one entry to the success or error channel.

use super::classify::Operation;
use super::submit::ApiResponse;
use crate::adapters::traits::OutcomeLog;
use crate::domain::{BeneficiaryRecord, OperationMarker};
use chrono::NaiveDate;
use std::fmt;

/// Final category of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created,
    Updated,
    Inactivated,
    Error,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SubmissionOutcome::Error)
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionOutcome::Created => "created",
            SubmissionOutcome::Updated => "updated",
            SubmissionOutcome::Inactivated => "inactivated",
            SubmissionOutcome::Error => "error",
        };
        f.write_str(label)
    }
}

/// Interprets the result of submitting `record`
///
/// A call is accepted when the status is 200 or 201, or when the JSON body
/// reports `"Sucesso": true`. An accepted update whose termination date falls
/// strictly before `today` counts as an inactivation. `None` means no call
/// completed and is always an error.
pub fn interpret(
    record: &BeneficiaryRecord,
    operation: &Operation,
    response: Option<&ApiResponse>,
    today: NaiveDate,
    log: &dyn OutcomeLog,
) -> SubmissionOutcome {
    let card = record.card_label();

    let Some(response) = response else {
        log.error(&record.person_id, card, "no response from API");
        return SubmissionOutcome::Error;
    };

    if !(response.is_success_status() || response.reports_success()) {
        let message = format!(
            "API rejected {operation}: HTTP {}: {}",
            response.status,
            response.body_text()
        );
        log.error(&record.person_id, card, &message);
        return SubmissionOutcome::Error;
    }

    let outcome = match (&record.operation, operation) {
        (OperationMarker::Update, _) if terminated_before(record, today) => {
            SubmissionOutcome::Inactivated
        }
        (_, Operation::Create) => SubmissionOutcome::Created,
        (OperationMarker::New, _) => SubmissionOutcome::Created,
        _ => SubmissionOutcome::Updated,
    };

    log.success(&record.person_id, card, &format!("beneficiary {outcome}"));
    outcome
}

fn terminated_before(record: &BeneficiaryRecord, today: NaiveDate) -> bool {
    record
        .termination()
        .and_then(|date| date.to_date())
        .is_some_and(|date| date < today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PersonId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLog {
        entries: Mutex<Vec<(bool, String, String, String)>>,
    }

    impl RecordingLog {
        fn entries(&self) -> Vec<(bool, String, String, String)> {
            self.entries.lock().unwrap().clone()
        }
    }

    impl OutcomeLog for RecordingLog {
        fn success(&self, person_id: &PersonId, card_number: &str, message: &str) {
            self.entries.lock().unwrap().push((
                true,
                person_id.to_string(),
                card_number.to_string(),
                message.to_string(),
            ));
        }

        fn error(&self, person_id: &PersonId, card_number: &str, message: &str) {
            self.entries.lock().unwrap().push((
                false,
                person_id.to_string(),
                card_number.to_string(),
                message.to_string(),
            ));
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn ok(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(status, body.to_string())
    }

    #[test]
    fn test_created() {
        let log = RecordingLog::default();
        let record = BeneficiaryRecord::builder("123", "N").card_number("C1").build();

        let outcome = interpret(&record, &Operation::Create, Some(&ok(201, "{}")), today(), &log);

        assert_eq!(outcome, SubmissionOutcome::Created);
        assert_eq!(
            log.entries(),
            vec![(true, "123".into(), "C1".into(), "beneficiary created".into())]
        );
    }

    #[test]
    fn test_updated_with_future_termination() {
        let log = RecordingLog::default();
        let record = BeneficiaryRecord::builder("123", "U")
            .termination_date(today().succ_opt().unwrap())
            .build();

        let outcome = interpret(&record, &Operation::Update, Some(&ok(200, "")), today(), &log);
        assert_eq!(outcome, SubmissionOutcome::Updated);
    }

    #[test]
    fn test_inactivated_with_past_termination() {
        let log = RecordingLog::default();
        let yesterday = today().pred_opt().unwrap();
        let record = BeneficiaryRecord::builder("123", "U")
            .termination_date(yesterday)
            .build();
        let operation = Operation::Inactivate {
            terminated_at: yesterday.and_hms_opt(0, 0, 0).unwrap(),
        };

        let outcome = interpret(&record, &operation, Some(&ok(200, "{}")), today(), &log);

        assert_eq!(outcome, SubmissionOutcome::Inactivated);
        assert_eq!(log.entries()[0].3, "beneficiary inactivated");
    }

    #[test]
    fn test_termination_today_is_not_inactivation() {
        let log = RecordingLog::default();
        let record = BeneficiaryRecord::builder("123", "U")
            .termination_date(today())
            .build();

        let outcome = interpret(&record, &Operation::Update, Some(&ok(200, "{}")), today(), &log);
        assert_eq!(outcome, SubmissionOutcome::Updated);
    }

    #[test]
    fn test_business_success_flag_accepted() {
        let log = RecordingLog::default();
        let record = BeneficiaryRecord::builder("123", "N").build();

        let response = ok(202, r#"{"Sucesso": true}"#);
        let outcome = interpret(&record, &Operation::Create, Some(&response), today(), &log);
        assert_eq!(outcome, SubmissionOutcome::Created);
    }

    #[test]
    fn test_rejected_status_is_error() {
        let log = RecordingLog::default();
        let record = BeneficiaryRecord::builder("123", "N").build();

        let response = ok(202, r#"{"Sucesso": false, "Mensagem": "CPF inválido"}"#);
        let outcome = interpret(&record, &Operation::Create, Some(&response), today(), &log);

        assert_eq!(outcome, SubmissionOutcome::Error);
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].0);
        assert_eq!(entries[0].2, "UNKNOWN");
        assert!(entries[0].3.contains("HTTP 202"));
    }

    #[test]
    fn test_missing_response_is_error() {
        let log = RecordingLog::default();
        let record = BeneficiaryRecord::builder("123", "U").card_number("C9").build();

        let outcome = interpret(&record, &Operation::Update, None, today(), &log);

        assert_eq!(outcome, SubmissionOutcome::Error);
        assert_eq!(
            log.entries(),
            vec![(false, "123".into(), "C9".into(), "no response from API".into())]
        );
    }
}

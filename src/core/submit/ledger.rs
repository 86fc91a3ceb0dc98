//! Append-only failure ledger
//!
//! Every submission that exhausts its retries leaves exactly one CSV line:
//!
//! ```text
//! personId,cardNumber,isoTimestamp,"errorMessage"
//! ```
//!
//! The card number is read back from the payload that was sent, so the
//! ledger works for both payload shapes. The identifier comes from the
//! payload `Cpf` when present; inactivation payloads carry none, so the
//! submitted record's identifier is used instead.

use crate::core::payload::OutboundPayload;
use crate::domain::{PersonId, Result};
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Placeholder for ledger fields missing from the payload
pub const NOT_AVAILABLE: &str = "N/A";

const LEDGER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// CSV file collecting permanently failed submissions
#[derive(Debug, Clone)]
pub struct FailureLedger {
    path: PathBuf,
}

impl FailureLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line for a failed payload, stamped with the local time
    ///
    /// The parent directory is created on first use.
    pub fn append(
        &self,
        payload: &OutboundPayload,
        person_id: &PersonId,
        error: &str,
    ) -> Result<()> {
        let line = format_line(payload, person_id, error, Local::now().naive_local());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;

        tracing::warn!(
            ledger = %self.path.display(),
            error = %error,
            "Recorded permanent submission failure"
        );
        Ok(())
    }
}

/// Extracts the `(personId, cardNumber)` pair for a failed payload
///
/// The identifier is the payload `Cpf`, falling back to the record's
/// normalized identifier (or its raw value when it cannot be normalized).
/// The card number comes from `Carteiras[0].Numero` for upsert payloads and
/// from `NumeroCarteira` for inactivation payloads.
pub fn ledger_key(payload: &OutboundPayload, record_id: &PersonId) -> (String, String) {
    let person_id = payload
        .get("Cpf")
        .and_then(scalar)
        .or_else(|| record_id.normalized().ok())
        .or_else(|| Some(record_id.as_str().trim().to_string()).filter(|id| !id.is_empty()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let card_number = payload
        .get("Carteiras")
        .and_then(|cards| cards.get(0))
        .and_then(|card| card.get("Numero"))
        .or_else(|| payload.get("NumeroCarteira"))
        .and_then(scalar)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    (person_id, card_number)
}

pub(crate) fn format_line(
    payload: &OutboundPayload,
    record_id: &PersonId,
    error: &str,
    at: NaiveDateTime,
) -> String {
    let (person_id, card_number) = ledger_key(payload, record_id);
    let message = error.replace(&['\r', '\n'][..], " ").replace('"', "\"\"");
    format!(
        "{person_id},{card_number},{},\"{message}\"",
        at.format(LEDGER_TIMESTAMP_FORMAT)
    )
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    fn payload(value: Value) -> OutboundPayload {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_micro_opt(9, 30, 5, 123456)
            .unwrap()
    }

    #[test]
    fn test_format_line_upsert_payload() {
        let p = payload(json!({
            "Cpf": "00000000123",
            "Carteiras": [{ "Numero": "0228000100" }]
        }));

        assert_eq!(
            format_line(&p, &PersonId::new("999"), "HTTP 500: boom", at()),
            "00000000123,0228000100,2024-06-15T09:30:05.123456,\"HTTP 500: boom\""
        );
    }

    #[test]
    fn test_format_line_inactivation_payload_uses_record_id() {
        let p = payload(json!({ "NumeroCarteira": "0228000100", "IdMotivo": 0 }));
        assert_eq!(
            format_line(&p, &PersonId::new("456"), "timeout", at()),
            "00000000456,0228000100,2024-06-15T09:30:05.123456,\"timeout\""
        );
    }

    #[test]
    fn test_ledger_key_keeps_raw_unnormalizable_id() {
        let p = payload(json!({ "NumeroCarteira": "0228000100" }));
        assert_eq!(
            ledger_key(&p, &PersonId::new("12.345")),
            ("12.345".to_string(), "0228000100".to_string())
        );
        assert_eq!(ledger_key(&p, &PersonId::new("  ")).0, NOT_AVAILABLE);
    }

    #[test]
    fn test_format_line_escapes_message() {
        let p = payload(json!({}));
        assert_eq!(
            format_line(&p, &PersonId::new(""), "bad \"value\"\nsecond line", at()),
            "N/A,N/A,2024-06-15T09:30:05.123456,\"bad \"\"value\"\" second line\""
        );
    }

    #[test]
    fn test_append_creates_directory_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("falhas.csv");
        let ledger = FailureLedger::new(&path);
        let p = payload(json!({ "Cpf": "00000000001" }));

        let id = PersonId::new("1");

        ledger.append(&p, &id, "first").unwrap();
        ledger.append(&p, &id, "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000000001,N/A,"));
        assert!(lines[1].ends_with(",\"second\""));
    }
}

//! Payload normalization for the healthcare API
//!
//! Turns a [`BeneficiaryRecord`] into the JSON body expected by the
//! beneficiary endpoints. Two payload shapes exist:
//!
//! - the upsert payload, sent to the create endpoint for new enrollments and
//!   standard updates ([`build_upsert_payload`]);
//! - the inactivation payload, sent to the inactivation endpoint
//!   ([`build_inactivation_payload`]).
//!
//! # Omit-if-empty policy
//!
//! The API rejects requests carrying null or blank top-level fields, so the
//! upsert payload goes through [`omit_if_empty`] after assembly: every
//! top-level key whose value is null, an empty string, zero, `false`, an
//! empty array or an empty object is dropped. A legitimately zero value is
//! therefore indistinguishable from an absent one. Nested objects are left
//! as built.

use crate::domain::{BeneficiaryRecord, FieldDate, Result};
use serde_json::{json, Map, Value};

/// JSON object sent to the API
pub type OutboundPayload = Map<String, Value>;

/// Builds the create/update payload for a record
///
/// # Errors
///
/// Returns [`crate::domain::SyncError::Format`] when the person identifier
/// is not an unsigned integer of at most 11 digits.
///
/// # Example
///
/// ```
/// use benesync::core::payload::build_upsert_payload;
/// use benesync::domain::BeneficiaryRecord;
///
/// let record = BeneficiaryRecord::builder("123", "N")
///     .name("Maria Souza")
///     .card_number("0228000100")
///     .build();
///
/// let payload = build_upsert_payload(&record, "0228-000001").unwrap();
/// assert_eq!(payload["Cpf"], "00000000123");
/// assert!(!payload.contains_key("Sexo"));
/// ```
pub fn build_upsert_payload(record: &BeneficiaryRecord, contract: &str) -> Result<OutboundPayload> {
    let cpf = record.person_id.normalized()?;
    let card_active = record
        .card_number
        .as_deref()
        .is_some_and(|card| !card.is_empty());

    let card = json!({
        "CnpjOperadora": text(&record.card_issuer),
        "Numero": text(&record.card_number),
        "Nome": text(&record.card_holder_name),
        "Validade": date(&record.card_expiry),
        "Produto": text(&record.plan_name),
        "Ativa": if card_active { "S" } else { "N" },
    });

    let mut payload = OutboundPayload::new();
    payload.insert("Nome".to_string(), text(&record.name));
    payload.insert("Cpf".to_string(), Value::String(cpf));
    payload.insert("Nascimento".to_string(), date(&record.birth_date));
    payload.insert("Sexo".to_string(), text(&record.sex));
    payload.insert("EstadoCivil".to_string(), text(&record.marital_status));
    payload.insert("Cns".to_string(), text(&record.health_card));
    payload.insert("Carteiras".to_string(), Value::Array(vec![card]));
    payload.insert("CompartilharComContratos".to_string(), contract_sharing(contract));

    Ok(omit_if_empty(payload))
}

/// Builds the inactivation payload for a record
///
/// The zeroed reason and flag fields are part of the wire contract and are
/// sent as-is.
pub fn build_inactivation_payload(record: &BeneficiaryRecord, contract: &str) -> OutboundPayload {
    let mut payload = OutboundPayload::new();
    payload.insert("NumeroCarteira".to_string(), text(&record.card_number));
    payload.insert("Data".to_string(), date(&record.termination_date));
    payload.insert("IdMotivo".to_string(), json!(0));
    payload.insert("ExcluirDasEquipes".to_string(), json!(0));
    payload.insert("FinalizarLinhasCuidado".to_string(), json!(0));
    payload.insert("CancelarTarefasAvulsas".to_string(), json!(0));
    payload.insert("CompartilharComContratos".to_string(), contract_sharing(contract));
    payload
}

/// Drops every top-level entry whose value is empty
pub fn omit_if_empty(payload: OutboundPayload) -> OutboundPayload {
    payload
        .into_iter()
        .filter(|(_, value)| !is_empty_value(value))
        .collect()
}

/// Whether a JSON value counts as empty for [`omit_if_empty`]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn contract_sharing(contract: &str) -> Value {
    json!([{ "Numero": contract }])
}

fn text(value: &Option<String>) -> Value {
    value
        .as_ref()
        .map(|s| Value::String(s.clone()))
        .unwrap_or(Value::Null)
}

fn date(value: &Option<FieldDate>) -> Value {
    value
        .as_ref()
        .map(|d| Value::String(d.to_wire()))
        .unwrap_or(Value::Null)
}

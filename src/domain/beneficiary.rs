//! Beneficiary record model
//!
//! A [`BeneficiaryRecord`] is the unit of work read from the pending queue in
//! the source database. Field presence is resolved when the record is built,
//! so downstream code never checks for missing keys.

use super::ids::PersonId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format for every date sent to the healthcare API
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const TEXT_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A date-valued column that may arrive typed or as free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldDate {
    /// Calendar date column
    Date(NaiveDate),
    /// Timestamp column
    DateTime(NaiveDateTime),
    /// Text column, kept verbatim
    Text(String),
}

impl FieldDate {
    /// Renders the value for the wire
    ///
    /// Structured values are formatted as `YYYY-MM-DDTHH:MM:SS`; text is
    /// passed through unchanged.
    pub fn to_wire(&self) -> String {
        match self {
            FieldDate::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.format(WIRE_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            FieldDate::DateTime(dt) => dt.format(WIRE_DATE_FORMAT).to_string(),
            FieldDate::Text(text) => text.clone(),
        }
    }

    /// Whether the value is an empty text column
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldDate::Text(text) if text.trim().is_empty())
    }

    /// Resolves the value to a timestamp, parsing text as ISO 8601
    ///
    /// A bare date resolves to midnight. Returns `None` for unparsable text.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FieldDate::Date(date) => date.and_hms_opt(0, 0, 0),
            FieldDate::DateTime(dt) => Some(*dt),
            FieldDate::Text(text) => parse_iso_datetime(text.trim()),
        }
    }

    /// Resolves the value to a calendar date, dropping the time of day
    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_datetime().map(|dt| dt.date())
    }
}

impl fmt::Display for FieldDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl From<NaiveDate> for FieldDate {
    fn from(date: NaiveDate) -> Self {
        FieldDate::Date(date)
    }
}

impl From<NaiveDateTime> for FieldDate {
    fn from(dt: NaiveDateTime) -> Self {
        FieldDate::DateTime(dt)
    }
}

impl From<&str> for FieldDate {
    fn from(text: &str) -> Self {
        FieldDate::Text(text.to_string())
    }
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    TEXT_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Operation marker stored alongside each pending record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationMarker {
    /// New enrollment (`N`)
    New,
    /// Update to an existing enrollment (`U`)
    Update,
    /// Anything else, kept for error reporting
    Unrecognized(String),
}

impl OperationMarker {
    /// Parses the raw column value
    ///
    /// Matching is exact: padded or lowercase markers are unrecognized.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "N" => OperationMarker::New,
            "U" => OperationMarker::Update,
            other => OperationMarker::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire code of the marker
    pub fn code(&self) -> &str {
        match self {
            OperationMarker::New => "N",
            OperationMarker::Update => "U",
            OperationMarker::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for OperationMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A pending beneficiary record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryRecord {
    /// National person identifier (CPF), raw as stored
    pub person_id: PersonId,
    /// Full name
    pub name: Option<String>,
    /// Birth date
    pub birth_date: Option<FieldDate>,
    /// Sex code
    pub sex: Option<String>,
    /// Marital status code
    pub marital_status: Option<String>,
    /// National health card number (CNS)
    pub health_card: Option<String>,
    /// Card issuer identifier (operator CNPJ)
    pub card_issuer: Option<String>,
    /// Plan card number
    pub card_number: Option<String>,
    /// Name printed on the card
    pub card_holder_name: Option<String>,
    /// Card expiry date
    pub card_expiry: Option<FieldDate>,
    /// Plan or product name
    pub plan_name: Option<String>,
    /// Operation marker
    pub operation: OperationMarker,
    /// Plan termination date, if any
    pub termination_date: Option<FieldDate>,
}

/// Placeholder used in logs when a record lacks a card number
pub const UNKNOWN_CARD: &str = "UNKNOWN";

impl BeneficiaryRecord {
    /// Starts building a record
    pub fn builder(person_id: impl Into<String>, operation: &str) -> BeneficiaryRecordBuilder {
        BeneficiaryRecordBuilder::new(person_id, operation)
    }

    /// Card number for log lines, or a placeholder when absent
    pub fn card_label(&self) -> &str {
        self.card_number
            .as_deref()
            .filter(|card| !card.is_empty())
            .unwrap_or(UNKNOWN_CARD)
    }

    /// Termination date, ignoring blank text values
    pub fn termination(&self) -> Option<&FieldDate> {
        self.termination_date.as_ref().filter(|date| !date.is_blank())
    }

    /// Identity pair reported to the completion sink
    pub fn integration_key(&self) -> IntegratedBeneficiary {
        IntegratedBeneficiary {
            person_id: self.person_id.clone(),
            card_number: self.card_number.clone().unwrap_or_default(),
        }
    }
}

/// Builder for [`BeneficiaryRecord`]
#[derive(Debug, Clone)]
pub struct BeneficiaryRecordBuilder {
    record: BeneficiaryRecord,
}

impl BeneficiaryRecordBuilder {
    /// Creates a builder with the mandatory identity fields
    pub fn new(person_id: impl Into<String>, operation: &str) -> Self {
        Self {
            record: BeneficiaryRecord {
                person_id: PersonId::new(person_id),
                name: None,
                birth_date: None,
                sex: None,
                marital_status: None,
                health_card: None,
                card_issuer: None,
                card_number: None,
                card_holder_name: None,
                card_expiry: None,
                plan_name: None,
                operation: OperationMarker::parse(operation),
                termination_date: None,
            },
        }
    }

    /// Sets the full name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = Some(name.into());
        self
    }

    /// Sets the birth date
    pub fn birth_date(mut self, date: impl Into<FieldDate>) -> Self {
        self.record.birth_date = Some(date.into());
        self
    }

    /// Sets the sex code
    pub fn sex(mut self, sex: impl Into<String>) -> Self {
        self.record.sex = Some(sex.into());
        self
    }

    /// Sets the marital status code
    pub fn marital_status(mut self, status: impl Into<String>) -> Self {
        self.record.marital_status = Some(status.into());
        self
    }

    /// Sets the national health card number
    pub fn health_card(mut self, cns: impl Into<String>) -> Self {
        self.record.health_card = Some(cns.into());
        self
    }

    /// Sets the card issuer identifier
    pub fn card_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.record.card_issuer = Some(issuer.into());
        self
    }

    /// Sets the card number
    pub fn card_number(mut self, card: impl Into<String>) -> Self {
        self.record.card_number = Some(card.into());
        self
    }

    /// Sets the card holder name
    pub fn card_holder_name(mut self, name: impl Into<String>) -> Self {
        self.record.card_holder_name = Some(name.into());
        self
    }

    /// Sets the card expiry date
    pub fn card_expiry(mut self, date: impl Into<FieldDate>) -> Self {
        self.record.card_expiry = Some(date.into());
        self
    }

    /// Sets the plan name
    pub fn plan_name(mut self, plan: impl Into<String>) -> Self {
        self.record.plan_name = Some(plan.into());
        self
    }

    /// Sets the termination date
    pub fn termination_date(mut self, date: impl Into<FieldDate>) -> Self {
        self.record.termination_date = Some(date.into());
        self
    }

    /// Finishes the record
    pub fn build(self) -> BeneficiaryRecord {
        self.record
    }
}

/// Identity of a record that was accepted by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegratedBeneficiary {
    /// Person identifier, raw as stored
    pub person_id: PersonId,
    /// Card number, empty when the record had none
    pub card_number: String,
}

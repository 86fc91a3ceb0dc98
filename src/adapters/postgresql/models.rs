//! PostgreSQL row models
//!
//! This module maps rows of the `beneficiary_sync` table to domain records.

use crate::domain::{BeneficiaryRecord, FieldDate, OperationMarker, PersonId, Result, SyncError};
use chrono::{NaiveDate, NaiveDateTime};
use tokio_postgres::Row;

/// Query returning every pending beneficiary in queue order
pub const PENDING_QUERY: &str = "SELECT cpf, nome, nascimento, genero, estado_civil, cns, \
     operadora, carteira, nome_cartao, validade, plano, tipo_operacao, dt_rescisao \
     FROM beneficiary_sync \
     WHERE integrated_at IS NULL \
     ORDER BY id";

/// Statement marking a batch of `(cpf, carteira)` pairs as integrated
pub const MARK_COMPLETE_STATEMENT: &str = "UPDATE beneficiary_sync AS b \
     SET integration_status = $1, integrated_at = now() \
     FROM UNNEST($2::text[], $3::text[]) AS done(cpf, carteira) \
     WHERE b.cpf = done.cpf \
       AND COALESCE(b.carteira, '') = done.carteira \
       AND b.integrated_at IS NULL";

/// Statement appending one integration event
pub const INSERT_EVENT_STATEMENT: &str =
    "INSERT INTO integration_log (cpf, carteira, level, message) VALUES ($1, $2, $3, $4)";

/// Statement appending one job status transition
pub const INSERT_RUN_STATUS_STATEMENT: &str = "INSERT INTO job_status \
     (job_name, state, message, started_at, finished_at) VALUES ($1, $2, $3, $4, $5)";

/// A row of the pending queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBeneficiaryRow {
    pub cpf: String,
    pub nome: Option<String>,
    pub nascimento: Option<FieldDate>,
    pub genero: Option<String>,
    pub estado_civil: Option<String>,
    pub cns: Option<String>,
    pub operadora: Option<String>,
    pub carteira: Option<String>,
    pub nome_cartao: Option<String>,
    pub validade: Option<FieldDate>,
    pub plano: Option<String>,
    pub tipo_operacao: String,
    pub dt_rescisao: Option<FieldDate>,
}

impl PendingBeneficiaryRow {
    /// Reads a row returned by [`PENDING_QUERY`]
    ///
    /// Date columns may be declared as `DATE`, `TIMESTAMP` or text.
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            cpf: identifier_column(row, "cpf")?,
            nome: text_column(row, "nome")?,
            nascimento: date_column(row, "nascimento"),
            genero: text_column(row, "genero")?,
            estado_civil: text_column(row, "estado_civil")?,
            cns: text_column(row, "cns")?,
            operadora: text_column(row, "operadora")?,
            carteira: text_column(row, "carteira")?,
            nome_cartao: text_column(row, "nome_cartao")?,
            validade: date_column(row, "validade"),
            plano: text_column(row, "plano")?,
            tipo_operacao: text_column(row, "tipo_operacao")?.unwrap_or_default(),
            dt_rescisao: date_column(row, "dt_rescisao"),
        })
    }

    /// Converts the row into a domain record
    pub fn into_record(self) -> BeneficiaryRecord {
        BeneficiaryRecord {
            person_id: PersonId::new(self.cpf),
            name: self.nome,
            birth_date: self.nascimento,
            sex: self.genero,
            marital_status: self.estado_civil,
            health_card: self.cns,
            card_issuer: self.operadora,
            card_number: self.carteira,
            card_holder_name: self.nome_cartao,
            card_expiry: self.validade,
            plan_name: self.plano,
            operation: OperationMarker::parse(&self.tipo_operacao),
            termination_date: self.dt_rescisao,
        }
    }
}

fn identifier_column(row: &Row, name: &str) -> Result<String> {
    if let Ok(value) = row.try_get::<_, String>(name) {
        return Ok(value);
    }
    row.try_get::<_, i64>(name)
        .map(|value| value.to_string())
        .map_err(|e| SyncError::Database(format!("Failed to read column {name}: {e}")))
}

fn text_column(row: &Row, name: &str) -> Result<Option<String>> {
    row.try_get::<_, Option<String>>(name)
        .map_err(|e| SyncError::Database(format!("Failed to read column {name}: {e}")))
}

fn date_column(row: &Row, name: &str) -> Option<FieldDate> {
    if let Ok(value) = row.try_get::<_, Option<NaiveDate>>(name) {
        return value.map(FieldDate::Date);
    }
    if let Ok(value) = row.try_get::<_, Option<NaiveDateTime>>(name) {
        return value.map(FieldDate::DateTime);
    }
    row.try_get::<_, Option<String>>(name)
        .ok()
        .flatten()
        .map(FieldDate::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_record() {
        let row = PendingBeneficiaryRow {
            cpf: "123".to_string(),
            nome: Some("Maria Souza".to_string()),
            nascimento: Some(FieldDate::Date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())),
            carteira: Some("0228000100".to_string()),
            tipo_operacao: "U".to_string(),
            dt_rescisao: Some(FieldDate::Text("2024-01-31".to_string())),
            ..PendingBeneficiaryRow::default()
        };

        let record = row.into_record();

        assert_eq!(record.person_id, PersonId::new("123"));
        assert_eq!(record.operation, OperationMarker::Update);
        assert_eq!(record.card_number.as_deref(), Some("0228000100"));
        assert!(record.sex.is_none());
        assert_eq!(
            record.termination().and_then(FieldDate::to_date),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[test]
    fn test_unknown_marker_is_kept() {
        let row = PendingBeneficiaryRow {
            cpf: "1".to_string(),
            tipo_operacao: "D".to_string(),
            ..PendingBeneficiaryRow::default()
        };
        assert_eq!(
            row.into_record().operation,
            OperationMarker::Unrecognized("D".to_string())
        );
    }

    #[test]
    fn test_pending_query_filters_integrated_rows() {
        assert!(PENDING_QUERY.contains("integrated_at IS NULL"));
        assert!(PENDING_QUERY.ends_with("ORDER BY id"));
    }
}

//! Domain models and types for benesync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Beneficiary records** ([`BeneficiaryRecord`], [`FieldDate`], [`OperationMarker`])
//! - **Identifiers** ([`PersonId`])
//! - **Error types** ([`SyncError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Building a record
//!
//! ```rust
//! use benesync::domain::{BeneficiaryRecord, OperationMarker};
//! use chrono::NaiveDate;
//!
//! let record = BeneficiaryRecord::builder("123", "N")
//!     .name("Maria Souza")
//!     .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
//!     .card_number("0228000100")
//!     .build();
//!
//! assert_eq!(record.operation, OperationMarker::New);
//! ```

pub mod beneficiary;
pub mod errors;
pub mod ids;
pub mod result;

pub use beneficiary::{
    BeneficiaryRecord, BeneficiaryRecordBuilder, FieldDate, IntegratedBeneficiary,
    OperationMarker,
};
pub use errors::{ApiError, SyncError};
pub use ids::PersonId;
pub use result::Result;

//! PostgreSQL database integration
//!
//! This module provides the PostgreSQL-backed pending queue, completion
//! write-back, integration event log and job status table.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::PendingBeneficiaryRow;

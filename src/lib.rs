//! # benesync - beneficiary synchronization
//!
//! benesync reads pending health-plan beneficiary records from PostgreSQL and
//! pushes them to a healthcare-management REST API, one record at a time.
//!
//! ## Overview
//!
//! For every pending record the pipeline:
//! - **Classifies** the operation: new enrollment, update or inactivation
//! - **Normalizes** the record into the API payload
//! - **Submits** it with bounded retry, exponential backoff and a failure ledger
//! - **Interprets** the response and folds it into the run summary
//!
//! Integrated records are then marked as complete in the source database and
//! a summary is sent to operators.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sync pipeline (payload, classify, submit, outcome, sync)
//! - [`adapters`] - Collaborator traits and their PostgreSQL / notification implementations
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and outcome channels
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use benesync::adapters::notify::LogNotifier;
//! use benesync::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use benesync::config::load_config;
//! use benesync::core::sync::{SyncCollaborators, SyncOrchestrator};
//! use benesync::logging::FileOutcomeLog;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("benesync.toml")?;
//!
//!     let adapter = Arc::new(PostgreSQLAdapter::new(
//!         PostgreSQLClient::new(config.postgresql.clone()).await?,
//!     ));
//!     let collaborators = SyncCollaborators {
//!         source: adapter.clone(),
//!         completion: adapter.clone(),
//!         notifier: Arc::new(LogNotifier::new("api_integracao")),
//!         events: adapter,
//!         outcomes: Arc::new(FileOutcomeLog::new("logs")),
//!     };
//!
//!     let summary = SyncOrchestrator::new(&config, collaborators)?.run().await?;
//!     println!("{} records integrated", summary.integrated.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], backed by [`domain::SyncError`].
//! Per-record failures are recorded in the run summary instead of ending the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

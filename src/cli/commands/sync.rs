//! Sync command implementation
//!
//! This module implements the `sync` command, which runs one batch of the
//! beneficiary synchronization against the configured API.

use crate::adapters::notify::create_notifier;
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::adapters::traits::{RunState, RunStatusRecorder};
use crate::config::{load_config, SyncConfig};
use crate::core::sync::{RunSummary, SyncCollaborators, SyncOrchestrator};
use crate::logging::{init_logging, FileOutcomeLog, LoggingGuard};
use chrono::Local;
use clap::Args;
use std::sync::Arc;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Stop the batch on the first record that cannot be processed
    #[arg(long)]
    pub halt_on_error: bool,
}

impl SyncArgs {
    /// Execute the sync command
    ///
    /// File logging is initialized here, once the configuration is known.
    pub async fn execute(&self, config_path: &str, log_level: Option<&str>) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if self.halt_on_error {
            config.sync.halt_on_record_error = true;
        }

        let level = log_level.unwrap_or(config.application.log_level.as_str()).to_string();
        let _guard: LoggingGuard = match init_logging(&level, &config.logging) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Failed to initialize logging: {e}");
                return Ok(2);
            }
        };

        tracing::info!(config_path = %config_path, "Starting sync command");

        if !self.yes && !confirm(&config)? {
            println!("Sync cancelled.");
            return Ok(0);
        }

        let pg_client = match PostgreSQLClient::new(config.postgresql.clone()).await {
            Ok(client) => client,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create PostgreSQL client");
                eprintln!("Failed to initialize database connection: {e}");
                return Ok(4);
            }
        };
        if let Err(e) = pg_client.test_connection().await {
            crate::log_error_with_context!(&e, "PostgreSQL connection test failed");
            eprintln!("Failed to connect to PostgreSQL: {e}");
            return Ok(4);
        }
        if let Err(e) = pg_client.ensure_schema().await {
            crate::log_error_with_context!(&e, "Failed to initialize schema");
            eprintln!("Failed to initialize database schema: {e}");
            return Ok(4);
        }

        let adapter = Arc::new(PostgreSQLAdapter::new(pg_client));
        let notifier = create_notifier(&config.notification, &config.sync.job_name)?;
        let collaborators = SyncCollaborators {
            source: adapter.clone(),
            completion: adapter.clone(),
            notifier,
            events: adapter.clone(),
            outcomes: Arc::new(FileOutcomeLog::new(&config.logging.local_path)),
        };

        let job_name = config.sync.job_name.clone();
        let started_at = Local::now().naive_local();
        record_status(
            &*adapter,
            &job_name,
            RunState::Running,
            "sync started",
            started_at,
            None,
        )
        .await;

        let orchestrator = SyncOrchestrator::new(&config, collaborators)?;

        println!("🚀 Starting sync...");
        println!();

        let summary = match orchestrator.run().await {
            Ok(summary) => summary,
            Err(e) => {
                crate::log_error_with_context!(&e, "Sync failed");
                eprintln!("Sync failed: {e}");
                record_status(
                    &*adapter,
                    &job_name,
                    RunState::Failed,
                    &e.to_string(),
                    started_at,
                    Some(Local::now().naive_local()),
                )
                .await;
                return Ok(5);
            }
        };

        let (state, message) = if summary.aborted {
            (RunState::Failed, "batch aborted after record failure".to_string())
        } else {
            (RunState::Succeeded, status_message(&summary))
        };
        record_status(
            &*adapter,
            &job_name,
            state,
            &message,
            started_at,
            Some(Local::now().naive_local()),
        )
        .await;

        print_summary(&summary);
        Ok(exit_code(&summary))
    }
}

fn confirm(config: &SyncConfig) -> anyhow::Result<bool> {
    use std::io::{self, Write};

    println!("Sync Configuration:");
    println!("  API: {}", config.api.base_url);
    println!("  Contract: {}", config.api.contract_number);
    println!("  Max attempts: {}", config.api.retry.max_attempts);
    println!("  Halt on record error: {}", config.sync.halt_on_record_error);
    println!();
    print!("Proceed with sync? [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

async fn record_status(
    recorder: &dyn RunStatusRecorder,
    job_name: &str,
    state: RunState,
    message: &str,
    started_at: chrono::NaiveDateTime,
    finished_at: Option<chrono::NaiveDateTime>,
) {
    if let Err(e) = recorder
        .record_run_status(job_name, state, message, started_at, finished_at)
        .await
    {
        tracing::warn!(state = %state, error = %e, "Failed to record run status");
    }
}

fn status_message(summary: &RunSummary) -> String {
    format!(
        "new={} updated={} inactivated={} errors={}",
        summary.counters.new,
        summary.counters.updated,
        summary.counters.inactivated,
        summary.counters.errors
    )
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Sync Summary:");
    println!("  Pending records: {}", summary.total_records);
    println!("  New: {}", summary.counters.new);
    println!("  Updated: {}", summary.counters.updated);
    println!("  Inactivated: {}", summary.counters.inactivated);
    println!("  Errors: {}", summary.counters.errors);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.counters.failed_ids.is_empty() {
        println!("⚠️  Failed beneficiaries:");
        for id in summary.counters.failed_ids.iter().take(10) {
            println!("  - {id}");
        }
        if summary.counters.failed_ids.len() > 10 {
            println!(
                "  ... and {} more",
                summary.counters.failed_ids.len() - 10
            );
        }
        println!();
    }

    if summary.aborted {
        println!("⚠️  Sync aborted after a record failure");
    } else if summary.is_successful() {
        println!("✅ Sync completed successfully!");
    } else {
        println!("⚠️  Sync completed with errors");
    }
}

fn exit_code(summary: &RunSummary) -> i32 {
    if summary.aborted {
        5
    } else if summary.is_successful() {
        0
    } else {
        1
    }
}

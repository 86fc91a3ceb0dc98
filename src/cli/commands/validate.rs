//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the benesync configuration file.

use crate::config::load_config;
use crate::core::classify::ApiEndpoints;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        let endpoints = ApiEndpoints::from_base_url(&config.api.base_url);
        let database = config
            .postgresql
            .connection_string
            .expose_secret()
            .as_str()
            .rsplit('@')
            .next()
            .unwrap_or("***")
            .to_string();

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Create endpoint: {}", endpoints.create_url);
        println!("  Inactivation endpoint: {}", endpoints.inactivate_url);
        println!("  Contract: {}", config.api.contract_number);
        println!(
            "  Retries: {} attempts, backoff cap {} units of {} ms",
            config.api.retry.max_attempts,
            config.api.retry.max_backoff_units,
            config.api.retry.time_unit_ms
        );
        println!("  PostgreSQL: {database}");
        println!("  Job: {}", config.sync.job_name);
        println!(
            "  Halt on record error: {}",
            config.sync.halt_on_record_error
        );
        println!(
            "  Summary webhook: {}",
            config
                .notification
                .webhook_url
                .as_deref()
                .unwrap_or("none (log only)")
        );
        println!(
            "  Failure ledger: {}",
            config.logging.ledger_path().display()
        );
        println!();
        Ok(0)
    }
}

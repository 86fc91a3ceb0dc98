//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "benesync.toml")]
    pub output: String,

    /// Include every option with its default value and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing benesync configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - BENESYNC_API_TOKEN");
                println!("     - BENESYNC_POSTGRESQL_CONNECTION_STRING");
                println!("  3. Validate configuration: benesync validate-config");
                println!("  4. Run a sync: benesync sync --yes");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# benesync configuration

[api]
base_url = "https://api.example.com"
token = "${BENESYNC_API_TOKEN}"

[postgresql]
connection_string = "${BENESYNC_POSTGRESQL_CONNECTION_STRING}"
"#
        .to_string()
    }

    /// Generate configuration with every option documented
    fn generate_config_with_examples() -> String {
        r#"# benesync configuration
#
# Values of the form ${VAR} are read from the environment (or .env).
# Any key can also be overridden with BENESYNC_<SECTION>_<KEY>.

[application]
# trace, debug, info, warn, error
log_level = "info"

[api]
# Base URL of the healthcare-management API
base_url = "https://api.example.com"
# Sent verbatim in the Authorization header
token = "${BENESYNC_API_TOKEN}"
timeout_seconds = 60
# Contract every beneficiary is shared with
contract_number = "0228-000001"
tls_verify = true

[api.retry]
# Attempts per record, first one included (1-10)
max_attempts = 3
# Backoff after attempt n is min(max_backoff_units, 2^n + jitter)
max_backoff_units = 60.0
# Throttle pause after every successful call
pause_after_success_units = 0.1
# Length of one unit
time_unit_ms = 1000

[postgresql]
connection_string = "${BENESYNC_POSTGRESQL_CONNECTION_STRING}"
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 60
# disable, prefer, require
ssl_mode = "prefer"

[sync]
# Job name recorded in job_status
job_name = "api_integracao"
# Status written to integrated records
completion_status = "Sucesso"
# Progress line on the first record and every N records
progress_interval = 100
# Stop the batch on the first record that cannot be processed
halt_on_record_error = false

[notification]
# Run summary webhook; the summary is only logged when unset
# webhook_url = "https://hooks.example.com/benesync"
# webhook_token = "${BENESYNC_NOTIFICATION_WEBHOOK_TOKEN}"

[logging]
local_enabled = true
# Directory for integration.log, success.log, errors.log and the failure ledger
local_path = "logs"
# daily, hourly, never
local_rotation = "never"
ledger_file = "falhas.csv"
"#
        .to_string()
    }
}

use benesync::cli::{Cli, Commands};
use benesync::config::LoggingConfig;
use benesync::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The sync command sets up file logging itself once its config is loaded
    let guard = if matches!(cli.command, Commands::Sync(_)) {
        None
    } else {
        let log_level = cli.log_level.as_deref().unwrap_or("info");
        let logging_config = LoggingConfig {
            local_enabled: false,
            ..LoggingConfig::default()
        };
        match init_logging(log_level, &logging_config) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Failed to initialize logging: {e}");
                process::exit(2);
            }
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "benesync - beneficiary synchronization"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Sync(args) => args.execute(&cli.config, cli.log_level.as_deref()).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}

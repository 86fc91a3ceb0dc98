//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for benesync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// benesync - beneficiary synchronization to the healthcare-management API
#[derive(Parser, Debug)]
#[command(name = "benesync")]
#[command(version, about, long_about = None)]
#[command(author = "Benesync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "benesync.toml", env = "BENESYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BENESYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize pending beneficiaries with the API
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

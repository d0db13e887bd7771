//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations. Every
//! command except `completions` needs a storage session; the session is
//! created once here and handed to the command as a `&dyn ObjectStore`.

use clap::{Parser, Subcommand};
use gst_core::{Config, ObjectStore};
use gst_gcs::GcsClient;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod buckets;
mod check;
mod completions;
mod delete;
mod list;
mod stat;
mod upload;

#[cfg(test)]
mod testing;

/// gstasher - Google Cloud Storage File Manager
///
/// Works with the bucket named by the GOOGLE_CLOUD_STORAGE_BUCKET environment
/// variable, authenticating with the service account key in creds.json.
#[derive(Parser, Debug)]
#[command(name = "gstasher")]
#[command(version, about = "Google Cloud Storage File Manager", long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List files in bucket
    #[command(visible_aliases = ["l", "ls"])]
    List,

    /// Upload files to bucket
    #[command(visible_aliases = ["u", "up"], arg_required_else_help = true)]
    Upload(upload::UploadArgs),

    /// Delete files from bucket
    #[command(visible_aliases = ["d", "del"], arg_required_else_help = true)]
    Delete(delete::DeleteArgs),

    /// Show file metadata
    #[command(visible_alias = "st", arg_required_else_help = true)]
    Stat(stat::StatArgs),

    /// List buckets in the project
    #[command(visible_alias = "lb")]
    Buckets,

    /// Check that the configured bucket exists
    #[command(visible_alias = "exists")]
    Check,

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// A batch item that could not be processed (JSON output)
#[derive(Debug, Serialize)]
struct Failure {
    key: String,
    error: String,
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    });

    if let Commands::Completions(args) = cli.command {
        return completions::execute(args);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let client = match GcsClient::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            formatter.error(&format!("Failed to create storage client: {e}"));
            return ExitCode::GeneralError;
        }
    };

    run(cli.command, &client, &config, &formatter).await
}

/// Dispatch a parsed command against an established session
pub async fn run(
    command: Commands,
    store: &dyn ObjectStore,
    config: &Config,
    formatter: &Formatter,
) -> ExitCode {
    tracing::debug!(?command, bucket = %config.bucket, "running command");

    match command {
        Commands::List => list::execute(store, formatter).await,
        Commands::Upload(args) => upload::execute(args, store, formatter).await,
        Commands::Delete(args) => delete::execute(args, store, formatter).await,
        Commands::Stat(args) => stat::execute(args, store, formatter).await,
        Commands::Buckets => buckets::execute(store, formatter).await,
        Commands::Check => check::execute(store, &config.bucket, formatter).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

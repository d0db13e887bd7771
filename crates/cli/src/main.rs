//! gstasher - Google Cloud Storage file manager
//!
//! Lists, uploads, deletes and inspects objects in the bucket named by
//! `GOOGLE_CLOUD_STORAGE_BUCKET`.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gstasher::commands::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only command results
    let filter = if cli.debug {
        EnvFilter::new("gstasher=debug,gst_core=debug,gst_gcs=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}

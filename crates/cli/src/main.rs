//! cosctl - command-line client for Tencent COS buckets
//!
//! Lists, inspects, uploads, downloads and deletes objects in buckets
//! configured as named profiles.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cos_cli::commands::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
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

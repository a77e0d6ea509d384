mod cli;
mod client;
mod config;
mod errors;
mod gateway;
mod models;
mod normalize;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr; stdout carries the JSON output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Starting jobtracker v{}", env!("CARGO_PKG_VERSION"));

    match cli::run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            for line in cli::error_lines(&err) {
                eprintln!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

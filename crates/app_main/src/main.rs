//! DataShelf - organize uploaded files into named directories
//!
//! Main entry point.

mod app;
mod cli;

use anyhow::Result;
use app_core::{AppConfig, AppError};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Logging is best effort; the shell still works without it
    let _log_guard = match app_log::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging unavailable: {}", e);
            None
        }
    };

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: cli::Cli) -> Result<()> {
    tracing::info!("DataShelf starting...");

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable configuration: {}", e);
            AppConfig::default()
        }),
    };

    if let Err(e) = app_log::cleanup_old_logs(&app_log::log_dir(), config.general.log_retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    app::run(&config, cli.action)
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<AppError>() {
        Some(e) if e.is_fatal() => {
            tracing::error!("Fatal: {}", e);
            eprintln!("Fatal error: {}", e.user_message());
        }
        Some(e) => {
            tracing::warn!("{}", e);
            eprintln!("Error: {}", e.user_message());
        }
        None => {
            tracing::error!("{:#}", error);
            eprintln!("Error: {:#}", error);
        }
    }
}

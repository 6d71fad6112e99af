//! CLI setup module
//!
//! Handles logging and initialization of the AgentDeck core for CLI usage.

use std::path::PathBuf;

use agentdeck_core::{AppConfig, AppCore, paths};
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Install the file logger. Keep the returned guard alive until exit.
pub fn init_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = paths::log_dir()?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "agentdeck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    Ok(guard)
}

/// Config file settings with command-line flags applied on top.
pub fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::load();
    if let Some(path) = &cli.db_path {
        config.db_path = Some(PathBuf::from(path));
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    config
}

/// Build the embedded AgentDeck core
pub async fn prepare_core(config: AppConfig) -> Result<AppCore> {
    AppCore::new(config).await
}

//! Path utilities for AgentDeck directory resolution.
//!
//! This is the canonical source for shared path functions. Re-exported by
//! agentdeck-core for convenience.

use anyhow::Result;
use std::path::PathBuf;

const AGENTDECK_DIR: &str = ".agentdeck";
const DATABASE_FILE: &str = "agentdeck.db";
const LOGS_DIR: &str = "logs";

/// Environment variable to override the AgentDeck directory.
pub const AGENTDECK_DIR_ENV: &str = "AGENTDECK_DIR";

/// Resolve the AgentDeck data directory.
/// Priority: AGENTDECK_DIR env var > ~/.agentdeck/
pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(AGENTDECK_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(AGENTDECK_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the AgentDeck directory exists and return its path.
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = resolve_data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the database path: ~/.agentdeck/agentdeck.db
pub fn database_path() -> Result<PathBuf> {
    Ok(ensure_data_dir()?.join(DATABASE_FILE))
}

/// Get the log directory: ~/.agentdeck/logs
pub fn log_dir() -> Result<PathBuf> {
    let dir = ensure_data_dir()?.join(LOGS_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the config file path: <config dir>/agentdeck/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("agentdeck").join("config.toml"))
}

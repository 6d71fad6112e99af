//! Application configuration loaded from `config.toml`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which persistence adapter backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Whole collection under one key.
    #[default]
    Snapshot,
    /// One row per resource.
    Table,
    /// Volatile, nothing survives the process.
    Memory,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Snapshot => "snapshot",
            BackendKind::Table => "table",
            BackendKind::Memory => "memory",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snapshot" => Ok(BackendKind::Snapshot),
            "table" => Ok(BackendKind::Table),
            "memory" => Ok(BackendKind::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown backend `{0}`; expected snapshot|table|memory")]
    UnknownBackend(String),

    #[error("notification_ttl_ms must be greater than 0")]
    ZeroNotificationTtl,

    #[error("adapter_timeout_ms must be greater than 0 when set")]
    ZeroAdapterTimeout,
}

fn default_notification_ttl_ms() -> u64 {
    3_000
}

fn default_cache_snapshot() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Database file; `<data dir>/agentdeck.db` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_timeout_ms: Option<u64>,
    /// Mirror a table backend into the snapshot cache for load fallback.
    #[serde(default = "default_cache_snapshot")]
    pub cache_snapshot: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            db_path: None,
            notification_ttl_ms: default_notification_ttl_ms(),
            adapter_timeout_ms: None,
            cache_snapshot: default_cache_snapshot(),
        }
    }
}

impl AppConfig {
    /// Load from the default config path, falling back to defaults.
    pub fn load() -> Self {
        match crate::paths::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Self::default(),
        }
    }

    /// A missing or unparsable file yields defaults.
    pub fn load_from_path(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid config file, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notification_ttl_ms == 0 {
            return Err(ConfigError::ZeroNotificationTtl);
        }
        if self.adapter_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroAdapterTimeout);
        }
        Ok(())
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn adapter_timeout(&self) -> Option<Duration> {
        self.adapter_timeout_ms.map(Duration::from_millis)
    }

    /// Configured database path, or the default under the data directory.
    pub fn resolve_db_path(&self) -> anyhow::Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => crate::paths::database_path(),
        }
    }
}

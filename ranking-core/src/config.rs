//! Configuration for the leaderboard store.
//!
//! Maps onto the `[persistence]` and `[leaderboard]` tables of `ranking.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ranking::DEFAULT_PAGE_SIZE;

/// Store-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Where and how the leaderboard is persisted.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Display-time ranking settings.
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

impl RankingConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `RankingError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::RankingError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Which persistence backend holds the leaderboard document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// A single JSON file, rewritten on every save.
    #[default]
    Json,
    /// A single row in an SQLite key/value table.
    Sqlite,
    /// Process-local only; nothing survives a restart.
    Memory,
}

/// Persistence / save configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Backend: "json", "sqlite" or "memory".
    #[serde(default)]
    pub backend: BackendKind,
    /// File holding the leaderboard (JSON document or SQLite database).
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Use WAL mode (SQLite only).
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// Detect save corruption via checksums (SQLite only).
    #[serde(default = "default_true")]
    pub checksum_enabled: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Json,
            path: default_path(),
            wal_mode: true,
            checksum_enabled: true,
        }
    }
}

/// Ranking and pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Maximum entries per rendered page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_path() -> PathBuf { PathBuf::from("leaderboard.json") }
fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }

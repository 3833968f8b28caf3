//! Error types for the ranking core library.

use thiserror::Error;

/// Top-level error type for all leaderboard storage operations.
///
/// Business outcomes such as "member not found" or "insufficient balance" are
/// not errors; they are returned as typed values by the callers. This type
/// only covers failures of the storage and configuration machinery.
#[derive(Error, Debug)]
pub enum RankingError {
    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RankingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, RankingError>;

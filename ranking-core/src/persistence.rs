//! Persistence backends for the leaderboard document.
//!
//! The leaderboard is a single record under a fixed name. Every save rewrites
//! the whole document; there are no partial or delta writes. A backend that
//! has never been written to loads as the empty leaderboard.
//!
//! Three backends are provided:
//! - [`JsonFileBackend`]: the document as a flat JSON file (the default).
//! - [`SqliteBackend`]: the same JSON stored in one row of a key/value
//!   table, with an optional CRC-32 checksum.
//! - [`MemoryBackend`]: process-local, for tests and dry runs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::config::{BackendKind, PersistenceConfig};
use crate::error::Result;
use crate::leaderboard::Leaderboard;

/// Key of the single record holding the leaderboard.
pub const RECORD_KEY: &str = "leaderboard";

/// Durable home of the leaderboard document.
pub trait LeaderboardBackend: Send + Sync {
    /// Read the stored document. Absent state is the empty leaderboard.
    ///
    /// # Errors
    /// Returns an error if the state exists but cannot be read or decoded.
    fn load(&self) -> Result<Leaderboard>;

    /// Overwrite the stored document with `leaderboard`.
    ///
    /// # Errors
    /// Returns an error if the document cannot be encoded or written.
    fn save(&self, leaderboard: &Leaderboard) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Open the backend selected by `config`.
///
/// # Errors
/// Returns an error if the SQLite database cannot be opened.
pub fn open_backend(config: &PersistenceConfig) -> Result<Box<dyn LeaderboardBackend>> {
    let backend: Box<dyn LeaderboardBackend> = match config.backend {
        BackendKind::Json => Box::new(JsonFileBackend::new(&config.path)),
        BackendKind::Sqlite => Box::new(SqliteBackend::open(&config.path, config)?),
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    info!(
        backend = ?config.backend,
        location = %backend.location(),
        "Leaderboard backend opened"
    );
    Ok(backend)
}

// ---------------------------------------------------------------------------
// CRC-32 checksum helper
// ---------------------------------------------------------------------------

/// CRC-32 of `data` as a lowercase hex string.
fn crc32_hex(data: &[u8]) -> String {
    format!("{:08x}", crc32_compute(data))
}

/// Basic CRC-32 (ISO 3309 / ITU-T V.42) computation.
fn crc32_compute(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            if crc & 1 == 1 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// The leaderboard as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Back the leaderboard with the file at `path`. The file need not exist.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the document is staged in before replacing the original.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LeaderboardBackend for JsonFileBackend {
    fn load(&self) -> Result<Leaderboard> {
        let start = Instant::now();
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No leaderboard file yet, starting empty");
                return Ok(Leaderboard::new());
            }
            Err(e) => return Err(e.into()),
        };

        let leaderboard: Leaderboard = serde_json::from_slice(&bytes)?;
        debug!(
            path = %self.path.display(),
            members = leaderboard.len(),
            bytes = bytes.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded leaderboard"
        );
        Ok(leaderboard)
    }

    fn save(&self, leaderboard: &Leaderboard) -> Result<()> {
        let start = Instant::now();
        let json = serde_json::to_vec(leaderboard)?;

        let staging = self.staging_path();
        std::fs::write(&staging, &json)?;
        std::fs::rename(&staging, &self.path)?;

        debug!(
            path = %self.path.display(),
            members = leaderboard.len(),
            bytes = json.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved leaderboard"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS records (
    key        TEXT PRIMARY KEY,
    data       BLOB NOT NULL,
    updated_at TEXT NOT NULL,
    checksum   TEXT
);";

/// The leaderboard document as one row of an SQLite key/value table.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS records (
///     key        TEXT PRIMARY KEY,
///     data       BLOB NOT NULL,
///     updated_at TEXT NOT NULL,
///     checksum   TEXT
/// );
/// ```
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    checksum_enabled: bool,
    db_path: PathBuf,
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("db_path", &self.db_path)
            .field("checksum_enabled", &self.checksum_enabled)
            .finish_non_exhaustive()
    }
}

impl SqliteBackend {
    /// Open (or create) an SQLite database at `path`.
    ///
    /// # Errors
    /// Returns [`RankingError::Database`](crate::RankingError::Database) on
    /// SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            checksum_enabled: config.checksum_enabled,
            db_path,
        })
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    /// Returns [`RankingError::Database`](crate::RankingError::Database) on
    /// SQLite failures.
    pub fn open_in_memory(config: &PersistenceConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            checksum_enabled: config.checksum_enabled,
            db_path: PathBuf::from(":memory:"),
        })
    }
}

impl LeaderboardBackend for SqliteBackend {
    fn load(&self) -> Result<Leaderboard> {
        let start = Instant::now();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT data, checksum FROM records WHERE key = ?1")?;

        let row: Option<(Vec<u8>, Option<String>)> = match stmt
            .query_row(params![RECORD_KEY], |row| Ok((row.get(0)?, row.get(1)?)))
        {
            Ok(row) => Some(row),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let Some((data, stored_checksum)) = row else {
            return Ok(Leaderboard::new());
        };

        if self.checksum_enabled {
            if let Some(expected) = stored_checksum {
                let actual = crc32_hex(&data);
                if expected != actual {
                    warn!(
                        expected = %expected,
                        actual = %actual,
                        "Checksum mismatch, possible save corruption"
                    );
                }
            }
        }

        let leaderboard: Leaderboard = serde_json::from_slice(&data)?;
        debug!(
            members = leaderboard.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded leaderboard"
        );
        Ok(leaderboard)
    }

    fn save(&self, leaderboard: &Leaderboard) -> Result<()> {
        let start = Instant::now();
        let json = serde_json::to_vec(leaderboard)?;
        let checksum = self.checksum_enabled.then(|| crc32_hex(&json));
        let now = Utc::now().to_rfc3339();

        self.conn.lock().execute(
            "INSERT INTO records (key, data, updated_at, checksum)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                checksum = excluded.checksum",
            params![RECORD_KEY, json, now, checksum],
        )?;

        debug!(
            members = leaderboard.len(),
            bytes = json.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved leaderboard"
        );
        Ok(())
    }

    fn location(&self) -> String {
        format!("sqlite://{}", self.db_path.display())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local backend. The document still goes through JSON so that it
/// behaves like the durable backends.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: Mutex<Option<Vec<u8>>>,
}

impl MemoryBackend {
    /// Create a backend with no stored state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardBackend for MemoryBackend {
    fn load(&self) -> Result<Leaderboard> {
        match self.document.lock().as_deref() {
            Some(bytes) => Ok(serde_json::from_slice(bytes)?),
            None => Ok(Leaderboard::new()),
        }
    }

    fn save(&self, leaderboard: &Leaderboard) -> Result<()> {
        let json = serde_json::to_vec(leaderboard)?;
        *self.document.lock() = Some(json);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

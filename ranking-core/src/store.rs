//! The leaderboard store: a persistence backend plus serialized
//! read-modify-write.
//!
//! Every command loads a fresh snapshot, transforms it and writes it back.
//! [`LeaderboardStore::transaction`] runs that whole cycle under one lock so
//! two concurrent commands cannot lose each other's update. The lock is only
//! held for local synchronous work and must never be held across an `.await`.

use parking_lot::Mutex;
use tracing::debug;

use crate::config::PersistenceConfig;
use crate::error::Result;
use crate::leaderboard::Leaderboard;
use crate::persistence::{open_backend, LeaderboardBackend, MemoryBackend};

/// Handle to the durable leaderboard, passed explicitly to every handler.
pub struct LeaderboardStore {
    backend: Box<dyn LeaderboardBackend>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for LeaderboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardStore")
            .field("location", &self.backend.location())
            .finish_non_exhaustive()
    }
}

impl LeaderboardStore {
    /// Wrap an already opened backend.
    #[must_use]
    pub fn new(backend: Box<dyn LeaderboardBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Open the backend described by `config`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be opened.
    pub fn open(config: &PersistenceConfig) -> Result<Self> {
        Ok(Self::new(open_backend(config)?))
    }

    /// A store that lives only in this process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Where the leaderboard lives, for logs.
    #[must_use]
    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Load a fresh snapshot. Missing state is the empty leaderboard.
    ///
    /// # Errors
    /// Returns an error if stored state exists but cannot be read.
    pub fn load(&self) -> Result<Leaderboard> {
        self.backend.load()
    }

    /// Overwrite the stored leaderboard.
    ///
    /// # Errors
    /// Returns an error if the document cannot be written.
    pub fn save(&self, leaderboard: &Leaderboard) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.backend.save(leaderboard)
    }

    /// Load, apply `f`, and always save.
    ///
    /// # Errors
    /// Returns an error if loading or saving fails.
    pub fn update<T>(&self, f: impl FnOnce(&mut Leaderboard) -> T) -> Result<T> {
        let _guard = self.write_lock.lock();
        let mut leaderboard = self.backend.load()?;
        let value = f(&mut leaderboard);
        self.backend.save(&leaderboard)?;
        Ok(value)
    }

    /// Load, apply `f`, and save if `f` accepted the change.
    ///
    /// The outer `Result` reports storage failures; the inner one is whatever
    /// `f` decided. An `Err` from `f` leaves durable state untouched.
    ///
    /// # Errors
    /// Returns an error if loading or saving fails.
    pub fn transaction<T, E>(
        &self,
        f: impl FnOnce(&mut Leaderboard) -> std::result::Result<T, E>,
    ) -> Result<std::result::Result<T, E>> {
        let _guard = self.write_lock.lock();
        let mut leaderboard = self.backend.load()?;

        match f(&mut leaderboard) {
            Ok(value) => {
                self.backend.save(&leaderboard)?;
                Ok(Ok(value))
            }
            Err(rejection) => {
                debug!("Transaction rejected, leaderboard left unchanged");
                Ok(Err(rejection))
            }
        }
    }
}

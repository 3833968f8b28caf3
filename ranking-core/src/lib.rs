//! # Ranking Core Library
//!
//! Platform-agnostic points leaderboard for community members.
//!
//! A [`Leaderboard`] maps member ids to [`ScoreRecord`]s. It is loaded fresh
//! for every command, transformed in memory, and written back in full:
//!
//! - **Add**: grant points, creating the record on first sight
//! - **Subtract**: take points, never below zero
//! - **Set**: administrative overwrite, any value
//! - **Reset**: wipe the whole board
//!
//! [`LeaderboardStore`] owns the persistence backend (JSON file, SQLite, or
//! memory) and serializes load → mutate → save so concurrent commands do not
//! lose updates. [`ranking`] orders and paginates the board at display time.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod ranking;
pub mod store;
pub mod types;

pub use config::RankingConfig;
pub use error::RankingError;
pub use leaderboard::Leaderboard;
pub use store::LeaderboardStore;
pub use types::*;

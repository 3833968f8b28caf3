//! The in-memory leaderboard snapshot and its transformations.
//!
//! A [`Leaderboard`] is loaded fresh for every command, transformed by one of
//! the operations below, and written back in full. None of these operations
//! touch durable storage; that is the job of
//! [`LeaderboardStore`](crate::store::LeaderboardStore).
//!
//! Floors are applied only where points leave a member (`upsert_subtract`).
//! Additions and administrative overwrites pass values through unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{MemberId, ScoreRecord};

/// Mapping of member ids to score records, in insertion order.
///
/// Serializes as a bare JSON object:
///
/// ```json
/// { "1234": { "name": "alice", "points": 10 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    records: IndexMap<MemberId, ScoreRecord>,
}

impl Leaderboard {
    /// Create an empty leaderboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no member has a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a member's record.
    ///
    /// `None` means the member was never recorded, which is distinct from a
    /// recorded zero.
    #[must_use]
    pub fn get_score(&self, member: &MemberId) -> Option<&ScoreRecord> {
        self.records.get(member)
    }

    /// Convenience accessor for a member's points.
    #[must_use]
    pub fn points(&self, member: &MemberId) -> Option<i64> {
        self.records.get(member).map(|r| r.points)
    }

    /// Add `delta` to a member, creating the record if absent.
    ///
    /// An existing record keeps its stored name. No floor is applied.
    /// Returns the new total.
    pub fn upsert_add(&mut self, member: &MemberId, display_name: &str, delta: i64) -> i64 {
        let record = self
            .records
            .entry(member.clone())
            .and_modify(|r| r.points = r.points.saturating_add(delta))
            .or_insert_with(|| ScoreRecord::new(display_name, delta));
        record.points
    }

    /// Subtract `delta` from an existing member, flooring at zero.
    ///
    /// Returns `false` without touching anything if the member has no record.
    pub fn upsert_subtract(&mut self, member: &MemberId, delta: i64) -> bool {
        let Some(record) = self.records.get_mut(member) else {
            return false;
        };
        record.points = record.points.saturating_sub(delta).max(0);
        true
    }

    /// Overwrite a member's record unconditionally. Negative values are kept.
    pub fn set_score(&mut self, member: &MemberId, display_name: &str, points: i64) {
        self.records
            .insert(member.clone(), ScoreRecord::new(display_name, points));
    }

    /// Replace the whole mapping with the empty mapping.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Sum of all recorded points.
    #[must_use]
    pub fn total_points(&self) -> i64 {
        self.records
            .values()
            .fold(0_i64, |acc, r| acc.saturating_add(r.points))
    }

    /// Iterate records in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &ScoreRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(MemberId, ScoreRecord)> for Leaderboard {
    fn from_iter<I: IntoIterator<Item = (MemberId, ScoreRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

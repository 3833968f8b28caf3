//! Display-time ordering and pagination of a leaderboard.
//!
//! Nothing about order is stored; ranks are computed every time the board is
//! shown. Equal scores keep their mapping order (the sort is stable).

use crate::leaderboard::Leaderboard;
use crate::types::MemberId;

/// Default number of entries per rendered page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// One row of the ranked board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    /// 1-indexed global rank.
    pub rank: usize,
    /// Member the row belongs to.
    pub member: MemberId,
    /// Stored display name.
    pub name: String,
    /// Stored points.
    pub points: i64,
}

/// A contiguous slice of the ranked board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 0-based page index.
    pub index: usize,
    /// Total number of pages the board was split into.
    pub total: usize,
    /// Rows on this page, ranks already global.
    pub entries: Vec<RankedEntry>,
}

impl Page {
    /// 1-based page number for display.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Rank every record, highest points first.
#[must_use]
pub fn rank(leaderboard: &Leaderboard) -> Vec<RankedEntry> {
    let mut rows: Vec<_> = leaderboard.iter().collect();
    rows.sort_by(|(_, a), (_, b)| b.points.cmp(&a.points));

    rows.into_iter()
        .enumerate()
        .map(|(i, (member, record))| RankedEntry {
            rank: i + 1,
            member: member.clone(),
            name: record.name.clone(),
            points: record.points,
        })
        .collect()
}

/// Split ranked rows into pages of at most `page_size` entries.
///
/// An empty input yields no pages. A `page_size` of zero is treated as one.
#[must_use]
pub fn paginate(entries: Vec<RankedEntry>, page_size: usize) -> Vec<Page> {
    let page_size = page_size.max(1);
    let total = entries.len().div_ceil(page_size);

    let mut pages = Vec::with_capacity(total);
    let mut rows = entries.into_iter().peekable();
    let mut index = 0;
    while rows.peek().is_some() {
        let chunk: Vec<_> = rows.by_ref().take(page_size).collect();
        pages.push(Page {
            index,
            total,
            entries: chunk,
        });
        index += 1;
    }
    pages
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

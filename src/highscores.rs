//! High score leaderboard
//!
//! Ordered top-N score list. Storage is delegated to an injected
//! [`ScoreStore`](crate::persistence::ScoreStore); the leaderboard itself is
//! just the ordering/truncation policy.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// Default number of scores to keep
pub const MAX_LEADERBOARD_ENTRIES: usize = 5;

/// Descending list of the best final scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<u64>,
    max_entries: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::with_max(MAX_LEADERBOARD_ENTRIES)
    }

    pub fn with_max(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Build from persisted scores (re-sorted defensively)
    pub fn load_from(store: &dyn ScoreStore) -> Self {
        let mut board = Self::new();
        board.entries = store.load_top_scores();
        board.entries.sort_unstable_by(|a, b| b.cmp(a));
        board.entries.truncate(board.max_entries);
        board
    }

    /// Push the scores back out to storage
    pub fn save_to(&self, store: &mut dyn ScoreStore) {
        store.save_top_scores(&self.entries);
    }

    /// Scores, best first
    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    /// Best score so far (0 when empty)
    pub fn top(&self) -> u64 {
        self.entries.first().copied().unwrap_or(0)
    }

    /// True when `score` ties or beats the current best (and is non-zero)
    pub fn is_new_highscore(&self, score: u64) -> bool {
        score > 0 && score >= self.top()
    }

    /// Record a finished run: append, re-sort descending, truncate.
    pub fn record(&mut self, score: u64) {
        self.entries.push(score);
        self.entries.sort_unstable_by(|a, b| b.cmp(a));
        self.entries.truncate(self.max_entries);
    }
}

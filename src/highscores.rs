//! Leaderboard seam and a local top-N table
//!
//! The game hands `(nickname, score)` to a [`Leaderboard`] on every crash
//! and asks for the top entries when the menu opens. Results never flow
//! back into the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_SIZE;
use crate::error::LeaderboardError;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub nickname: String,
    pub score: u32,
}

/// A scoring service
pub trait Leaderboard: std::fmt::Debug {
    /// Submit a finished run. Returns the rank achieved (1-indexed), if any.
    fn submit(&mut self, nickname: &str, score: u32) -> Result<Option<usize>, LeaderboardError>;

    /// Best `n` entries, highest first
    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;
}

/// In-memory leaderboard keeping the best entries sorted descending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLeaderboard {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl Default for LocalLeaderboard {
    fn default() -> Self {
        Self::new(LEADERBOARD_SIZE)
    }
}

impl LocalLeaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 || self.capacity == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

impl Leaderboard for LocalLeaderboard {
    fn submit(&mut self, nickname: &str, score: u32) -> Result<Option<usize>, LeaderboardError> {
        if !self.qualifies(score) {
            return Ok(None);
        }

        let entry = ScoreEntry {
            nickname: nickname.to_string(),
            score,
        };

        // Ties keep the earlier entry ahead
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(self.capacity);

        Ok(Some(rank))
    }

    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

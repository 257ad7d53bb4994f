//! Score table and leaderboard pages
//!
//! Every finished session adds one row. Rows are kept sorted descending by
//! score; equal scores keep insertion order.

use serde::{Deserialize, Serialize};

/// A finished session's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub player_id: String,
    pub player_username: String,
    pub session_id: String,
    pub score: u64,
    pub wave: u32,
    pub duration_seconds: u32,
    /// Unix ms
    pub created_at: f64,
}

/// One line of a leaderboard page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-indexed position in the whole table
    pub rank: u32,
    pub player_id: String,
    pub player_username: String,
    pub score: u64,
    pub wave: u32,
    pub duration_seconds: u32,
    pub created_at: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub entries: Vec<LeaderboardEntry>,
    pub total_entries: usize,
    pub user_rank: Option<u32>,
    pub user_best_score: Option<u64>,
}

/// All score rows, highest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreTable {
    rows: Vec<ScoreRow>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row. Returns its 1-indexed position.
    pub fn insert(&mut self, row: ScoreRow) -> usize {
        // Find insertion point (sorted descending by score)
        match self.rows.iter().position(|r| row.score > r.score) {
            Some(i) => {
                self.rows.insert(i, row);
                i + 1
            }
            None => {
                self.rows.push(row);
                self.rows.len()
            }
        }
    }

    /// Rows `skip..skip + limit` with their table ranks
    pub fn page(&self, limit: usize, skip: usize) -> Vec<LeaderboardEntry> {
        self.rows
            .iter()
            .enumerate()
            .skip(skip)
            .take(limit)
            .map(|(i, row)| LeaderboardEntry {
                rank: (i + 1) as u32,
                player_id: row.player_id.clone(),
                player_username: row.player_username.clone(),
                score: row.score,
                wave: row.wave,
                duration_seconds: row.duration_seconds,
                created_at: row.created_at,
            })
            .collect()
    }

    /// The player's highest score, if they have one
    pub fn best_of(&self, player_id: &str) -> Option<u64> {
        // Sorted, so the first match is the best
        self.rows
            .iter()
            .find(|r| r.player_id == player_id)
            .map(|r| r.score)
    }

    /// 1 + number of rows strictly above the player's best
    pub fn rank_of(&self, player_id: &str) -> Option<u32> {
        let best = self.best_of(player_id)?;
        let higher = self.rows.iter().take_while(|r| r.score > best).count();
        Some(higher as u32 + 1)
    }

    /// Full page query including the caller's standing
    pub fn leaderboard(&self, limit: usize, skip: usize, player_id: Option<&str>) -> LeaderboardPage {
        LeaderboardPage {
            entries: self.page(limit, skip),
            total_entries: self.rows.len(),
            user_rank: player_id.and_then(|id| self.rank_of(id)),
            user_best_score: player_id.and_then(|id| self.best_of(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.rows.first().map(|r| r.score)
    }
}

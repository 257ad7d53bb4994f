//! Player, session, leaderboard and achievement services
//!
//! The game talks to these collaborators only through [`SessionService`] and
//! [`LeaderboardService`]. [`LocalBackend`] implements both on top of a
//! key-value store; [`SessionLink`] wraps a backend so that failures degrade
//! to offline play instead of reaching the simulation.

pub mod achievements;
pub mod leaderboard;
pub mod link;
pub mod local;

use serde::{Deserialize, Serialize};

use crate::platform::StorageError;
use crate::sim::FinalStats;

pub use achievements::{Achievement, AchievementCategory, AchievementStatus, Requirement};
pub use leaderboard::{LeaderboardEntry, LeaderboardPage, ScoreRow, ScoreTable};
pub use link::{Notice, SessionLink, StartError};
pub use local::LocalBackend;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service unavailable")]
    Unavailable,
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
    #[error("username must not be empty")]
    InvalidUsername,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A registered player with lifetime totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub username: String,
    /// Unix ms
    pub created_at: f64,
    pub last_played: Option<f64>,
    pub total_games: u32,
    pub total_score: u64,
    pub best_score: u64,
    pub best_wave: u32,
    /// Seconds of simulated play
    pub total_playtime: u64,
    pub total_enemies_destroyed: u64,
    pub total_asteroids_destroyed: u64,
    pub total_powerups_collected: u64,
}

impl Player {
    pub fn new(id: String, username: String, created_at: f64) -> Self {
        Self {
            id,
            username,
            created_at,
            last_played: None,
            total_games: 0,
            total_score: 0,
            best_score: 0,
            best_wave: 1,
            total_playtime: 0,
            total_enemies_destroyed: 0,
            total_asteroids_destroyed: 0,
            total_powerups_collected: 0,
        }
    }

    /// Fold one finished session into the lifetime totals
    pub fn record(&mut self, stats: &FinalStats, now: f64) {
        self.total_games += 1;
        self.total_score += stats.final_score;
        self.total_playtime += u64::from(stats.duration_seconds);
        self.total_enemies_destroyed += u64::from(stats.enemies_destroyed);
        self.total_asteroids_destroyed += u64::from(stats.asteroids_destroyed);
        self.total_powerups_collected += u64::from(stats.powerups_collected);
        self.best_score = self.best_score.max(stats.final_score);
        self.best_wave = self.best_wave.max(stats.max_wave);
        self.last_played = Some(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// One play-through as seen by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub player_id: String,
    pub player_username: String,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub status: SessionStatus,
    pub result: Option<FinalStats>,
}

/// Reply to [`SessionService::end_game`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndGameResult {
    pub success: bool,
    pub new_achievements: Vec<Achievement>,
    pub player_rank: Option<u32>,
}

/// Aggregated numbers for a player profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player: Player,
    pub total_games: u32,
    pub total_score: u64,
    pub best_score: u64,
    pub average_score: f64,
    pub total_playtime: u64,
    pub total_enemies_destroyed: u64,
    pub total_asteroids_destroyed: u64,
    pub total_powerups_collected: u64,
    pub best_wave: u32,
    pub achievements_unlocked: usize,
    pub total_achievements: usize,
    /// Most recent completed sessions, newest first
    pub recent_sessions: Vec<Session>,
}

/// Player identity and session bookkeeping
pub trait SessionService {
    /// Return the player with this username, registering it on first use
    fn create_or_get_player(&mut self, username: &str) -> Result<Player, ServiceError>;

    fn start_game(&mut self, player_id: &str, username: &str) -> Result<Session, ServiceError>;

    /// Close a session, record its score and unlock achievements
    fn end_game(
        &mut self,
        session_id: &str,
        stats: &FinalStats,
    ) -> Result<EndGameResult, ServiceError>;
}

/// Read-only queries for menus
pub trait LeaderboardService {
    fn get_leaderboard(
        &self,
        limit: usize,
        skip: usize,
        player_id: Option<&str>,
    ) -> Result<LeaderboardPage, ServiceError>;

    /// The full catalog; unlock state is filled in when `player_id` is given
    fn get_achievements(&self, player_id: Option<&str>)
    -> Result<Vec<AchievementStatus>, ServiceError>;

    fn get_player_stats(&self, player_id: &str) -> Result<PlayerStats, ServiceError>;
}

//! Local backend
//!
//! Players, sessions, scores and achievement unlocks kept as one JSON document
//! in a [`KvStore`]. Every mutation is written through immediately, and a
//! mutation the store refuses is not applied.

use serde::{Deserialize, Serialize};

use super::achievements::{self, AchievementStatus, CATALOG};
use super::leaderboard::{LeaderboardPage, ScoreRow, ScoreTable};
use super::{
    EndGameResult, LeaderboardService, Player, PlayerStats, ServiceError, Session,
    SessionService, SessionStatus,
};
use crate::platform::storage::{KvStore, read_json, write_json};
use crate::sim::FinalStats;

/// How many finished sessions a profile lists
pub const RECENT_SESSIONS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Unlock {
    player_id: String,
    achievement_id: String,
    session_id: String,
    unlocked_at: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    players: Vec<Player>,
    sessions: Vec<Session>,
    scores: ScoreTable,
    unlocks: Vec<Unlock>,
    next_id: u64,
}

impl Tables {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn player(&self, player_id: &str) -> Result<&Player, ServiceError> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or_else(|| ServiceError::NotFound {
                what: "player",
                id: player_id.to_string(),
            })
    }

    fn unlocked_at(&self, player_id: &str, achievement_id: &str) -> Option<f64> {
        self.unlocks
            .iter()
            .find(|u| u.player_id == player_id && u.achievement_id == achievement_id)
            .map(|u| u.unlocked_at)
    }
}

pub struct LocalBackend<S: KvStore> {
    store: S,
    tables: Tables,
    clock: fn() -> f64,
}

impl<S: KvStore> LocalBackend<S> {
    /// Storage key for the backend document
    pub const STORAGE_KEY: &'static str = "astro_blaster_backend";

    /// Open the backend, starting fresh when nothing usable is stored
    pub fn open(store: S) -> Self {
        Self::with_clock(store, crate::platform::now_ms)
    }

    /// Open with a custom millisecond clock (timestamps only)
    pub fn with_clock(store: S, clock: fn() -> f64) -> Self {
        let tables = match read_json::<Tables>(&store, Self::STORAGE_KEY) {
            Ok(Some(tables)) => {
                log::info!(
                    "Loaded {} players and {} scores",
                    tables.players.len(),
                    tables.scores.len()
                );
                tables
            }
            Ok(None) => Tables::default(),
            Err(e) => {
                log::warn!("Starting with an empty backend: {}", e);
                Tables::default()
            }
        };
        Self {
            store,
            tables,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Apply `change` to a copy of the tables. The copy replaces the live
    /// tables only once the store has accepted it.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Tables, f64) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut staged = self.tables.clone();
        let value = change(&mut staged, (self.clock)())?;
        write_json(&mut self.store, Self::STORAGE_KEY, &staged)?;
        self.tables = staged;
        Ok(value)
    }
}

impl<S: KvStore> SessionService for LocalBackend<S> {
    fn create_or_get_player(&mut self, username: &str) -> Result<Player, ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::InvalidUsername);
        }
        if let Some(player) = self.tables.players.iter().find(|p| p.username == username) {
            return Ok(player.clone());
        }

        let player = self.commit(|tables, now| {
            let id = tables.allocate_id("player");
            let player = Player::new(id, username.to_string(), now);
            tables.players.push(player.clone());
            Ok(player)
        })?;
        log::info!("Registered player {} ({})", player.username, player.id);
        Ok(player)
    }

    fn start_game(&mut self, player_id: &str, username: &str) -> Result<Session, ServiceError> {
        self.commit(|tables, now| {
            tables.player(player_id)?;
            let session = Session {
                id: tables.allocate_id("session"),
                player_id: player_id.to_string(),
                player_username: username.to_string(),
                start_time: now,
                end_time: None,
                status: SessionStatus::Active,
                result: None,
            };
            tables.sessions.push(session.clone());
            Ok(session)
        })
    }

    fn end_game(
        &mut self,
        session_id: &str,
        stats: &FinalStats,
    ) -> Result<EndGameResult, ServiceError> {
        let (player_id, new_achievements) = self.commit(|tables, now| {
            let index = tables
                .sessions
                .iter()
                .position(|s| s.id == session_id && s.status == SessionStatus::Active)
                .ok_or_else(|| ServiceError::NotFound {
                    what: "session",
                    id: session_id.to_string(),
                })?;
            let player_id = tables.sessions[index].player_id.clone();
            let mut player = tables.player(&player_id)?.clone();

            let session = &mut tables.sessions[index];
            session.status = SessionStatus::Completed;
            session.end_time = Some(now);
            session.result = Some(*stats);
            let username = session.player_username.clone();

            tables.scores.insert(ScoreRow {
                player_id: player_id.clone(),
                player_username: username,
                session_id: session_id.to_string(),
                score: stats.final_score,
                wave: stats.max_wave,
                duration_seconds: stats.duration_seconds,
                created_at: now,
            });

            player.record(stats, now);
            if let Some(stored) = tables.players.iter_mut().find(|p| p.id == player_id) {
                *stored = player.clone();
            }

            let new_achievements = achievements::newly_unlocked(&player, stats, |id| {
                tables.unlocked_at(&player_id, id).is_some()
            });
            for achievement in &new_achievements {
                tables.unlocks.push(Unlock {
                    player_id: player_id.clone(),
                    achievement_id: achievement.id.to_string(),
                    session_id: session_id.to_string(),
                    unlocked_at: now,
                });
            }
            Ok((player_id, new_achievements))
        })?;

        let player_rank = self.tables.scores.rank_of(&player_id);
        log::info!(
            "Session {} ended: score {}, rank {:?}, {} new achievements",
            session_id,
            stats.final_score,
            player_rank,
            new_achievements.len()
        );
        Ok(EndGameResult {
            success: true,
            new_achievements,
            player_rank,
        })
    }
}

impl<S: KvStore> LeaderboardService for LocalBackend<S> {
    fn get_leaderboard(
        &self,
        limit: usize,
        skip: usize,
        player_id: Option<&str>,
    ) -> Result<LeaderboardPage, ServiceError> {
        Ok(self.tables.scores.leaderboard(limit, skip, player_id))
    }

    fn get_achievements(
        &self,
        player_id: Option<&str>,
    ) -> Result<Vec<AchievementStatus>, ServiceError> {
        Ok(CATALOG
            .iter()
            .map(|achievement| {
                let unlocked_at = player_id.and_then(|p| self.tables.unlocked_at(p, achievement.id));
                AchievementStatus {
                    achievement: *achievement,
                    unlocked: unlocked_at.is_some(),
                    unlocked_at,
                }
            })
            .collect())
    }

    fn get_player_stats(&self, player_id: &str) -> Result<PlayerStats, ServiceError> {
        let player = self.tables.player(player_id)?.clone();
        let recent_sessions = self
            .tables
            .sessions
            .iter()
            .rev()
            .filter(|s| s.player_id == player_id && s.status == SessionStatus::Completed)
            .take(RECENT_SESSIONS)
            .cloned()
            .collect();
        let achievements_unlocked = self
            .tables
            .unlocks
            .iter()
            .filter(|u| u.player_id == player_id)
            .count();
        let average_score = if player.total_games > 0 {
            player.total_score as f64 / f64::from(player.total_games)
        } else {
            0.0
        };

        Ok(PlayerStats {
            total_games: player.total_games,
            total_score: player.total_score,
            best_score: player.best_score,
            average_score,
            total_playtime: player.total_playtime,
            total_enemies_destroyed: player.total_enemies_destroyed,
            total_asteroids_destroyed: player.total_asteroids_destroyed,
            total_powerups_collected: player.total_powerups_collected,
            best_wave: player.best_wave,
            achievements_unlocked,
            total_achievements: CATALOG.len(),
            recent_sessions,
            player,
        })
    }
}

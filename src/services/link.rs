//! Session link
//!
//! Binds the running game to a [`SessionService`]. Backend failures never
//! reach gameplay: the link logs them, switches to offline mode and queues a
//! [`Notice`] for the HUD.

use std::collections::VecDeque;

use super::achievements::AchievementStatus;
use super::leaderboard::LeaderboardPage;
use super::{EndGameResult, LeaderboardService, Player, ServiceError, Session, SessionService};
use crate::sim::FinalStats;

/// Something worth telling the player about the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Backend unreachable; play continues without saving
    Offline,
    /// Finished session could not be recorded
    ResultsNotSaved,
    AchievementUnlocked {
        name: String,
        description: String,
        icon: String,
    },
    /// Leaderboard position after a saved session
    Ranked(u32),
}

impl Notice {
    pub fn title(&self) -> String {
        match self {
            Notice::Offline => "Connection Error".to_string(),
            Notice::ResultsNotSaved => "Save Error".to_string(),
            Notice::AchievementUnlocked { icon, .. } => format!("{icon} Achievement Unlocked!"),
            Notice::Ranked(_) => "Score Saved!".to_string(),
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notice::Offline => "Unable to connect to game servers. Using offline mode.".to_string(),
            Notice::ResultsNotSaved => "Failed to save game results".to_string(),
            Notice::AchievementUnlocked {
                name, description, ..
            } => format!("{name}: {description}"),
            Notice::Ranked(rank) => format!("You ranked #{rank} on the leaderboard!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("no player selected; enter a username first")]
    MissingPlayer,
}

pub struct SessionLink<B> {
    backend: B,
    player: Option<Player>,
    session: Option<Session>,
    offline: bool,
    notices: VecDeque<Notice>,
}

impl<B: SessionService> SessionLink<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            player: None,
            session: None,
            offline: false,
            notices: VecDeque::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Notices queued since the last drain, oldest first
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn go_offline(&mut self, err: &ServiceError) {
        log::warn!("Backend failure: {}", err);
        if !self.offline {
            self.offline = true;
            self.notices.push_back(Notice::Offline);
        }
    }

    /// Create or fetch the player. A rejected username leaves the link
    /// online; any other failure switches to offline mode.
    pub fn connect(&mut self, username: &str) -> Result<&Player, ServiceError> {
        match self.backend.create_or_get_player(username) {
            Ok(player) => {
                log::info!("Player ready: {}", player.username);
                self.offline = false;
                Ok(self.player.insert(player))
            }
            Err(ServiceError::InvalidUsername) => Err(ServiceError::InvalidUsername),
            Err(e) => {
                self.go_offline(&e);
                Err(e)
            }
        }
    }

    /// Open a backend session for a new play-through. Only a missing player
    /// while online blocks the start; backend failures just go offline.
    pub fn begin(&mut self) -> Result<(), StartError> {
        self.session = None;
        if self.offline {
            return Ok(());
        }
        let Some(player) = self.player.as_ref() else {
            return Err(StartError::MissingPlayer);
        };

        match self.backend.start_game(&player.id, &player.username) {
            Ok(session) => {
                log::info!("Session {} started", session.id);
                self.session = Some(session);
            }
            Err(e) => self.go_offline(&e),
        }
        Ok(())
    }

    /// Close a play-through cut short by a restart or a quit. Does nothing
    /// when no backend session is open.
    pub fn abandon(&mut self, stats: &FinalStats) -> Option<EndGameResult> {
        self.session.as_ref()?;
        log::info!("Reporting abandoned play-through");
        self.finish(stats)
    }

    /// Report a finished play-through. Returns the backend's reply when the
    /// results were saved.
    pub fn finish(&mut self, stats: &FinalStats) -> Option<EndGameResult> {
        let Some(session) = self.session.take() else {
            if self.offline {
                self.notices.push_back(Notice::ResultsNotSaved);
            } else {
                log::warn!("No session to report the final score to");
            }
            return None;
        };

        match self.backend.end_game(&session.id, stats) {
            Ok(result) => {
                for achievement in &result.new_achievements {
                    self.notices.push_back(Notice::AchievementUnlocked {
                        name: achievement.name.to_string(),
                        description: achievement.description.to_string(),
                        icon: achievement.icon.to_string(),
                    });
                }
                if let Some(rank) = result.player_rank {
                    self.notices.push_back(Notice::Ranked(rank));
                }
                Some(result)
            }
            Err(e) => {
                self.go_offline(&e);
                self.notices.push_back(Notice::ResultsNotSaved);
                None
            }
        }
    }
}

impl<B: SessionService + LeaderboardService> SessionLink<B> {
    /// Leaderboard page for the menu; failures show as an empty board
    pub fn leaderboard(&self, limit: usize, skip: usize) -> LeaderboardPage {
        let player_id = self.player.as_ref().map(|p| p.id.as_str());
        self.backend
            .get_leaderboard(limit, skip, player_id)
            .unwrap_or_else(|e| {
                log::warn!("Leaderboard unavailable: {}", e);
                LeaderboardPage::default()
            })
    }

    /// Achievement list for the menu; failures show as an empty list
    pub fn achievements(&self) -> Vec<AchievementStatus> {
        let player_id = self.player.as_ref().map(|p| p.id.as_str());
        self.backend.get_achievements(player_id).unwrap_or_else(|e| {
            log::warn!("Achievements unavailable: {}", e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;
    use crate::services::{LocalBackend, PlayerStats};

    /// Backend that is always down
    struct Down;

    impl SessionService for Down {
        fn create_or_get_player(&mut self, _username: &str) -> Result<Player, ServiceError> {
            Err(ServiceError::Unavailable)
        }

        fn start_game(&mut self, _: &str, _: &str) -> Result<Session, ServiceError> {
            Err(ServiceError::Unavailable)
        }

        fn end_game(&mut self, _: &str, _: &FinalStats) -> Result<EndGameResult, ServiceError> {
            Err(ServiceError::Unavailable)
        }
    }

    impl LeaderboardService for Down {
        fn get_leaderboard(
            &self,
            _: usize,
            _: usize,
            _: Option<&str>,
        ) -> Result<LeaderboardPage, ServiceError> {
            Err(ServiceError::Unavailable)
        }

        fn get_achievements(
            &self,
            _: Option<&str>,
        ) -> Result<Vec<AchievementStatus>, ServiceError> {
            Err(ServiceError::Unavailable)
        }

        fn get_player_stats(&self, _: &str) -> Result<PlayerStats, ServiceError> {
            Err(ServiceError::Unavailable)
        }
    }

    fn stats(score: u64) -> FinalStats {
        FinalStats {
            final_score: score,
            max_wave: 1,
            powerups_collected: 0,
            enemies_destroyed: 1,
            asteroids_destroyed: 0,
            duration_seconds: 30,
            flawless: false,
        }
    }

    fn local() -> SessionLink<LocalBackend<MemoryStore>> {
        SessionLink::new(LocalBackend::with_clock(MemoryStore::new(), || 0.0))
    }

    #[test]
    fn test_begin_without_player_is_blocked() {
        let mut link = local();
        assert_eq!(link.begin(), Err(StartError::MissingPlayer));
        assert!(!link.is_offline());
    }

    #[test]
    fn test_online_round_trip() {
        let mut link = local();
        link.connect("ace").unwrap();
        link.begin().unwrap();
        assert!(link.session().is_some());

        let result = link.finish(&stats(120)).expect("saved");
        assert_eq!(result.player_rank, Some(1));
        let notices = link.drain_notices();
        assert!(notices.contains(&Notice::Ranked(1)));
        assert!(
            notices
                .iter()
                .any(|n| matches!(n, Notice::AchievementUnlocked { name, .. } if name == "First Blood"))
        );
        assert!(link.session().is_none());
    }

    #[test]
    fn test_restart_reports_abandoned_session() {
        let mut link = local();
        link.connect("ace").unwrap();
        link.begin().unwrap();
        assert!(link.abandon(&stats(80)).is_some());
        link.begin().unwrap();
        assert!(link.abandon(&stats(40)).is_some());

        let page = link.leaderboard(10, 0);
        assert_eq!(page.total_entries, 2);
        assert_eq!(page.entries[0].score, 80);

        // Nothing open: no report and no notice
        link.drain_notices();
        assert!(link.abandon(&stats(10)).is_none());
        assert!(link.drain_notices().is_empty());
    }

    #[test]
    fn test_backend_down_degrades_to_offline() {
        let mut link = SessionLink::new(Down);
        assert!(link.connect("ace").is_err());
        assert!(link.is_offline());

        // Gameplay still starts
        assert_eq!(link.begin(), Ok(()));
        assert!(link.finish(&stats(50)).is_none());
        assert_eq!(
            link.drain_notices(),
            vec![Notice::Offline, Notice::ResultsNotSaved]
        );

        assert_eq!(link.leaderboard(10, 0), LeaderboardPage::default());
        assert!(link.achievements().is_empty());
    }

    #[test]
    fn test_invalid_username_stays_online() {
        let mut link = local();
        assert!(matches!(
            link.connect(""),
            Err(ServiceError::InvalidUsername)
        ));
        assert!(!link.is_offline());
        assert!(link.drain_notices().is_empty());
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(
            Notice::Ranked(3).body(),
            "You ranked #3 on the leaderboard!"
        );
        assert_eq!(Notice::Offline.title(), "Connection Error");
    }
}

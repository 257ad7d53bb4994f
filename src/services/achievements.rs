//! Achievement catalog and unlock rules

use serde::Serialize;

use super::Player;
use crate::sim::FinalStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementCategory {
    Combat,
    Survival,
    Collection,
    Score,
}

/// What has to happen to unlock an achievement. Lifetime totals come from the
/// player record (already including the session being ended); the rest look
/// at that session alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Requirement {
    /// Lifetime enemies destroyed
    EnemiesDestroyed(u64),
    /// Lifetime asteroids destroyed
    AsteroidsDestroyed(u64),
    /// Lifetime power-ups collected
    PowerupsCollected(u64),
    /// Best score ever
    Score(u64),
    /// Session lasted at least this many seconds
    Duration(u32),
    /// Session reached this wave
    Wave(u32),
    /// Session scored this much within `secs`
    ScoreWithin { score: u64, secs: u32 },
    /// Session scored and never lost health
    NoDamage,
}

impl Requirement {
    pub fn is_met(&self, player: &Player, session: &FinalStats) -> bool {
        match *self {
            Requirement::EnemiesDestroyed(n) => player.total_enemies_destroyed >= n,
            Requirement::AsteroidsDestroyed(n) => player.total_asteroids_destroyed >= n,
            Requirement::PowerupsCollected(n) => player.total_powerups_collected >= n,
            Requirement::Score(n) => player.best_score >= n,
            Requirement::Duration(secs) => session.duration_seconds >= secs,
            Requirement::Wave(wave) => session.max_wave >= wave,
            Requirement::ScoreWithin { score, secs } => {
                session.final_score >= score && session.duration_seconds <= secs
            }
            Requirement::NoDamage => session.final_score > 0 && session.flawless,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub requirement: Requirement,
    pub points: u32,
    /// Not listed until unlocked
    pub hidden: bool,
}

/// An achievement with a player's unlock state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked: bool,
    pub unlocked_at: Option<f64>,
}

pub static CATALOG: [Achievement; 10] = [
    Achievement {
        id: "first_blood",
        name: "First Blood",
        description: "Destroy your first enemy",
        icon: "🎯",
        category: AchievementCategory::Combat,
        requirement: Requirement::EnemiesDestroyed(1),
        points: 10,
        hidden: false,
    },
    Achievement {
        id: "asteroid_crusher",
        name: "Asteroid Crusher",
        description: "Destroy 50 asteroids",
        icon: "☄️",
        category: AchievementCategory::Combat,
        requirement: Requirement::AsteroidsDestroyed(50),
        points: 25,
        hidden: false,
    },
    Achievement {
        id: "survivor",
        name: "Survivor",
        description: "Survive for 2 minutes",
        icon: "⏱️",
        category: AchievementCategory::Survival,
        requirement: Requirement::Duration(120),
        points: 20,
        hidden: false,
    },
    Achievement {
        id: "power_collector",
        name: "Power Collector",
        description: "Collect 20 power-ups",
        icon: "⚡",
        category: AchievementCategory::Collection,
        requirement: Requirement::PowerupsCollected(20),
        points: 15,
        hidden: false,
    },
    Achievement {
        id: "score_master",
        name: "Score Master",
        description: "Reach 10,000 points",
        icon: "🏆",
        category: AchievementCategory::Score,
        requirement: Requirement::Score(10_000),
        points: 50,
        hidden: false,
    },
    Achievement {
        id: "legendary",
        name: "Legendary",
        description: "Reach 25,000 points",
        icon: "👑",
        category: AchievementCategory::Score,
        requirement: Requirement::Score(25_000),
        points: 100,
        hidden: false,
    },
    Achievement {
        id: "wave_warrior",
        name: "Wave Warrior",
        description: "Reach Wave 10",
        icon: "🌊",
        category: AchievementCategory::Survival,
        requirement: Requirement::Wave(10),
        points: 40,
        hidden: false,
    },
    Achievement {
        id: "speed_demon",
        name: "Speed Demon",
        description: "Reach 5,000 points in under 3 minutes",
        icon: "⚡",
        category: AchievementCategory::Score,
        requirement: Requirement::ScoreWithin {
            score: 5_000,
            secs: 180,
        },
        points: 60,
        hidden: true,
    },
    Achievement {
        id: "untouchable",
        name: "Untouchable",
        description: "Complete a game without taking damage",
        icon: "🛡️",
        category: AchievementCategory::Survival,
        requirement: Requirement::NoDamage,
        points: 75,
        hidden: true,
    },
    Achievement {
        id: "destroyer",
        name: "Destroyer",
        description: "Destroy 100 enemies",
        icon: "💥",
        category: AchievementCategory::Combat,
        requirement: Requirement::EnemiesDestroyed(100),
        points: 50,
        hidden: false,
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}

/// Catalog entries met by this session that are not in `already_unlocked`
pub fn newly_unlocked(
    player: &Player,
    session: &FinalStats,
    already_unlocked: impl Fn(&str) -> bool,
) -> Vec<Achievement> {
    CATALOG
        .iter()
        .filter(|a| !already_unlocked(a.id))
        .filter(|a| a.requirement.is_met(player, session))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(score: u64, secs: u32, flawless: bool) -> FinalStats {
        FinalStats {
            final_score: score,
            max_wave: 1,
            powerups_collected: 0,
            enemies_destroyed: 0,
            asteroids_destroyed: 0,
            duration_seconds: secs,
            flawless,
        }
    }

    #[test]
    fn test_catalog_ids_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(CATALOG[i + 1..].iter().all(|b| b.id != a.id), "{}", a.id);
        }
        assert_eq!(find("destroyer").map(|a| a.points), Some(50));
    }

    #[test]
    fn test_speed_demon_needs_score_and_time() {
        let player = Player::new("p".into(), "ace".into(), 0.0);
        let speed = Requirement::ScoreWithin {
            score: 5_000,
            secs: 180,
        };
        assert!(speed.is_met(&player, &stats(5_000, 180, false)));
        assert!(!speed.is_met(&player, &stats(5_000, 181, false)));
        assert!(!speed.is_met(&player, &stats(4_990, 60, false)));
    }

    #[test]
    fn test_untouchable_requires_points_and_no_damage() {
        let player = Player::new("p".into(), "ace".into(), 0.0);
        assert!(Requirement::NoDamage.is_met(&player, &stats(10, 30, true)));
        assert!(!Requirement::NoDamage.is_met(&player, &stats(0, 30, true)));
        assert!(!Requirement::NoDamage.is_met(&player, &stats(10, 30, false)));
    }

    #[test]
    fn test_lifetime_totals_and_skip_unlocked() {
        let mut player = Player::new("p".into(), "ace".into(), 0.0);
        player.total_enemies_destroyed = 1;
        let session = stats(0, 10, false);

        let fresh = newly_unlocked(&player, &session, |_| false);
        assert_eq!(fresh.iter().map(|a| a.id).collect::<Vec<_>>(), vec!["first_blood"]);

        let again = newly_unlocked(&player, &session, |id| id == "first_blood");
        assert!(again.is_empty());
    }
}

//! World state and outbound events
//!
//! The [`World`] is the whole session: the ship, the entity registry, and the
//! aggregate counters. It is owned by the game loop driver and lent by `&mut`
//! to each subsystem in turn.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::effects::ActiveEffect;
use super::entity::{Body, Category, Owner, PowerUpKind, Ship};
use super::registry::Registry;
use crate::consts::*;

/// Something the UI layer should hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    HealthChanged { health: u8 },
    WaveAdvanced { wave: u32 },
    /// Player fired `count` bullets this tick
    PlayerFired { count: u8 },
    EnemyFired,
    AsteroidDestroyed,
    EnemyHit,
    EnemyDestroyed,
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    /// Ship was struck; `damage` is 0 when a shield absorbed it
    ShipHit { damage: u8 },
    /// Emitted at most once per session
    GameOver { final_score: u64 },
}

/// Per-session tallies reported when the session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub asteroids_destroyed: u32,
    pub enemies_destroyed: u32,
    pub powerups_collected: u32,
    pub damage_taken: u32,
    /// Simulation ticks processed (pauses excluded)
    pub ticks: u64,
}

/// Final numbers handed to the session service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStats {
    pub final_score: u64,
    pub max_wave: u32,
    pub powerups_collected: u32,
    pub enemies_destroyed: u32,
    pub asteroids_destroyed: u32,
    pub duration_seconds: u32,
    /// True when the ship never lost health
    pub flawless: bool,
}

/// Active effect as displayed by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectStatus {
    pub kind: PowerUpKind,
    pub remaining_secs: u32,
}

impl From<&ActiveEffect> for EffectStatus {
    fn from(effect: &ActiveEffect) -> Self {
        Self {
            kind: effect.kind,
            remaining_secs: crate::ticks_to_secs_ceil(effect.remaining_ticks),
        }
    }
}

/// Per-tick values for the HUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub health: u8,
    pub wave: u32,
    pub effects: Vec<EffectStatus>,
}

impl Default for HudSnapshot {
    fn default() -> Self {
        Self {
            score: 0,
            health: SHIP_MAX_HEALTH,
            wave: 1,
            effects: Vec::new(),
        }
    }
}

/// Rendering detail beyond the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Plain,
    /// Ship with an active shield
    Shielded,
    /// Bullet fired by an enemy
    EnemyShot,
    PowerUp(PowerUpKind),
}

/// One drawable object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub category: Category,
    pub pos: Vec3,
    pub rotation: Vec3,
    pub variant: Variant,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    pub ship: Ship,
    pub registry: Registry,
    /// Never decreases
    pub score: u64,
    /// Starts at 1, never decreases
    pub wave: u32,
    /// Ticks toward the next wave
    pub wave_timer_ticks: u32,
    /// Ticks toward the next spawn roll
    pub spawn_timer_ticks: u32,
    /// Latched once health hits zero
    pub game_over: bool,
    pub stats: SessionStats,
    events: Vec<GameEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            ship: Ship::default(),
            registry: Registry::new(),
            score: 0,
            wave: 1,
            wave_timer_ticks: 0,
            spawn_timer_ticks: 0,
            game_over: false,
            stats: SessionStats::default(),
            events: Vec::new(),
        }
    }

    pub fn health(&self) -> u8 {
        self.ship.health
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.emit(GameEvent::ScoreChanged { score: self.score });
    }

    /// Damage the ship and latch game over on reaching zero health.
    /// Later hits in the same tick still cost health but never re-signal.
    pub fn damage_ship(&mut self, amount: u8) {
        let lost = self.ship.take_damage(amount);
        self.stats.damage_taken += u32::from(lost);
        self.emit(GameEvent::ShipHit { damage: lost });
        if lost > 0 {
            self.emit(GameEvent::HealthChanged {
                health: self.ship.health,
            });
        }

        if self.ship.health == 0 && !self.game_over {
            self.game_over = true;
            log::info!("Game over at wave {} with score {}", self.wave, self.score);
            self.emit(GameEvent::GameOver {
                final_score: self.score,
            });
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            health: self.ship.health,
            wave: self.wave,
            effects: self
                .ship
                .effects
                .active()
                .iter()
                .map(EffectStatus::from)
                .collect(),
        }
    }

    pub fn final_stats(&self) -> FinalStats {
        FinalStats {
            final_score: self.score,
            max_wave: self.wave,
            powerups_collected: self.stats.powerups_collected,
            enemies_destroyed: self.stats.enemies_destroyed,
            asteroids_destroyed: self.stats.asteroids_destroyed,
            duration_seconds: (self.stats.ticks / u64::from(SIM_HZ)) as u32,
            flawless: self.stats.damage_taken == 0,
        }
    }

    /// Transform of every simulated object, ship first, for the renderer
    pub fn transforms(&self) -> impl Iterator<Item = Transform> + '_ {
        let ship = Transform {
            category: Category::Ship,
            pos: self.ship.pos,
            rotation: Vec3::ZERO,
            variant: if self.ship.effects.is_active(PowerUpKind::Shield) {
                Variant::Shielded
            } else {
                Variant::Plain
            },
        };
        std::iter::once(ship).chain(self.registry.iter().map(|e| Transform {
            category: e.category(),
            pos: e.pos,
            rotation: e.rotation(),
            variant: match e.body {
                Body::Bullet(b) if b.owner == Owner::Enemy => Variant::EnemyShot,
                Body::PowerUp(p) => Variant::PowerUp(p.kind),
                _ => Variant::Plain,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_defaults() {
        let world = World::new();
        assert_eq!(world.score, 0);
        assert_eq!(world.wave, 1);
        assert_eq!(world.health(), SHIP_MAX_HEALTH);
        assert!(world.registry.is_empty());
        assert!(!world.game_over);
    }

    #[test]
    fn test_game_over_signals_once() {
        let mut world = World::new();
        world.ship.health = 10;
        world.add_score(40);
        world.damage_ship(ENEMY_BULLET_DAMAGE);
        world.damage_ship(RAM_DAMAGE);

        let overs: Vec<_> = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs, vec![GameEvent::GameOver { final_score: 40 }]);
        assert_eq!(world.health(), 0);
    }

    #[test]
    fn test_final_stats_duration_and_flawless() {
        let mut world = World::new();
        world.stats.ticks = u64::from(SIM_HZ) * 125 + 30;
        let stats = world.final_stats();
        assert_eq!(stats.duration_seconds, 125);
        assert!(stats.flawless);

        world.damage_ship(RAM_DAMAGE);
        assert!(!world.final_stats().flawless);
    }

    #[test]
    fn test_transforms_lead_with_ship() {
        let mut world = World::new();
        let first = world.transforms().next().map(|t| t.category);
        assert_eq!(first, Some(Category::Ship));

        world.ship.effects.activate(PowerUpKind::Shield);
        let ship = world.transforms().next().map(|t| t.variant);
        assert_eq!(ship, Some(Variant::Shielded));
    }
}

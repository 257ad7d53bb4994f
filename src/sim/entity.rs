//! Entity types
//!
//! Every simulated object other than the ship is an [`Entity`]: an id, a world
//! position, and a [`Body`] carrying only the data its category needs. The ship
//! is a single [`Ship`] value owned directly by the world, so "exactly one ship"
//! holds by construction.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use crate::consts::*;

/// Unique entity identifier (never reused within a session)
pub type EntityId = u32;

/// Entity category, used for per-category iteration and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Ship,
    Bullet,
    Asteroid,
    Enemy,
    PowerUp,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Owner {
    Player,
    Enemy,
}

/// Power-up effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    Health,
    RapidFire,
    MultiShot,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Health,
        PowerUpKind::RapidFire,
        PowerUpKind::MultiShot,
        PowerUpKind::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "health",
            PowerUpKind::RapidFire => "rapidFire",
            PowerUpKind::MultiShot => "multiShot",
            PowerUpKind::Shield => "shield",
        }
    }

    /// Short name for the active effect list
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "Health",
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::MultiShot => "Multi-Shot",
            PowerUpKind::Shield => "Shield",
        }
    }

    /// Notification title shown on pickup
    pub fn title(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "Health Restored!",
            PowerUpKind::RapidFire => "Rapid Fire!",
            PowerUpKind::MultiShot => "Multi-Shot!",
            PowerUpKind::Shield => "Shield Active!",
        }
    }

    /// Notification body shown on pickup
    pub fn description(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "+25 Health",
            PowerUpKind::RapidFire => "Faster shooting for 10 seconds",
            PowerUpKind::MultiShot => "Triple bullets for 10 seconds",
            PowerUpKind::Shield => "Temporary invincibility",
        }
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec3,
    /// 0..=SHIP_MAX_HEALTH
    pub health: u8,
    /// Timed power-up effects currently running
    pub effects: Effects,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            health: SHIP_MAX_HEALTH,
            effects: Effects::default(),
        }
    }
}

impl Ship {
    /// Where player bullets leave the hull
    pub fn nose(&self) -> Vec3 {
        self.pos - Vec3::Z * SHIP_NOSE_OFFSET
    }

    /// Clamp position into the lateral play area
    pub fn clamp_to_bounds(&mut self) {
        self.pos.x = self.pos.x.clamp(-SHIP_BOUND_X, SHIP_BOUND_X);
        self.pos.y = self.pos.y.clamp(-SHIP_BOUND_Y, SHIP_BOUND_Y);
    }

    /// Apply damage, returning the health actually lost.
    /// Shielded ships take nothing; health never drops below zero.
    pub fn take_damage(&mut self, amount: u8) -> u8 {
        debug_assert!(self.health <= SHIP_MAX_HEALTH, "health {}", self.health);
        if self.effects.is_active(PowerUpKind::Shield) {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_sub(amount);
        before - self.health
    }

    /// Restore health, clamped to the maximum
    pub fn heal(&mut self, amount: u8) {
        debug_assert!(self.health <= SHIP_MAX_HEALTH, "health {}", self.health);
        self.health = self.health.saturating_add(amount).min(SHIP_MAX_HEALTH);
    }
}

/// A bullet. `speed` is subtracted from z each tick, so its sign encodes direction:
/// positive for player shots (away from the camera), negative for enemy shots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub speed: f32,
    pub damage: u8,
    pub owner: Owner,
}

impl Bullet {
    pub fn player() -> Self {
        Self {
            speed: BULLET_SPEED,
            damage: BULLET_DAMAGE,
            owner: Owner::Player,
        }
    }

    pub fn enemy() -> Self {
        Self {
            speed: -BULLET_SPEED,
            damage: BULLET_DAMAGE,
            owner: Owner::Enemy,
        }
    }

    /// Depth beyond which this bullet leaves the simulation
    pub fn has_exited(&self, z: f32) -> bool {
        match self.owner {
            Owner::Player => z < PLAYER_BULLET_EXIT_Z,
            Owner::Enemy => z > ENEMY_BULLET_EXIT_Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    /// Depth advance per tick
    pub speed: f32,
    /// Rotation per tick around x and y
    pub spin: f32,
    pub rotation: Vec3,
    pub health: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub speed: f32,
    pub health: u8,
    /// Ticks since the last shot
    pub shoot_timer: u32,
    /// Ticks between shots
    pub shoot_interval: f32,
}

impl Enemy {
    /// Advance the shoot timer; true when a shot should be fired this tick
    pub fn tick_weapon(&mut self) -> bool {
        self.shoot_timer += 1;
        if self.shoot_timer as f32 >= self.shoot_interval {
            self.shoot_timer = 0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub speed: f32,
    pub spin: f32,
    pub rotation: Vec3,
}

/// Per-category entity data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body {
    Bullet(Bullet),
    Asteroid(Asteroid),
    Enemy(Enemy),
    PowerUp(PowerUp),
}

/// A registry-owned simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec3,
    pub body: Body,
}

impl Entity {
    pub fn category(&self) -> Category {
        match self.body {
            Body::Bullet(_) => Category::Bullet,
            Body::Asteroid(_) => Category::Asteroid,
            Body::Enemy(_) => Category::Enemy,
            Body::PowerUp(_) => Category::PowerUp,
        }
    }

    pub fn is_bullet_of(&self, owner: Owner) -> bool {
        matches!(self.body, Body::Bullet(b) if b.owner == owner)
    }

    /// Visual rotation (zero for kinds that don't spin)
    pub fn rotation(&self) -> Vec3 {
        match self.body {
            Body::Asteroid(a) => a.rotation,
            Body::PowerUp(p) => p.rotation,
            Body::Bullet(_) | Body::Enemy(_) => Vec3::ZERO,
        }
    }

    /// Whether this entity is past its exit plane
    pub fn has_exited(&self) -> bool {
        match self.body {
            Body::Bullet(b) => b.has_exited(self.pos.z),
            Body::Asteroid(_) | Body::Enemy(_) | Body::PowerUp(_) => self.pos.z > OBJECT_EXIT_Z,
        }
    }

    /// Within `dist` of a point (strictly closer)
    pub fn near(&self, point: Vec3, dist: f32) -> bool {
        self.pos.distance(point) < dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_exit_planes_are_asymmetric() {
        let player = Bullet::player();
        assert!(!player.has_exited(-19.9));
        assert!(player.has_exited(-20.1));
        assert!(!player.has_exited(19.0));

        let enemy = Bullet::enemy();
        assert!(enemy.has_exited(20.1));
        assert!(!enemy.has_exited(-25.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "health 150")]
    fn test_overfull_health_is_caught_in_debug() {
        let mut ship = Ship {
            health: 150,
            ..Default::default()
        };
        ship.heal(HEALTH_POWERUP_AMOUNT);
    }

    #[test]
    fn test_ship_damage_saturates_and_shield_blocks() {
        let mut ship = Ship {
            health: 15,
            ..Default::default()
        };
        assert_eq!(ship.take_damage(RAM_DAMAGE), 15);
        assert_eq!(ship.health, 0);

        let mut ship = Ship::default();
        ship.effects.activate(PowerUpKind::Shield);
        assert_eq!(ship.take_damage(RAM_DAMAGE), 0);
        assert_eq!(ship.health, SHIP_MAX_HEALTH);
    }

    #[test]
    fn test_heal_clamps() {
        let mut ship = Ship {
            health: 90,
            ..Default::default()
        };
        ship.heal(HEALTH_POWERUP_AMOUNT);
        assert_eq!(ship.health, 100);
    }

    #[test]
    fn test_enemy_weapon_cycle() {
        let mut enemy = Enemy {
            speed: 0.01,
            health: ENEMY_HEALTH,
            shoot_timer: 0,
            shoot_interval: 3.0,
        };
        assert!(!enemy.tick_weapon());
        assert!(!enemy.tick_weapon());
        assert!(enemy.tick_weapon());
        assert_eq!(enemy.shoot_timer, 0);
    }
}

//! Spawner
//!
//! Once per second of accumulated tick time, rolls three independent trials:
//! asteroid, enemy (odds grow with the wave), power-up. Everything appears on
//! the far plane at a uniformly random lateral position.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Asteroid, Body, Enemy, PowerUp, PowerUpKind};
use super::state::World;
use crate::consts::*;

/// Source of randomness for spawning
pub trait Roll {
    /// Bernoulli trial succeeding with probability `p`
    fn chance(&mut self, p: f32) -> bool;
    /// Uniform sample in `[lo, hi)`
    fn range(&mut self, lo: f32, hi: f32) -> f32;
    /// Uniform index in `0..len` (`len` > 0)
    fn index(&mut self, len: usize) -> usize;
}

impl Roll for Pcg32 {
    fn chance(&mut self, p: f32) -> bool {
        self.random::<f32>() < p
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            lo
        } else {
            self.random_range(lo..hi)
        }
    }

    fn index(&mut self, len: usize) -> usize {
        self.random_range(0..len.max(1))
    }
}

/// What a spawn roll produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub asteroids: u32,
    pub enemies: u32,
    pub power_ups: u32,
}

/// Enemy spawn probability for a wave, capped at certainty
pub fn enemy_spawn_chance(wave: u32) -> f32 {
    (ENEMY_SPAWN_BASE_CHANCE + ENEMY_SPAWN_CHANCE_PER_WAVE * wave as f32).min(1.0)
}

/// Count one tick; when the interval is reached, reset and roll spawns
pub fn update(world: &mut World, roll: &mut impl Roll) -> Option<SpawnReport> {
    world.spawn_timer_ticks += 1;
    if world.spawn_timer_ticks < SPAWN_INTERVAL_TICKS {
        return None;
    }
    world.spawn_timer_ticks = 0;
    Some(spawn_objects(world, roll))
}

/// Roll the three spawn trials once
pub fn spawn_objects(world: &mut World, roll: &mut impl Roll) -> SpawnReport {
    let mut report = SpawnReport::default();

    if roll.chance(ASTEROID_SPAWN_CHANCE) {
        let pos = spawn_point(roll);
        let asteroid = Asteroid {
            speed: roll.range(ASTEROID_SPEED_MIN, ASTEROID_SPEED_MAX),
            spin: roll.range(-ASTEROID_SPIN_MAX, ASTEROID_SPIN_MAX),
            rotation: Vec3::ZERO,
            health: ASTEROID_HEALTH,
        };
        world.registry.add(pos, Body::Asteroid(asteroid));
        report.asteroids += 1;
    }

    if roll.chance(enemy_spawn_chance(world.wave)) {
        let pos = spawn_point(roll);
        let enemy = Enemy {
            speed: roll.range(ENEMY_SPEED_MIN, ENEMY_SPEED_MAX),
            health: ENEMY_HEALTH,
            shoot_timer: 0,
            shoot_interval: roll.range(ENEMY_SHOOT_INTERVAL_MIN, ENEMY_SHOOT_INTERVAL_MAX),
        };
        world.registry.add(pos, Body::Enemy(enemy));
        report.enemies += 1;
    }

    if roll.chance(POWERUP_SPAWN_CHANCE) {
        let pos = spawn_point(roll);
        let kind = PowerUpKind::ALL[roll.index(PowerUpKind::ALL.len())];
        let power_up = PowerUp {
            kind,
            speed: POWERUP_SPEED,
            spin: POWERUP_SPIN,
            rotation: Vec3::ZERO,
        };
        world.registry.add(pos, Body::PowerUp(power_up));
        report.power_ups += 1;
    }

    if report != SpawnReport::default() {
        log::debug!("Spawned {:?} (wave {})", report, world.wave);
    }
    report
}

fn spawn_point(roll: &mut impl Roll) -> Vec3 {
    let extent = crate::lateral_extent();
    Vec3::new(
        roll.range(-extent.x, extent.x),
        roll.range(-extent.y, extent.y),
        SPAWN_Z,
    )
}

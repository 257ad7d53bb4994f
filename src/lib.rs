//! Astro Blaster - An arcade 3D space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, waves, power-ups)
//! - `renderer`: WebGPU rendering of entity transforms
//! - `platform`: Browser/native platform abstraction (storage, input, time)
//! - `services`: Player/session persistence, leaderboard and achievements
//! - `hud`: UI-facing state derived from simulation events

pub mod audio;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod services;
pub mod settings;
pub mod sim;

pub use hud::Hud;
pub use settings::{Settings, TouchControls};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const TICK_MS: f32 = 1000.0 / SIM_HZ as f32;
    /// Maximum ticks per rendered frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will account for (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Ship movement bounds (lateral plane)
    pub const SHIP_BOUND_X: f32 = 8.0;
    pub const SHIP_BOUND_Y: f32 = 5.0;
    /// Ship movement per tick per active axis
    pub const SHIP_STEP: f32 = 0.1;
    pub const SHIP_MAX_HEALTH: u8 = 100;
    /// Player bullets spawn this far in front of the ship (toward -z)
    pub const SHIP_NOSE_OFFSET: f32 = 1.0;

    /// Bullet speed magnitude along the depth axis (per tick)
    pub const BULLET_SPEED: f32 = 0.3;
    pub const BULLET_DAMAGE: u8 = 1;
    /// Live player bullet cap
    pub const MAX_PLAYER_BULLETS: usize = 20;
    /// Live player bullet cap while rapid fire is active
    pub const RAPID_FIRE_BULLET_CAP: usize = 40;
    /// Lateral offset of the side bullets while multi-shot is active
    pub const MULTI_SHOT_SPREAD: f32 = 0.3;

    /// Far plane where world objects appear
    pub const SPAWN_Z: f32 = -20.0;
    /// Player bullets are culled beyond this depth
    pub const PLAYER_BULLET_EXIT_Z: f32 = -20.0;
    /// Enemy bullets are culled beyond this depth
    pub const ENEMY_BULLET_EXIT_Z: f32 = 20.0;
    /// Asteroids, enemies and power-ups are culled beyond this depth
    pub const OBJECT_EXIT_Z: f32 = 15.0;

    pub const ASTEROID_SPEED_MIN: f32 = 0.01;
    pub const ASTEROID_SPEED_MAX: f32 = 0.03;
    /// Asteroid spin is uniform in [-ASTEROID_SPIN_MAX, ASTEROID_SPIN_MAX)
    pub const ASTEROID_SPIN_MAX: f32 = 0.01;
    pub const ASTEROID_HEALTH: u8 = 1;

    pub const ENEMY_SPEED_MIN: f32 = 0.01;
    pub const ENEMY_SPEED_MAX: f32 = 0.025;
    pub const ENEMY_HEALTH: u8 = 2;
    /// Enemy shoot interval bounds in ticks
    pub const ENEMY_SHOOT_INTERVAL_MIN: f32 = 60.0;
    pub const ENEMY_SHOOT_INTERVAL_MAX: f32 = 180.0;

    pub const POWERUP_SPEED: f32 = 0.01;
    pub const POWERUP_SPIN: f32 = 0.05;

    /// Spawner cadence, one roll per simulated second
    pub const SPAWN_INTERVAL_TICKS: u32 = SIM_HZ;
    pub const ASTEROID_SPAWN_CHANCE: f32 = 0.7;
    pub const ENEMY_SPAWN_BASE_CHANCE: f32 = 0.3;
    pub const ENEMY_SPAWN_CHANCE_PER_WAVE: f32 = 0.1;
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.1;

    /// Wave cadence, 30 simulated seconds
    pub const WAVE_INTERVAL_TICKS: u32 = 30 * SIM_HZ;

    /// Collision distance for player bullet vs asteroid
    pub const BULLET_ASTEROID_HIT_DIST: f32 = 0.8;
    /// Collision distance for every other pair
    pub const HIT_DIST: f32 = 1.0;

    pub const SCORE_ASTEROID: u64 = 10;
    pub const SCORE_ENEMY: u64 = 50;
    pub const SCORE_POWERUP: u64 = 25;

    pub const ENEMY_BULLET_DAMAGE: u8 = 10;
    pub const RAM_DAMAGE: u8 = 20;

    /// Health restored by a health power-up
    pub const HEALTH_POWERUP_AMOUNT: u8 = 25;
    /// Lifetime of an activated power-up effect
    pub const EFFECT_DURATION_TICKS: u32 = 10 * SIM_HZ;
}

/// Uniform lateral spawn range: x in [-SHIP_BOUND_X, SHIP_BOUND_X), y in [-SHIP_BOUND_Y, SHIP_BOUND_Y)
#[inline]
pub fn lateral_extent() -> glam::Vec2 {
    glam::Vec2::new(consts::SHIP_BOUND_X, consts::SHIP_BOUND_Y)
}

/// Convert a tick count to whole seconds, rounding up (for countdown display)
#[inline]
pub fn ticks_to_secs_ceil(ticks: u32) -> u32 {
    ticks.div_ceil(consts::SIM_HZ)
}

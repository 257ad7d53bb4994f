//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod entity;
pub mod motion;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wave;

pub use effects::{ActiveEffect, Effects};
pub use entity::{
    Asteroid, Body, Bullet, Category, Enemy, Entity, EntityId, Owner, PowerUp, PowerUpKind, Ship,
};
pub use registry::Registry;
pub use spawn::{Roll, SpawnReport};
pub use state::{
    EffectStatus, FinalStats, GameEvent, HudSnapshot, SessionStats, Transform, Variant, World,
};
pub use tick::{GameLoop, GamePhase, TickInput, TransitionError, tick};

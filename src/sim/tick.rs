//! Fixed timestep simulation tick
//!
//! [`tick`] advances a [`World`] by one step in a fixed order:
//! effect countdown, integrator, spawner, collision resolver, wave tracker.
//! [`GameLoop`] drives it from variable frame deltas and owns the session
//! state machine `Idle -> Playing <-> Paused -> GameOver -> Idle`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::Roll;
use super::state::{GameEvent, HudSnapshot, World};
use super::{collision, motion, spawn, wave};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire held (keyboard space or touch fire button)
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Touch joystick; overrides the directional keys when present
    pub joystick: Option<Vec2>,
}

/// Advance the world by one fixed timestep. A finished session is left untouched.
pub fn tick(world: &mut World, input: &TickInput, roll: &mut impl Roll) {
    if world.game_over {
        return;
    }

    for kind in world.ship.effects.tick() {
        world.emit(GameEvent::PowerUpExpired { kind });
    }

    motion::integrate(world, input);
    spawn::update(world, roll);
    collision::resolve(world);
    wave::update(world);

    world.stats.ticks += 1;
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Menu, no session running
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Rejected session state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} while {from:?}")]
pub struct TransitionError {
    pub from: GamePhase,
    pub action: &'static str,
}

/// Fixed-step driver that owns the world, the session RNG and the phase
pub struct GameLoop {
    world: World,
    rng: Pcg32,
    phase: GamePhase,
    accumulator: f32,
    seed: u64,
}

impl GameLoop {
    /// A driver sitting at the menu
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            accumulator: 0.0,
            seed,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for setup and tests
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn hud(&self) -> HudSnapshot {
        self.world.hud()
    }

    /// Begin a session from the menu or the game over screen
    pub fn start(&mut self, seed: u64) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Idle | GamePhase::GameOver => {
                self.reset(seed);
                Ok(())
            }
            from => Err(TransitionError {
                from,
                action: "start",
            }),
        }
    }

    /// Throw away the current session and start a fresh one
    pub fn restart(&mut self, seed: u64) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver => {
                self.reset(seed);
                Ok(())
            }
            from => Err(TransitionError {
                from,
                action: "restart",
            }),
        }
    }

    pub fn pause(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.accumulator = 0.0;
                log::info!("Paused at tick {}", self.world.stats.ticks);
                Ok(())
            }
            from => Err(TransitionError {
                from,
                action: "pause",
            }),
        }
    }

    pub fn resume(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.accumulator = 0.0;
                Ok(())
            }
            from => Err(TransitionError {
                from,
                action: "resume",
            }),
        }
    }

    pub fn toggle_pause(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Leave a paused or finished session for the menu
    pub fn quit_to_menu(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Paused | GamePhase::GameOver => {
                self.phase = GamePhase::Idle;
                self.accumulator = 0.0;
                Ok(())
            }
            from => Err(TransitionError {
                from,
                action: "quit to menu",
            }),
        }
    }

    /// Feed one rendered frame's elapsed time. Runs as many fixed ticks as
    /// fit (bounded by [`MAX_SUBSTEPS`]) and returns the events they produced.
    pub fn advance(&mut self, frame_ms: f32, input: &TickInput) -> Vec<GameEvent> {
        if input.pause && matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            // Phase was checked above, so the toggle cannot fail
            let _ = self.toggle_pause();
        }
        if self.phase != GamePhase::Playing {
            return self.world.drain_events();
        }

        self.accumulator += frame_ms.clamp(0.0, MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator >= TICK_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.world, input, &mut self.rng);
            self.accumulator -= TICK_MS;
            substeps += 1;

            if self.world.game_over {
                self.phase = GamePhase::GameOver;
                self.accumulator = 0.0;
                break;
            }
        }

        self.world.drain_events()
    }

    fn reset(&mut self, seed: u64) {
        self.world = World::new();
        self.rng = Pcg32::seed_from_u64(seed);
        self.seed = seed;
        self.accumulator = 0.0;
        self.phase = GamePhase::Playing;
        log::info!("Session started (seed {seed})");
    }
}

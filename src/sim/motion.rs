//! Motion & input integrator
//!
//! Moves the ship from input, fires player bullets, then advances every
//! registry entity one tick along the depth axis and culls whatever crossed
//! its exit plane.

use glam::{Vec2, Vec3};

use super::effects::{bullet_cap, shot_pattern};
use super::entity::{Body, Bullet, Owner};
use super::state::{GameEvent, World};
use super::tick::TickInput;
use crate::consts::*;

/// Run the integrator for one tick
pub fn integrate(world: &mut World, input: &TickInput) {
    steer_ship(world, input);
    if input.fire {
        fire_player(world);
    }
    advance_entities(world);
    world.registry.retain(|e| !e.has_exited());
}

/// Per-tick ship displacement for the given input, before clamping
pub fn steer_delta(input: &TickInput) -> Vec2 {
    if let Some(stick) = input.joystick {
        return stick.clamp_length_max(1.0) * SHIP_STEP;
    }

    let mut delta = Vec2::ZERO;
    if input.left {
        delta.x -= SHIP_STEP;
    }
    if input.right {
        delta.x += SHIP_STEP;
    }
    if input.up {
        delta.y += SHIP_STEP;
    }
    if input.down {
        delta.y -= SHIP_STEP;
    }
    delta
}

fn steer_ship(world: &mut World, input: &TickInput) {
    let delta = steer_delta(input);
    world.ship.pos += delta.extend(0.0);
    world.ship.clamp_to_bounds();
}

fn fire_player(world: &mut World) {
    let cap = bullet_cap(&world.ship.effects);
    let nose = world.ship.nose();
    let mut fired = 0u8;

    for &offset in shot_pattern(&world.ship.effects) {
        if world.registry.bullet_count(Owner::Player) >= cap {
            break;
        }
        world
            .registry
            .add(nose + Vec3::X * offset, Body::Bullet(Bullet::player()));
        fired += 1;
    }

    if fired > 0 {
        world.emit(GameEvent::PlayerFired { count: fired });
    }
}

fn advance_entities(world: &mut World) {
    let mut enemy_shots = Vec::new();

    for entity in world.registry.iter_mut() {
        match &mut entity.body {
            Body::Bullet(bullet) => {
                entity.pos.z -= bullet.speed;
            }
            Body::Asteroid(asteroid) => {
                entity.pos.z += asteroid.speed;
                asteroid.rotation.x += asteroid.spin;
                asteroid.rotation.y += asteroid.spin;
            }
            Body::Enemy(enemy) => {
                entity.pos.z += enemy.speed;
                if enemy.tick_weapon() {
                    enemy_shots.push(entity.pos);
                }
            }
            Body::PowerUp(power_up) => {
                entity.pos.z += power_up.speed;
                power_up.rotation.x += power_up.spin;
                power_up.rotation.y += power_up.spin;
            }
        }
    }

    for pos in enemy_shots {
        world.registry.add(pos, Body::Bullet(Bullet::enemy()));
        world.emit(GameEvent::EnemyFired);
    }
}

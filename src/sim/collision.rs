//! Collision resolver
//!
//! Proximity hits between category pairs, resolved in a fixed order every tick:
//!
//! 1. player bullet x asteroid: both destroyed, +10
//! 2. player bullet x enemy: bullet destroyed, enemy loses health, +50 on kill
//! 3. ship x power-up: power-up collected and activated, +25
//! 4. enemy bullet x ship: bullet destroyed, ship takes 10
//! 5. ship x asteroid/enemy: ship takes 20 per overlapping object (objects survive)
//!
//! Every pass runs even after game over has latched within the tick. A bullet
//! is spent on the first (lowest id) target in range, so one shot never
//! destroys two things.

use glam::Vec3;

use super::effects::activate_power_up;
use super::entity::{Body, Category, EntityId, Owner};
use super::state::{GameEvent, World};
use crate::consts::*;

/// Resolve all collision pairs for this tick
pub fn resolve(world: &mut World) {
    player_bullets_vs_asteroids(world);
    player_bullets_vs_enemies(world);
    ship_vs_power_ups(world);
    enemy_bullets_vs_ship(world);
    ship_vs_hulls(world);
}

/// First entity of `category` strictly within `dist` of `point`
fn first_in_range(world: &World, category: Category, point: Vec3, dist: f32) -> Option<EntityId> {
    world
        .registry
        .of(category)
        .find(|e| e.near(point, dist))
        .map(|e| e.id)
}

fn player_bullets_vs_asteroids(world: &mut World) {
    for bullet_id in world.registry.bullet_ids(Owner::Player) {
        let Some(bullet_pos) = world.registry.get(bullet_id).map(|e| e.pos) else {
            continue;
        };
        let Some(asteroid_id) =
            first_in_range(world, Category::Asteroid, bullet_pos, BULLET_ASTEROID_HIT_DIST)
        else {
            continue;
        };

        world.registry.remove(bullet_id);
        world.registry.remove(asteroid_id);
        world.stats.asteroids_destroyed += 1;
        world.emit(GameEvent::AsteroidDestroyed);
        world.add_score(SCORE_ASTEROID);
    }
}

fn player_bullets_vs_enemies(world: &mut World) {
    for bullet_id in world.registry.bullet_ids(Owner::Player) {
        let Some((bullet_pos, damage)) = world.registry.get(bullet_id).and_then(|e| match e.body {
            Body::Bullet(b) => Some((e.pos, b.damage)),
            _ => None,
        }) else {
            continue;
        };
        let Some(enemy_id) = first_in_range(world, Category::Enemy, bullet_pos, HIT_DIST) else {
            continue;
        };

        world.registry.remove(bullet_id);

        let remaining = match world.registry.get_mut(enemy_id).map(|e| &mut e.body) {
            Some(Body::Enemy(enemy)) => {
                enemy.health = enemy.health.saturating_sub(damage);
                enemy.health
            }
            _ => continue,
        };

        if remaining == 0 {
            world.registry.remove(enemy_id);
            world.stats.enemies_destroyed += 1;
            world.emit(GameEvent::EnemyDestroyed);
            world.add_score(SCORE_ENEMY);
        } else {
            world.emit(GameEvent::EnemyHit);
        }
    }
}

fn ship_vs_power_ups(world: &mut World) {
    let ship_pos = world.ship.pos;
    for id in world.registry.ids(Category::PowerUp) {
        let kind = match world.registry.get(id) {
            Some(e) if e.near(ship_pos, HIT_DIST) => match e.body {
                Body::PowerUp(p) => p.kind,
                _ => continue,
            },
            _ => continue,
        };

        world.registry.remove(id);
        let health_before = world.ship.health;
        activate_power_up(&mut world.ship, kind);
        world.stats.powerups_collected += 1;
        world.emit(GameEvent::PowerUpCollected { kind });
        if world.ship.health != health_before {
            world.emit(GameEvent::HealthChanged {
                health: world.ship.health,
            });
        }
        world.add_score(SCORE_POWERUP);
    }
}

fn enemy_bullets_vs_ship(world: &mut World) {
    let ship_pos = world.ship.pos;
    for id in world.registry.bullet_ids(Owner::Enemy) {
        let hit = world
            .registry
            .get(id)
            .is_some_and(|e| e.near(ship_pos, HIT_DIST));
        if hit {
            world.registry.remove(id);
            world.damage_ship(ENEMY_BULLET_DAMAGE);
        }
    }
}

fn ship_vs_hulls(world: &mut World) {
    let ship_pos = world.ship.pos;
    let rams = world
        .registry
        .iter()
        .filter(|e| matches!(e.body, Body::Asteroid(_) | Body::Enemy(_)))
        .filter(|e| e.near(ship_pos, HIT_DIST))
        .count();
    for _ in 0..rams {
        world.damage_ship(RAM_DAMAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Bullet, Enemy, PowerUp, PowerUpKind};

    fn asteroid_at(world: &mut World, pos: Vec3) -> EntityId {
        world.registry.add(
            pos,
            Body::Asteroid(Asteroid {
                speed: 0.02,
                spin: 0.0,
                rotation: Vec3::ZERO,
                health: ASTEROID_HEALTH,
            }),
        )
    }

    fn enemy_at(world: &mut World, pos: Vec3) -> EntityId {
        world.registry.add(
            pos,
            Body::Enemy(Enemy {
                speed: 0.01,
                health: ENEMY_HEALTH,
                shoot_timer: 0,
                shoot_interval: 120.0,
            }),
        )
    }

    fn player_bullet_at(world: &mut World, pos: Vec3) -> EntityId {
        world.registry.add(pos, Body::Bullet(Bullet::player()))
    }

    fn power_up_at(world: &mut World, pos: Vec3, kind: PowerUpKind) -> EntityId {
        world.registry.add(
            pos,
            Body::PowerUp(PowerUp {
                kind,
                speed: POWERUP_SPEED,
                spin: POWERUP_SPIN,
                rotation: Vec3::ZERO,
            }),
        )
    }

    #[test]
    fn test_bullet_destroys_asteroid_once() {
        let mut world = World::new();
        let far = Vec3::new(0.0, 0.0, -10.0);
        let bullet = player_bullet_at(&mut world, far);
        let asteroid = asteroid_at(&mut world, far + Vec3::X * 0.7);

        resolve(&mut world);
        assert!(!world.registry.contains(bullet));
        assert!(!world.registry.contains(asteroid));
        assert_eq!(world.score, SCORE_ASTEROID);
        assert_eq!(world.stats.asteroids_destroyed, 1);

        // Second pass over the same state is a no-op
        resolve(&mut world);
        assert_eq!(world.score, SCORE_ASTEROID);
    }

    #[test]
    fn test_asteroid_threshold_is_tighter() {
        let mut world = World::new();
        let far = Vec3::new(0.0, 0.0, -10.0);
        player_bullet_at(&mut world, far);
        asteroid_at(&mut world, far + Vec3::X * 0.9);
        resolve(&mut world);
        assert_eq!(world.registry.len(), 2);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_one_bullet_one_asteroid() {
        let mut world = World::new();
        let far = Vec3::new(0.0, 0.0, -10.0);
        player_bullet_at(&mut world, far);
        asteroid_at(&mut world, far + Vec3::X * 0.1);
        asteroid_at(&mut world, far - Vec3::X * 0.1);
        resolve(&mut world);
        assert_eq!(world.registry.count(Category::Asteroid), 1);
        assert_eq!(world.score, SCORE_ASTEROID);
    }

    #[test]
    fn test_enemy_takes_two_hits() {
        let mut world = World::new();
        let far = Vec3::new(2.0, 1.0, -12.0);
        let enemy = enemy_at(&mut world, far);

        player_bullet_at(&mut world, far);
        resolve(&mut world);
        match world.registry.get(enemy).map(|e| e.body) {
            Some(Body::Enemy(e)) => assert_eq!(e.health, 1),
            other => panic!("enemy should survive one hit, got {other:?}"),
        }
        assert_eq!(world.score, 0);
        assert_eq!(world.registry.bullet_count(Owner::Player), 0);

        player_bullet_at(&mut world, far);
        resolve(&mut world);
        assert!(!world.registry.contains(enemy));
        assert_eq!(world.score, SCORE_ENEMY);
        assert_eq!(world.stats.enemies_destroyed, 1);
    }

    #[test]
    fn test_two_bullets_same_tick_kill_enemy() {
        let mut world = World::new();
        let far = Vec3::new(0.0, 0.0, -12.0);
        enemy_at(&mut world, far);
        player_bullet_at(&mut world, far);
        player_bullet_at(&mut world, far + Vec3::Y * 0.2);
        resolve(&mut world);
        assert_eq!(world.registry.count(Category::Enemy), 0);
        assert_eq!(world.score, SCORE_ENEMY);
    }

    #[test]
    fn test_collect_health_power_up() {
        let mut world = World::new();
        world.ship.health = 90;
        power_up_at(&mut world, Vec3::new(0.5, 0.0, 0.0), PowerUpKind::Health);
        resolve(&mut world);

        assert_eq!(world.ship.health, 100);
        assert_eq!(world.score, SCORE_POWERUP);
        assert_eq!(world.stats.powerups_collected, 1);
        assert!(world.ship.effects.is_active(PowerUpKind::Health));
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::Health
        }));
        assert!(events.contains(&GameEvent::HealthChanged { health: 100 }));
    }

    #[test]
    fn test_enemy_bullet_hits_ship() {
        let mut world = World::new();
        let id = world
            .registry
            .add(Vec3::new(0.0, 0.5, 0.5), Body::Bullet(Bullet::enemy()));
        resolve(&mut world);
        assert!(!world.registry.contains(id));
        assert_eq!(world.ship.health, SHIP_MAX_HEALTH - ENEMY_BULLET_DAMAGE);
    }

    #[test]
    fn test_ship_ram_damage_per_object_without_destruction() {
        let mut world = World::new();
        asteroid_at(&mut world, Vec3::new(0.3, 0.0, 0.0));
        asteroid_at(&mut world, Vec3::new(-0.3, 0.0, 0.0));
        enemy_at(&mut world, Vec3::new(0.0, 0.3, 0.0));
        resolve(&mut world);
        assert_eq!(world.ship.health, SHIP_MAX_HEALTH - 3 * RAM_DAMAGE);
        assert_eq!(world.registry.len(), 3, "rammed objects survive");
    }

    #[test]
    fn test_game_over_once_with_score_at_that_instant() {
        let mut world = World::new();
        world.ship.health = 10;
        world.score = 120;
        world
            .registry
            .add(Vec3::new(0.0, 0.0, 0.2), Body::Bullet(Bullet::enemy()));
        asteroid_at(&mut world, Vec3::new(0.2, 0.0, 0.0));

        resolve(&mut world);
        assert_eq!(world.ship.health, 0);
        assert!(world.game_over);
        let overs: Vec<_> = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs, vec![GameEvent::GameOver { final_score: 120 }]);
    }

    #[test]
    fn test_shield_blocks_damage_but_consumes_bullet() {
        let mut world = World::new();
        world.ship.effects.activate(PowerUpKind::Shield);
        let bullet = world
            .registry
            .add(Vec3::new(0.0, 0.0, 0.3), Body::Bullet(Bullet::enemy()));
        asteroid_at(&mut world, Vec3::new(0.0, 0.2, 0.0));
        resolve(&mut world);
        assert!(!world.registry.contains(bullet));
        assert_eq!(world.ship.health, SHIP_MAX_HEALTH);
    }

    #[test]
    fn test_enemy_bullets_ignore_asteroids_and_enemies() {
        let mut world = World::new();
        let far = Vec3::new(4.0, 4.0, -5.0);
        world.registry.add(far, Body::Bullet(Bullet::enemy()));
        asteroid_at(&mut world, far);
        enemy_at(&mut world, far);
        resolve(&mut world);
        assert_eq!(world.registry.len(), 3);
    }
}

//! Scene assembly
//!
//! Turns the world's transforms into one flat triangle list: starfield first,
//! then every object painted far-to-near so closer shapes cover farther ones.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::{Camera, Projected};
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{Category, PowerUpKind, Transform, Variant, World};

const STAR_COUNT: usize = 1000;
/// Star size in NDC height
const STAR_SIZE: f32 = 0.003;

pub fn power_up_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::Health => colors::POWERUP_HEALTH,
        PowerUpKind::RapidFire => colors::POWERUP_RAPID_FIRE,
        PowerUpKind::MultiShot => colors::POWERUP_MULTI_SHOT,
        PowerUpKind::Shield => colors::POWERUP_SHIELD,
    }
}

pub struct Scene {
    camera: Camera,
    stars: Vec<Vec3>,
}

impl Scene {
    /// The starfield layout is fixed by `seed`
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-100.0..100.0),
                    rng.random_range(-100.0..100.0),
                    rng.random_range(-100.0..0.0),
                )
            })
            .collect();
        Self {
            camera: Camera::new(width, height),
            stars,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Vertices for one frame. With `reduced_motion` spinning objects are
    /// drawn unrotated.
    pub fn build(&self, world: &World, reduced_motion: bool) -> Vec<Vertex> {
        let aspect = self.camera.aspect();
        let mut vertices = Vec::new();

        for star in &self.stars {
            if let Some(p) = self.camera.project(*star) {
                vertices.extend(shapes::quad(
                    p.ndc,
                    Vec2::splat(STAR_SIZE),
                    aspect,
                    colors::STAR,
                ));
            }
        }

        let mut visible: Vec<(Transform, Projected)> = world
            .transforms()
            .filter_map(|t| self.camera.project(t.pos).map(|p| (t, p)))
            .collect();
        visible.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        for (transform, projected) in &visible {
            let spin = if reduced_motion {
                0.0
            } else {
                transform.rotation.y
            };
            draw(&mut vertices, transform, projected, spin, aspect);
        }

        vertices
    }
}

fn draw(out: &mut Vec<Vertex>, t: &Transform, p: &Projected, spin: f32, aspect: f32) {
    let s = p.scale;
    match t.category {
        Category::Ship => {
            out.extend(shapes::ship(p.ndc, 0.9 * s, aspect, colors::SHIP));
            out.extend(shapes::polygon(p.ndc, 0.3 * s, 12, 0.0, aspect, colors::SHIP_GLOW));
            if t.variant == Variant::Shielded {
                out.extend(shapes::ring(p.ndc, 1.1 * s, 1.25 * s, aspect, colors::SHIELD, 32));
            }
        }
        Category::Bullet => {
            let color = if t.variant == Variant::EnemyShot {
                colors::ENEMY_BULLET
            } else {
                colors::PLAYER_BULLET
            };
            out.extend(shapes::quad(p.ndc, Vec2::new(0.04, 0.15) * s, aspect, color));
        }
        Category::Asteroid => {
            out.extend(shapes::polygon(p.ndc, 0.55 * s, 7, spin, aspect, colors::ASTEROID));
        }
        Category::Enemy => {
            out.extend(shapes::quad(p.ndc, Vec2::new(0.4, 0.3) * s, aspect, colors::ENEMY));
            out.extend(shapes::quad(
                p.ndc,
                Vec2::new(0.12, 0.1) * s,
                aspect,
                colors::ENEMY_BULLET,
            ));
        }
        Category::PowerUp => {
            out.extend(shapes::polygon(p.ndc, 0.36 * s, 4, spin, aspect, colors::POWERUP));
            if let Variant::PowerUp(kind) = t.variant {
                out.extend(shapes::polygon(p.ndc, 0.18 * s, 4, spin, aspect, power_up_color(kind)));
            }
        }
    }
}

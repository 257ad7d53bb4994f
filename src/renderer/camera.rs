//! Perspective camera
//!
//! Fixed chase view: eye above and behind the ship, looking at the origin.
//! Projection runs on the CPU so the scene builder can sort and size shapes.

use glam::{Mat4, Vec2, Vec3};

pub const EYE: Vec3 = Vec3::new(0.0, 8.0, 12.0);
pub const FOV_Y_DEG: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// A world point after projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Normalized device coordinates
    pub ndc: Vec2,
    /// Distance along the view axis (larger is farther)
    pub depth: f32,
    /// NDC height of one world unit at this depth
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    aspect: f32,
    view_proj: Mat4,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: EYE,
            target: Vec3::ZERO,
            aspect: 1.0,
            view_proj: Mat4::IDENTITY,
        };
        camera.resize(width, height);
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Track the viewport aspect ratio; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), self.aspect, NEAR, FAR);
        self.view_proj = proj * view;
    }

    /// Project a world point. `None` when it is behind the near plane.
    pub fn project(&self, point: Vec3) -> Option<Projected> {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w <= NEAR {
            return None;
        }
        let focal = 1.0 / (FOV_Y_DEG.to_radians() * 0.5).tan();
        Some(Projected {
            ndc: Vec2::new(clip.x / clip.w, clip.y / clip.w),
            depth: clip.w,
            scale: focal / clip.w,
        })
    }
}

//! Vertex layout shared with `shader.wgsl`

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex: NDC position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SHIP: [f32; 4] = [0.0, 1.0, 0.53, 1.0];
    pub const SHIP_GLOW: [f32; 4] = [0.0, 0.53, 1.0, 0.6];
    pub const SHIELD: [f32; 4] = [0.4, 0.8, 1.0, 0.35];
    pub const PLAYER_BULLET: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const ENEMY_BULLET: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const ASTEROID: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const ENEMY: [f32; 4] = [1.0, 0.27, 0.27, 1.0];
    pub const POWERUP: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const POWERUP_HEALTH: [f32; 4] = [0.2, 1.0, 0.3, 1.0];
    pub const POWERUP_RAPID_FIRE: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
    pub const POWERUP_MULTI_SHOT: [f32; 4] = [0.9, 0.3, 1.0, 1.0];
    pub const POWERUP_SHIELD: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.067, 1.0];
}

//! Shape generation for flat primitives
//!
//! Everything is emitted directly in NDC. Sizes are in NDC-height units, so
//! horizontal offsets are divided by the viewport aspect to keep shapes square.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

#[inline]
fn offset(center: Vec2, radius: f32, theta: f32, aspect: f32) -> Vec2 {
    Vec2::new(
        center.x + radius * theta.cos() / aspect,
        center.y + radius * theta.sin(),
    )
}

/// Filled regular polygon, first corner at `rotation`
pub fn polygon(
    center: Vec2,
    radius: f32,
    sides: u32,
    rotation: f32,
    aspect: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((sides * 3) as usize);

    for i in 0..sides {
        let theta1 = rotation + (i as f32 / sides as f32) * 2.0 * PI;
        let theta2 = rotation + ((i + 1) as f32 / sides as f32) * 2.0 * PI;
        let a = offset(center, radius, theta1, aspect);
        let b = offset(center, radius, theta2, aspect);

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    aspect: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = offset(center, inner_radius, theta1, aspect);
        let outer1 = offset(center, outer_radius, theta1, aspect);
        let inner2 = offset(center, inner_radius, theta2, aspect);
        let outer2 = offset(center, outer_radius, theta2, aspect);

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Axis-aligned rectangle
pub fn quad(center: Vec2, half: Vec2, aspect: f32, color: [f32; 4]) -> Vec<Vertex> {
    let hx = half.x / aspect;
    let (l, r) = (center.x - hx, center.x + hx);
    let (b, t) = (center.y - half.y, center.y + half.y);
    vec![
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, t, color),
    ]
}

/// Ship silhouette: an arrowhead pointing up the screen (away from the camera)
pub fn ship(center: Vec2, size: f32, aspect: f32, color: [f32; 4]) -> Vec<Vertex> {
    let nose = offset(center, size, PI / 2.0, aspect);
    let left = offset(center, size * 0.8, PI * 1.25, aspect);
    let right = offset(center, size * 0.8, -PI * 0.25, aspect);
    let notch = offset(center, size * 0.3, -PI / 2.0, aspect);
    vec![
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(left.x, left.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(right.x, right.y, color),
    ]
}

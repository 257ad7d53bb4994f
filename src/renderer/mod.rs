//! WebGPU renderer
//!
//! Projects entity transforms through a fixed perspective camera on the CPU and
//! draws them as flat-colored shapes in a single triangle-list pass.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use camera::Camera;
pub use pipeline::{RenderInitError, RenderState};
pub use scene::Scene;
pub use vertex::Vertex;

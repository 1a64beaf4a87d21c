//! wgpu render backend for the donut scene.
//!
//! Draws the text block and one instanced torus per donut with matcap-style
//! shading. The camera follows the scene's camera path; there is no user
//! camera control.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - Until the camera path is live, frames use the initial view.

mod camera;
mod gpu;
mod mesh;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
pub use mesh::TorusShape;

//! Rendering system using wgpu for the helicopter demo.

pub mod camera;
pub mod light;
pub mod mesh;
pub mod model;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use camera::*;
pub use light::*;
pub use mesh::*;
pub use model::*;
pub use pipeline::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;

//! Core engine types for the helicopter demo.
//!
//! This crate provides the foundational pieces shared by the renderer and
//! the game loop:
//! - Frame timing
//! - Transform math helpers (Euler composition, pivot rotation)

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

//! Spatial core for a scene-graph runtime
//!
//! This crate provides:
//! - A numeric kernel (vectors, row-major matrices, quaternions)
//! - Hierarchical transforms with lazily cached world matrices
//! - Scene objects built on hecs, hosting behavior components

pub mod config;
pub mod math;
pub mod scene;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{Propagation, SceneConfig};
    pub use crate::math::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
    pub use crate::scene::{
        Component, ComponentEntry, ComponentRegistry, SceneError, SceneObject, SceneSnapshot,
        SceneWorld, Transform,
    };
}

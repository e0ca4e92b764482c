//! Four-component vector

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::ops::impl_vector_ops;
use super::vec3::Vec3;

/// A 4D vector, mostly used for homogeneous coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// All ones.
    pub const UNIT_SCALE: Self = Self::splat(1.0);

    /// Create a new vector
    #[must_use]
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Extend a 3D vector with the given `w`.
    #[must_use]
    #[inline]
    pub const fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Drop the `w` component.
    #[must_use]
    #[inline]
    pub const fn truncate(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl_vector_ops!(Vec4, 4, x, y, z, w);

impl From<glam::Vec4> for Vec4 {
    fn from(v: glam::Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vec4> for glam::Vec4 {
    fn from(v: Vec4) -> Self {
        glam::Vec4::new(v.x, v.y, v.z, v.w)
    }
}

//! Two-component vector

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::ops::impl_vector_ops;

/// A 2D vector of `f32` components.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// +X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0);
    /// +Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0);
    /// -X axis.
    pub const NEGATIVE_UNIT_X: Self = Self::new(-1.0, 0.0);
    /// -Y axis.
    pub const NEGATIVE_UNIT_Y: Self = Self::new(0.0, -1.0);
    /// All ones.
    pub const UNIT_SCALE: Self = Self::splat(1.0);

    /// Create a new vector
    #[must_use]
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The z component of the 3D cross product of two vectors lying in the XY plane.
    #[must_use]
    #[inline]
    pub fn cross_product(&self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Reflection off a plane (line) with the given unit normal.
    #[must_use]
    #[inline]
    pub fn reflect(&self, normal: Self) -> Self {
        *self - (2.0 * self.dot_product(normal) * normal)
    }
}

impl_vector_ops!(Vec2, 2, x, y);

impl From<glam::Vec2> for Vec2 {
    fn from(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vec2> for glam::Vec2 {
    fn from(v: Vec2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -4.0);

        assert_eq!(a + b, Vec2::new(4.0, -2.0));
        assert_eq!(a - b, Vec2::new(-2.0, 6.0));
        assert_eq!(a * b, Vec2::new(3.0, -8.0));
        assert_eq!(2.0 * a, Vec2::new(2.0, 4.0));
        assert_eq!(1.0 - a, Vec2::new(0.0, -1.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn test_vec2_cross_and_dot() {
        assert_eq!(Vec2::UNIT_X.cross_product(Vec2::UNIT_Y), 1.0);
        assert_eq!(Vec2::UNIT_Y.cross_product(Vec2::UNIT_X), -1.0);
        assert_eq!(Vec2::new(1.0, 2.0).dot_product(Vec2::new(3.0, 4.0)), 11.0);
    }

    #[test]
    fn test_vec2_reflect() {
        let v = Vec2::new(1.0, -1.0);
        assert_eq!(v.reflect(Vec2::UNIT_Y), Vec2::new(1.0, 1.0));
        assert_eq!(v.reflect(Vec2::UNIT_X), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_vec2_normalize_zero_is_noop() {
        let mut v = Vec2::ZERO;
        assert_eq!(v.normalize(), 0.0);
        assert_eq!(v, Vec2::ZERO);

        let mut v = Vec2::new(3.0, 4.0);
        assert_eq!(v.normalize(), 5.0);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_compound_assign() {
        let mut v = Vec2::new(2.0, 4.0);
        v += 1.0;
        v *= Vec2::new(2.0, 0.5);
        v /= 2.0;
        assert_eq!(v, Vec2::new(3.0, 1.25));
    }
}

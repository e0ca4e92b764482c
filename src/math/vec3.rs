//! Three-component vector

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ops::impl_vector_ops;
use super::quat::Quat;
use super::scalar::{self, TWO_PI};

/// A 3D vector of `f32` components.
///
/// Used for positions, directions and per-axis scale.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// +X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    /// +Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    /// +Z axis.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);
    /// -X axis.
    pub const NEGATIVE_UNIT_X: Self = Self::new(-1.0, 0.0, 0.0);
    /// -Y axis.
    pub const NEGATIVE_UNIT_Y: Self = Self::new(0.0, -1.0, 0.0);
    /// -Z axis.
    pub const NEGATIVE_UNIT_Z: Self = Self::new(0.0, 0.0, -1.0);
    /// All ones; the neutral scale.
    pub const UNIT_SCALE: Self = Self::splat(1.0);

    /// Create a new vector
    #[must_use]
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Cross product (right-handed).
    #[must_use]
    #[inline]
    pub fn cross_product(&self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Some unit vector perpendicular to this one.
    ///
    /// Crosses with +X first and falls back to +Y when the vector is
    /// (nearly) parallel to the X axis.
    #[must_use]
    pub fn perpendicular(&self) -> Self {
        let mut perp = self.cross_product(Self::UNIT_X);
        if perp.squared_length() < scalar::ZERO_LENGTH_SQUARED {
            perp = self.cross_product(Self::UNIT_Y);
        }
        perp.normalize();
        perp
    }

    /// Reflect off a plane with the given (unit) normal.
    #[must_use]
    #[inline]
    pub fn reflect(&self, normal: Self) -> Self {
        *self - (2.0 * self.dot_product(normal) * normal)
    }

    /// Deviate this direction by `angle` radians around a randomly spun axis.
    ///
    /// `up` seeds the deviation axis; pass [`Vec3::ZERO`] to use
    /// [`Self::perpendicular`]. The axis is first spun about `self` by a
    /// uniformly random angle drawn from `rng`, then `self` is rotated by
    /// `angle` about it.
    #[must_use]
    pub fn random_deviant<R: Rng>(&self, angle: f32, up: Self, rng: &mut R) -> Self {
        let up = if up == Self::ZERO {
            self.perpendicular()
        } else {
            up
        };
        let spin = Quat::from_angle_axis(scalar::random_unit(rng) * TWO_PI, *self);
        let axis = spin * up;
        Quat::from_angle_axis(angle, axis) * *self
    }
}

impl_vector_ops!(Vec3, 3, x, y, z);

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

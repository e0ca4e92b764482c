//! Rotation quaternion
//!
//! Stored as `(w, x, y, z)`. Rotation semantics (composition, Euler angle
//! extraction, vector rotation) assume unit norm; the type itself does not
//! enforce it so that intermediate blends can be represented. Call
//! [`Quat::normalize`] after anything that can denormalize.

use std::ops::{Add, Index, IndexMut, Mul, MulAssign, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::mat3::Mat3;
use super::scalar;
use super::vec3::Vec3;

/// Below `1 - SLERP_EPSILON` on |cos θ| slerp uses the sine formula;
/// above it falls back to a normalized linear blend.
const SLERP_EPSILON: f32 = 1e-3;

/// A quaternion `(w, x, y, z)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quat {
    /// All zeros; not a rotation.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Create a quaternion from its components
    #[must_use]
    #[inline]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`. The axis does not need to be normalized.
    #[must_use]
    pub fn from_angle_axis(angle: f32, axis: Vec3) -> Self {
        let half_angle = 0.5 * angle;
        let sin = half_angle.sin();
        let axis = axis.normalized();
        Self::new(half_angle.cos(), sin * axis.x, sin * axis.y, sin * axis.z)
    }

    /// Extract the rotation of a pure rotation matrix.
    ///
    /// Ken Shoemake, "Quaternion Calculus and Fast Animation", SIGGRAPH 1987.
    #[must_use]
    pub fn from_mat3(mat: &Mat3) -> Self {
        let trace = mat[0][0] + mat[1][1] + mat[2][2];

        if trace > 0.0 {
            // |w| > 1/2
            let mut root = (trace + 1.0).sqrt(); // 2w
            let w = 0.5 * root;
            root = 0.5 / root; // 1 / 4w
            Self::new(
                w,
                (mat[2][1] - mat[1][2]) * root,
                (mat[0][2] - mat[2][0]) * root,
                (mat[1][0] - mat[0][1]) * root,
            )
        } else {
            // |w| <= 1/2: start from the dominant diagonal axis
            const NEXT: [usize; 3] = [1, 2, 0];
            let mut i = 0;
            if mat[1][1] > mat[0][0] {
                i = 1;
            }
            if mat[2][2] > mat[i][i] {
                i = 2;
            }
            let j = NEXT[i];
            let k = NEXT[j];

            let mut root = (mat[i][i] - mat[j][j] - mat[k][k] + 1.0).sqrt();
            let mut xyz = [0.0; 3];
            xyz[i] = 0.5 * root;
            root = 0.5 / root;
            let w = (mat[k][j] - mat[j][k]) * root;
            xyz[j] = (mat[j][i] + mat[i][j]) * root;
            xyz[k] = (mat[k][i] + mat[i][k]) * root;
            Self::new(w, xyz[0], xyz[1], xyz[2])
        }
    }

    /// Rotation matrix of a unit quaternion.
    #[must_use]
    pub fn to_mat3(&self) -> Mat3 {
        let tx = self.x + self.x;
        let ty = self.y + self.y;
        let tz = self.z + self.z;
        let twx = tx * self.w;
        let twy = ty * self.w;
        let twz = tz * self.w;
        let txx = tx * self.x;
        let txy = ty * self.x;
        let txz = tz * self.x;
        let tyy = ty * self.y;
        let tyz = tz * self.y;
        let tzz = tz * self.z;

        Mat3::new(
            1.0 - (tyy + tzz),
            txy - twz,
            txz + twy,
            txy + twz,
            1.0 - (txx + tzz),
            tyz - twx,
            txz - twy,
            tyz + twx,
            1.0 - (txx + tyy),
        )
    }

    /// Replace with the rotation of `angle` radians about `axis`.
    pub fn set_angle_axis(&mut self, angle: f32, axis: Vec3) {
        *self = Self::from_angle_axis(angle, axis);
    }

    /// Replace with the rotation held by `mat`.
    pub fn set_mat3(&mut self, mat: &Mat3) {
        *self = Self::from_mat3(mat);
    }

    /// Four-component dot product.
    #[must_use]
    #[inline]
    pub fn dot(&self, rhs: Self) -> f32 {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Squared norm `w² + x² + y² + z²`.
    #[must_use]
    #[inline]
    pub fn norm_length(&self) -> f32 {
        self.dot(*self)
    }

    /// Normalize in place and return the previous squared norm.
    ///
    /// Unlike the vector types this does not guard against a zero norm:
    /// normalizing [`Quat::ZERO`] produces NaN components.
    pub fn normalize(&mut self) -> f32 {
        let len = self.norm_length();
        let factor = 1.0 / len.sqrt();
        *self = *self * factor;
        len
    }

    /// Returns a normalized copy.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Invert in place. A zero quaternion is left untouched.
    pub fn inverse(&mut self) {
        let norm = self.norm_length();
        if norm > 0.0 {
            let inv_norm = 1.0 / norm;
            self.w *= inv_norm;
            self.x *= -inv_norm;
            self.y *= -inv_norm;
            self.z *= -inv_norm;
        }
    }

    /// Returns the inverse.
    #[must_use]
    pub fn inversed(mut self) -> Self {
        self.inverse();
        self
    }

    /// Invert in place assuming unit norm (conjugate).
    pub fn unit_inverse(&mut self) {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
    }

    /// Rotation about the local Z axis, in radians.
    ///
    /// With `reproject_axis` the angle is measured by projecting the rotated
    /// X axis onto the XY plane; otherwise the classic Euler formula is used.
    #[must_use]
    pub fn roll(&self, reproject_axis: bool) -> f32 {
        if reproject_axis {
            let ty = 2.0 * self.y;
            let tz = 2.0 * self.z;
            let twz = tz * self.w;
            let txy = ty * self.x;
            let tyy = ty * self.y;
            let tzz = tz * self.z;
            (txy + twz).atan2(1.0 - (tyy + tzz))
        } else {
            (2.0 * (self.x * self.y + self.w * self.z))
                .atan2(self.w * self.w + self.x * self.x - self.y * self.y - self.z * self.z)
        }
    }

    /// Rotation about the local X axis, in radians.
    #[must_use]
    pub fn pitch(&self, reproject_axis: bool) -> f32 {
        if reproject_axis {
            let tx = 2.0 * self.x;
            let tz = 2.0 * self.z;
            let twx = tx * self.w;
            let txx = tx * self.x;
            let tyz = tz * self.y;
            let tzz = tz * self.z;
            (tyz + twx).atan2(1.0 - (txx + tzz))
        } else {
            (2.0 * (self.y * self.z + self.w * self.x))
                .atan2(self.w * self.w - self.x * self.x - self.y * self.y + self.z * self.z)
        }
    }

    /// Rotation about the local Y axis, in radians.
    #[must_use]
    pub fn yaw(&self, reproject_axis: bool) -> f32 {
        if reproject_axis {
            let tx = 2.0 * self.x;
            let ty = 2.0 * self.y;
            let tz = 2.0 * self.z;
            let twy = ty * self.w;
            let txx = tx * self.x;
            let txz = tz * self.x;
            let tyy = ty * self.y;
            (txz + twy).atan2(1.0 - (txx + tyy))
        } else {
            (-2.0 * (self.x * self.z - self.w * self.y)).asin()
        }
    }

    /// Returns true if any component is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        scalar::is_nan(self.x)
            || scalar::is_nan(self.y)
            || scalar::is_nan(self.z)
            || scalar::is_nan(self.w)
    }

    /// Spherical linear interpolation from `p` (t = 0) to `q` (t = 1).
    ///
    /// With `shortest_path` the arc shorter than 180° is taken. Nearly
    /// parallel (or anti-parallel) inputs fall back to a normalized linear
    /// blend.
    #[must_use]
    pub fn slerp(t: f32, p: Self, q: Self, shortest_path: bool) -> Self {
        let mut cos = p.dot(q);
        let target = if cos < 0.0 && shortest_path {
            cos = -cos;
            -q
        } else {
            q
        };

        if cos.abs() < 1.0 - SLERP_EPSILON {
            let sin = (1.0 - cos * cos).sqrt();
            let angle = sin.atan2(cos);
            let inv_sin = 1.0 / sin;
            let coeff0 = ((1.0 - t) * angle).sin() * inv_sin;
            let coeff1 = (t * angle).sin() * inv_sin;
            coeff0 * p + coeff1 * target
        } else {
            // p and q are (anti-)parallel: either direction works, blend linearly
            let mut blend = (1.0 - t) * p + t * target;
            blend.normalize();
            blend
        }
    }

    /// Normalized linear interpolation. Cheaper than [`Self::slerp`] but
    /// without constant angular velocity.
    #[must_use]
    pub fn nlerp(t: f32, p: Self, q: Self, shortest_path: bool) -> Self {
        let target = if p.dot(q) < 0.0 && shortest_path {
            -q
        } else {
            q
        };
        let mut result = p + t * (target - p);
        result.normalize();
        result
    }

    /// Spherical quadrangle interpolation between `p` and `q` with the
    /// control quaternions `a` and `b`.
    #[must_use]
    pub fn squad(t: f32, p: Self, a: Self, b: Self, q: Self, shortest_path: bool) -> Self {
        let slerp_t = 2.0 * t * (1.0 - t);
        let slerp_p = Self::slerp(t, p, q, shortest_path);
        let slerp_q = Self::slerp(t, a, b, false);
        Self::slerp(slerp_t, slerp_p, slerp_q, false)
    }

    /// Flat view of `[w, x, y, z]`.
    #[must_use]
    pub fn as_array(&self) -> &[f32; 4] {
        bytemuck::cast_ref(self)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Quat {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        debug_assert!(i < 4, "quaternion index {i} out of range");
        &self.as_array()[i]
    }
}

impl IndexMut<usize> for Quat {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        debug_assert!(i < 4, "quaternion index {i} out of range");
        let array: &mut [f32; 4] = bytemuck::cast_mut(self);
        &mut array[i]
    }
}

impl Add for Quat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Quat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.w - rhs.w, self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Quat {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

/// Hamilton product; `a * b` applies `b` first, then `a`. Not commutative.
impl Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
        )
    }
}

impl MulAssign for Quat {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Quat {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(scalar * self.w, scalar * self.x, scalar * self.y, scalar * self.z)
    }
}

impl Mul<Quat> for f32 {
    type Output = Quat;

    fn mul(self, q: Quat) -> Quat {
        q * self
    }
}

/// Rotate a vector by a unit quaternion.
impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        // nVidia SDK formulation: v + 2w (q × v) + 2 q × (q × v)
        let qvec = Vec3::new(self.x, self.y, self.z);
        let uv = qvec.cross_product(v);
        let uuv = qvec.cross_product(uv);
        v + uv * (2.0 * self.w) + uuv * 2.0
    }
}

impl From<glam::Quat> for Quat {
    fn from(q: glam::Quat) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<Quat> for glam::Quat {
    fn from(q: Quat) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

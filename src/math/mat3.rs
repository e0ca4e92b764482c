//! 3x3 matrix
//!
//! Row-major storage; a vector is transformed as `M * v`:
//!
//! ```text
//! [ m[0][0]  m[0][1]  m[0][2] ]   {x}
//! | m[1][0]  m[1][1]  m[1][2] | * {y}
//! [ m[2][0]  m[2][1]  m[2][2] ]   {z}
//! ```

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::vec3::Vec3;

/// A 3x3 matrix for linear transforms (rotation and scale).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat3 {
    m: [[f32; 3]; 3],
}

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    /// All zeros.
    pub const ZERO: Self = Self::from_rows([[0.0; 3]; 3]);

    /// Create a matrix from its entries in row order.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f32,
        m01: f32,
        m02: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m20: f32,
        m21: f32,
        m22: f32,
    ) -> Self {
        Self::from_rows([[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]])
    }

    /// Create a matrix from an array of rows.
    #[must_use]
    #[inline]
    pub const fn from_rows(m: [[f32; 3]; 3]) -> Self {
        Self { m }
    }

    /// Overwrite every entry, in row order.
    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        m00: f32,
        m01: f32,
        m02: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m20: f32,
        m21: f32,
        m22: f32,
    ) {
        *self = Self::new(m00, m01, m02, m10, m11, m12, m20, m21, m22);
    }

    /// Reset to the identity matrix.
    pub fn identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// The rows as a nested array.
    #[must_use]
    #[inline]
    pub const fn to_rows(&self) -> [[f32; 3]; 3] {
        self.m
    }

    /// Column `i` as a vector.
    #[must_use]
    pub fn col(&self, i: usize) -> Vec3 {
        Vec3::new(self.m[0][i], self.m[1][i], self.m[2][i])
    }

    /// Row `i` as a vector.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from(self.m[i])
    }

    /// Flat, row-major view of the nine entries.
    #[must_use]
    pub fn as_slice(&self) -> &[f32; 9] {
        bytemuck::cast_ref(self)
    }

    /// Transpose in place.
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let m = &self.m;
        Self::new(
            m[0][0], m[1][0], m[2][0], //
            m[0][1], m[1][1], m[2][1], //
            m[0][2], m[1][2], m[2][2],
        )
    }

    /// Determinant.
    #[must_use]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let c10 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let c20 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        m[0][0] * c00 + m[0][1] * c10 + m[0][2] * c20
    }

    /// Invert in place using cofactors.
    ///
    /// The matrix must be non-singular; a zero determinant yields
    /// infinite or NaN entries.
    pub fn inverse(&mut self) {
        *self = self.inversed();
    }

    /// Returns the inverse (adjugate over determinant).
    #[must_use]
    pub fn inversed(&self) -> Self {
        let m = &self.m;
        let d00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let d01 = m[0][2] * m[2][1] - m[0][1] * m[2][2];
        let d02 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let d10 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let d11 = m[0][0] * m[2][2] - m[0][2] * m[2][0];
        let d12 = m[0][2] * m[1][0] - m[0][0] * m[1][2];
        let d20 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let d21 = m[0][1] * m[2][0] - m[0][0] * m[2][1];
        let d22 = m[0][0] * m[1][1] - m[0][1] * m[1][0];

        let det = m[0][0] * d00 + m[0][1] * d10 + m[0][2] * d20;
        let inv_det = 1.0 / det;

        Self::new(
            d00 * inv_det,
            d01 * inv_det,
            d02 * inv_det,
            d10 * inv_det,
            d11 * inv_det,
            d12 * inv_det,
            d20 * inv_det,
            d21 * inv_det,
            d22 * inv_det,
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Mat3 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, row: usize) -> &[f32; 3] {
        debug_assert!(row < 3, "Mat3 row {row} out of range");
        &self.m[row]
    }
}

impl IndexMut<usize> for Mat3 {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut [f32; 3] {
        debug_assert!(row < 3, "Mat3 row {row} out of range");
        &mut self.m[row]
    }
}

impl Add for Mat3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut r = self;
        for (row, rhs_row) in r.m.iter_mut().zip(rhs.m.iter()) {
            for (a, b) in row.iter_mut().zip(rhs_row.iter()) {
                *a += b;
            }
        }
        r
    }
}

impl Sub for Mat3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut r = self;
        for (row, rhs_row) in r.m.iter_mut().zip(rhs.m.iter()) {
            for (a, b) in row.iter_mut().zip(rhs_row.iter()) {
                *a -= b;
            }
        }
        r
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.m;
        let b = &rhs.m;
        let mut r = [[0.0; 3]; 3];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Self::from_rows(r)
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::from_rows(self.m.map(|row| row.map(|v| v * scalar)))
    }
}

impl Mul<Mat3> for f32 {
    type Output = Mat3;

    fn mul(self, m: Mat3) -> Mat3 {
        m * self
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl From<glam::Mat3> for Mat3 {
    fn from(m: glam::Mat3) -> Self {
        // glam stores columns; its transpose's columns are our rows
        Self::from_rows(m.transpose().to_cols_array_2d())
    }
}

impl From<Mat3> for glam::Mat3 {
    fn from(m: Mat3) -> Self {
        glam::Mat3::from_cols_array_2d(&m.m).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &Mat3, b: &Mat3, eps: f32) -> bool {
        a.as_slice()
            .iter()
            .zip(b.as_slice().iter())
            .all(|(x, y)| (x - y).abs() < eps)
    }

    #[test]
    fn test_identity_times_vector() {
        assert_eq!(Mat3::IDENTITY * Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_mat3_inverse_roundtrip() {
        let m = Mat3::new(2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0);
        let product = m * m.inversed();
        assert!(approx_eq(&product, &Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn test_mat3_singular_inverse_is_not_finite() {
        let singular = Mat3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0);
        assert_eq!(singular.determinant(), 0.0);
        let inv = singular.inversed();
        assert!(inv.as_slice().iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn test_mat3_transpose_and_rows() {
        let mut m = Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(m.row(1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(m.col(1), Vec3::new(2.0, 5.0, 8.0));

        m.transpose();
        assert_eq!(m[0], [1.0, 4.0, 7.0]);
        assert_eq!(m.as_slice()[3], 2.0);
    }

    #[test]
    fn test_mat3_scalar_ops() {
        let m = Mat3::IDENTITY * 2.0;
        assert_eq!(m, 2.0 * Mat3::IDENTITY);
        assert_eq!(m - Mat3::IDENTITY, Mat3::IDENTITY);
        assert_eq!(Mat3::IDENTITY + Mat3::IDENTITY, m);
        assert_eq!(m.determinant(), 8.0);
    }

    #[test]
    fn test_mat3_matches_glam() {
        let m = Mat3::new(2.0, 0.5, 1.0, 1.0, 3.0, 0.0, 0.25, 1.0, 4.0);
        let g: glam::Mat3 = m.into();
        let v = Vec3::new(1.0, -2.0, 0.5);

        let ours = m * v;
        let theirs = Vec3::from(g * glam::Vec3::from(v));
        assert!((ours - theirs).length() < 1e-5);

        let inv = Mat3::from(g.inverse());
        assert!(approx_eq(&inv, &m.inversed(), 1e-4));
    }
}

//! 4x4 matrix
//!
//! Row-major storage; points are transformed as `M * v`:
//!
//! ```text
//! [ m[0][0]  m[0][1]  m[0][2]  m[0][3] ]   {x}
//! | m[1][0]  m[1][1]  m[1][2]  m[1][3] | * {y}
//! | m[2][0]  m[2][1]  m[2][2]  m[2][3] |   {z}
//! [ m[3][0]  m[3][1]  m[3][2]  m[3][3] ]   {1}
//! ```
//!
//! Translation lives in the last column. Factories follow OpenGL
//! conventions: right-handed view space and clip-space depth in `[-1, 1]`.

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::mat3::Mat3;
use super::quat::Quat;
use super::vec3::Vec3;
use super::vec4::Vec4;

/// A 4x4 matrix for affine and projective transforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    m: [[f32; 4]; 4],
}

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    /// All zeros.
    pub const ZERO: Self = Self::from_rows([[0.0; 4]; 4]);

    /// Create a matrix from its entries in row order.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f32,
        m01: f32,
        m02: f32,
        m03: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m13: f32,
        m20: f32,
        m21: f32,
        m22: f32,
        m23: f32,
        m30: f32,
        m31: f32,
        m32: f32,
        m33: f32,
    ) -> Self {
        Self::from_rows([
            [m00, m01, m02, m03],
            [m10, m11, m12, m13],
            [m20, m21, m22, m23],
            [m30, m31, m32, m33],
        ])
    }

    /// Create a matrix from an array of rows.
    #[must_use]
    #[inline]
    pub const fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    /// Overwrite every entry from an array of rows.
    pub fn set(&mut self, m: [[f32; 4]; 4]) {
        self.m = m;
    }

    /// Reset to the identity matrix.
    pub fn identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// The rows as a nested array.
    #[must_use]
    #[inline]
    pub const fn to_rows(&self) -> [[f32; 4]; 4] {
        self.m
    }

    /// Row `i` as a vector.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec4 {
        Vec4::from(self.m[i])
    }

    /// Column `i` as a vector.
    #[must_use]
    pub fn col(&self, i: usize) -> Vec4 {
        Vec4::new(self.m[0][i], self.m[1][i], self.m[2][i], self.m[3][i])
    }

    /// Flat, row-major view of the sixteen entries.
    #[must_use]
    pub fn as_slice(&self) -> &[f32; 16] {
        bytemuck::cast_ref(self)
    }

    /// The translation column.
    #[must_use]
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// The upper-left 3x3 block (rotation and scale).
    #[must_use]
    pub fn linear(&self) -> Mat3 {
        let m = &self.m;
        Mat3::new(
            m[0][0], m[0][1], m[0][2], //
            m[1][0], m[1][1], m[1][2], //
            m[2][0], m[2][1], m[2][2],
        )
    }

    // -------------------------------------------------------------------------
    // Factories
    // -------------------------------------------------------------------------

    /// Pure translation.
    #[must_use]
    pub fn translation(trans: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.make_translation(trans);
        m
    }

    /// Pure rotation from a unit quaternion.
    #[must_use]
    pub fn rotation(rot: Quat) -> Self {
        let mut m = Self::IDENTITY;
        m.make_rotation(rot);
        m
    }

    /// Pure per-axis scale.
    #[must_use]
    pub fn scale(scl: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.make_scale(scl);
        m
    }

    /// Translation * rotation * scale.
    #[must_use]
    pub fn transform(position: Vec3, scale: Vec3, orientation: Quat) -> Self {
        let mut m = Self::IDENTITY;
        m.make_transform(position, scale, orientation);
        m
    }

    /// Right-handed view matrix looking from `eye` towards `center`.
    #[must_use]
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.make_look_at(eye, center, up);
        m
    }

    /// Orthographic projection onto OpenGL clip space.
    #[must_use]
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, z_near: f32, z_far: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.make_ortho(left, right, bottom, top, z_near, z_far);
        m
    }

    /// Perspective projection; `fovy` is the vertical field of view in radians.
    #[must_use]
    pub fn perspective(fovy: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.make_perspective(fovy, aspect_ratio, z_near, z_far);
        m
    }

    /// Overwrite with a pure translation.
    pub fn make_translation(&mut self, trans: Vec3) {
        *self = Self::new(
            1.0, 0.0, 0.0, trans.x, //
            0.0, 1.0, 0.0, trans.y, //
            0.0, 0.0, 1.0, trans.z, //
            0.0, 0.0, 0.0, 1.0,
        );
    }

    /// Overwrite with a pure rotation.
    pub fn make_rotation(&mut self, rot: Quat) {
        let r = rot.to_mat3();
        *self = Self::new(
            r[0][0], r[0][1], r[0][2], 0.0, //
            r[1][0], r[1][1], r[1][2], 0.0, //
            r[2][0], r[2][1], r[2][2], 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
    }

    /// Overwrite with a pure scale.
    pub fn make_scale(&mut self, scl: Vec3) {
        *self = Self::new(
            scl.x, 0.0, 0.0, 0.0, //
            0.0, scl.y, 0.0, 0.0, //
            0.0, 0.0, scl.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
    }

    /// Overwrite with `T * R * S`: scale first, then rotate, then translate.
    pub fn make_transform(&mut self, position: Vec3, scale: Vec3, orientation: Quat) {
        let r = orientation.to_mat3();
        *self = Self::new(
            r[0][0] * scale.x,
            r[0][1] * scale.y,
            r[0][2] * scale.z,
            position.x,
            r[1][0] * scale.x,
            r[1][1] * scale.y,
            r[1][2] * scale.z,
            position.y,
            r[2][0] * scale.x,
            r[2][1] * scale.y,
            r[2][2] * scale.z,
            position.z,
            0.0,
            0.0,
            0.0,
            1.0,
        );
    }

    /// Overwrite with a right-handed view matrix (camera looks down -Z).
    pub fn make_look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let f = (center - eye).normalized();
        let s = f.cross_product(up).normalized();
        let u = s.cross_product(f);

        *self = Self::new(
            s.x,
            s.y,
            s.z,
            -s.dot_product(eye),
            u.x,
            u.y,
            u.z,
            -u.dot_product(eye),
            -f.x,
            -f.y,
            -f.z,
            f.dot_product(eye),
            0.0,
            0.0,
            0.0,
            1.0,
        );
    }

    /// Overwrite with an orthographic projection.
    pub fn make_ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) {
        let inv_width = 1.0 / (right - left);
        let inv_height = 1.0 / (top - bottom);
        let inv_depth = 1.0 / (z_far - z_near);

        *self = Self::new(
            2.0 * inv_width,
            0.0,
            0.0,
            -(right + left) * inv_width,
            0.0,
            2.0 * inv_height,
            0.0,
            -(top + bottom) * inv_height,
            0.0,
            0.0,
            -2.0 * inv_depth,
            -(z_far + z_near) * inv_depth,
            0.0,
            0.0,
            0.0,
            1.0,
        );
    }

    /// Overwrite with a perspective projection.
    pub fn make_perspective(&mut self, fovy: f32, aspect_ratio: f32, z_near: f32, z_far: f32) {
        let focal = 1.0 / (0.5 * fovy).tan();
        let inv_range = 1.0 / (z_near - z_far);

        *self = Self::new(
            focal / aspect_ratio,
            0.0,
            0.0,
            0.0,
            0.0,
            focal,
            0.0,
            0.0,
            0.0,
            0.0,
            (z_far + z_near) * inv_range,
            2.0 * z_far * z_near * inv_range,
            0.0,
            0.0,
            -1.0,
            0.0,
        );
    }

    /// Split a TRS matrix into `(position, scale, orientation)`.
    ///
    /// Assumes the matrix was built without shear. A negative determinant is
    /// attributed to the X scale.
    #[must_use]
    pub fn decomposition(&self) -> (Vec3, Vec3, Quat) {
        let position = self.translation_part();
        let linear = self.linear();

        let mut scale = Vec3::new(
            linear.col(0).length(),
            linear.col(1).length(),
            linear.col(2).length(),
        );
        if linear.determinant() < 0.0 {
            scale.x = -scale.x;
        }

        let mut rot = linear;
        for row in 0..3 {
            rot[row][0] /= scale.x;
            rot[row][1] /= scale.y;
            rot[row][2] /= scale.z;
        }
        let mut orientation = Quat::from_mat3(&rot);
        orientation.normalize();

        (position, scale, orientation)
    }

    // -------------------------------------------------------------------------
    // Transpose / inverse
    // -------------------------------------------------------------------------

    /// Transpose in place.
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = self.m[j][i];
            }
        }
        Self::from_rows(r)
    }

    /// Determinant (cofactor expansion along the first row).
    #[must_use]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        let v0 = m[2][0] * m[3][1] - m[2][1] * m[3][0];
        let v1 = m[2][0] * m[3][2] - m[2][2] * m[3][0];
        let v2 = m[2][0] * m[3][3] - m[2][3] * m[3][0];
        let v3 = m[2][1] * m[3][2] - m[2][2] * m[3][1];
        let v4 = m[2][1] * m[3][3] - m[2][3] * m[3][1];
        let v5 = m[2][2] * m[3][3] - m[2][3] * m[3][2];

        let c00 = v5 * m[1][1] - v4 * m[1][2] + v3 * m[1][3];
        let c01 = -(v5 * m[1][0] - v2 * m[1][2] + v1 * m[1][3]);
        let c02 = v4 * m[1][0] - v2 * m[1][1] + v0 * m[1][3];
        let c03 = -(v3 * m[1][0] - v1 * m[1][1] + v0 * m[1][2]);

        c00 * m[0][0] + c01 * m[0][1] + c02 * m[0][2] + c03 * m[0][3]
    }

    /// Invert in place.
    ///
    /// The matrix must be non-singular; a zero determinant yields infinite
    /// or NaN entries.
    pub fn inverse(&mut self) {
        *self = self.inversed();
    }

    /// Returns the inverse, computed as the adjugate over the determinant
    /// with shared 2x2 sub-determinants.
    #[must_use]
    pub fn inversed(&self) -> Self {
        let [
            [m00, m01, m02, m03],
            [m10, m11, m12, m13],
            [m20, m21, m22, m23],
            [m30, m31, m32, m33],
        ] = self.m;

        // 2x2 minors of rows 2 and 3
        let mut v0 = m20 * m31 - m21 * m30;
        let mut v1 = m20 * m32 - m22 * m30;
        let mut v2 = m20 * m33 - m23 * m30;
        let mut v3 = m21 * m32 - m22 * m31;
        let mut v4 = m21 * m33 - m23 * m31;
        let mut v5 = m22 * m33 - m23 * m32;

        let t00 = v5 * m11 - v4 * m12 + v3 * m13;
        let t10 = -(v5 * m10 - v2 * m12 + v1 * m13);
        let t20 = v4 * m10 - v2 * m11 + v0 * m13;
        let t30 = -(v3 * m10 - v1 * m11 + v0 * m12);

        let inv_det = 1.0 / (t00 * m00 + t10 * m01 + t20 * m02 + t30 * m03);

        let d00 = t00 * inv_det;
        let d10 = t10 * inv_det;
        let d20 = t20 * inv_det;
        let d30 = t30 * inv_det;

        let d01 = -(v5 * m01 - v4 * m02 + v3 * m03) * inv_det;
        let d11 = (v5 * m00 - v2 * m02 + v1 * m03) * inv_det;
        let d21 = -(v4 * m00 - v2 * m01 + v0 * m03) * inv_det;
        let d31 = (v3 * m00 - v1 * m01 + v0 * m02) * inv_det;

        // 2x2 minors of rows 1 and 3
        v0 = m10 * m31 - m11 * m30;
        v1 = m10 * m32 - m12 * m30;
        v2 = m10 * m33 - m13 * m30;
        v3 = m11 * m32 - m12 * m31;
        v4 = m11 * m33 - m13 * m31;
        v5 = m12 * m33 - m13 * m32;

        let d02 = (v5 * m01 - v4 * m02 + v3 * m03) * inv_det;
        let d12 = -(v5 * m00 - v2 * m02 + v1 * m03) * inv_det;
        let d22 = (v4 * m00 - v2 * m01 + v0 * m03) * inv_det;
        let d32 = -(v3 * m00 - v1 * m01 + v0 * m02) * inv_det;

        // 2x2 minors of rows 1 and 2
        v0 = m21 * m10 - m20 * m11;
        v1 = m22 * m10 - m20 * m12;
        v2 = m23 * m10 - m20 * m13;
        v3 = m22 * m11 - m21 * m12;
        v4 = m23 * m11 - m21 * m13;
        v5 = m23 * m12 - m22 * m13;

        let d03 = -(v5 * m01 - v4 * m02 + v3 * m03) * inv_det;
        let d13 = (v5 * m00 - v2 * m02 + v1 * m03) * inv_det;
        let d23 = -(v4 * m00 - v2 * m01 + v0 * m03) * inv_det;
        let d33 = (v3 * m00 - v1 * m01 + v0 * m02) * inv_det;

        Self::new(
            d00, d01, d02, d03, //
            d10, d11, d12, d13, //
            d20, d21, d22, d23, //
            d30, d31, d32, d33,
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Quat> for Mat4 {
    fn from(rot: Quat) -> Self {
        Self::rotation(rot)
    }
}

impl From<Vec3> for Mat4 {
    fn from(trans: Vec3) -> Self {
        Self::translation(trans)
    }
}

impl Index<usize> for Mat4 {
    type Output = [f32; 4];

    #[inline]
    fn index(&self, row: usize) -> &[f32; 4] {
        debug_assert!(row < 4, "Mat4 row {row} out of range");
        &self.m[row]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut [f32; 4] {
        debug_assert!(row < 4, "Mat4 row {row} out of range");
        &mut self.m[row]
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.m;
        let b = &rhs.m;
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value =
                    a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j] + a[i][3] * b[3][j];
            }
        }
        Self::from_rows(r)
    }
}

/// Transform a point, dividing by the resulting homogeneous `w`.
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        let m = &self.m;
        let inv_w = 1.0 / (m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3]);
        Vec3::new(
            (m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3]) * inv_w,
            (m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3]) * inv_w,
            (m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3]) * inv_w,
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        )
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::from_rows(self.m.map(|row| row.map(|v| v * scalar)))
    }
}

impl Add for Mat4 {
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

impl Sub for Mat4 {
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

impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Self::from_rows(m.transpose().to_cols_array_2d())
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array_2d(&m.m).transpose()
    }
}

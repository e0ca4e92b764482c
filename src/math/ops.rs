//! Componentwise operators shared by [`Vec2`](super::Vec2), [`Vec3`](super::Vec3)
//! and [`Vec4`](super::Vec4).
//!
//! Every vector is a `#[repr(C)]` struct of `f32` fields, so the same set of
//! arithmetic operators, compound assignments and predicates is generated
//! here from the field list.

macro_rules! impl_vector_ops {
    ($ty:ident, $n:literal, $($field:ident),+) => {
        impl $ty {
            /// Creates a vector with every component set to `value`.
            #[must_use]
            #[inline]
            pub const fn splat(value: f32) -> Self {
                Self { $($field: value),+ }
            }

            /// Dot product.
            #[must_use]
            #[inline]
            pub fn dot_product(&self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            /// Squared length; cheaper than [`Self::length`].
            #[must_use]
            #[inline]
            pub fn squared_length(&self) -> f32 {
                self.dot_product(*self)
            }

            /// Euclidean length.
            #[must_use]
            #[inline]
            pub fn length(&self) -> f32 {
                self.squared_length().sqrt()
            }

            /// Distance to another point.
            #[must_use]
            #[inline]
            pub fn distance(&self, rhs: Self) -> f32 {
                (*self - rhs).length()
            }

            /// Squared distance to another point.
            #[must_use]
            #[inline]
            pub fn squared_distance(&self, rhs: Self) -> f32 {
                (*self - rhs).squared_length()
            }

            /// Normalizes in place and returns the previous length.
            ///
            /// A zero-length vector is left untouched.
            pub fn normalize(&mut self) -> f32 {
                let length = self.length();
                if length > 0.0 {
                    let inv_length = 1.0 / length;
                    $(self.$field *= inv_length;)+
                }
                length
            }

            /// Returns a normalized copy; zero-length vectors are returned unchanged.
            #[must_use]
            pub fn normalized(mut self) -> Self {
                self.normalize();
                self
            }

            /// Returns true if any component is NaN.
            #[must_use]
            #[inline]
            pub fn is_nan(&self) -> bool {
                false $(|| $crate::math::scalar::is_nan(self.$field))+
            }

            /// Returns true if the squared length is below `1e-12`.
            #[must_use]
            #[inline]
            pub fn is_zero_length(&self) -> bool {
                self.squared_length() < $crate::math::scalar::ZERO_LENGTH_SQUARED
            }

            /// True if every component is strictly less than the matching one in `rhs`.
            #[must_use]
            pub fn all_lt(&self, rhs: Self) -> bool {
                true $(&& self.$field < rhs.$field)+
            }

            /// True if every component is less than or equal to the matching one in `rhs`.
            #[must_use]
            pub fn all_le(&self, rhs: Self) -> bool {
                true $(&& self.$field <= rhs.$field)+
            }

            /// True if every component is strictly greater than the matching one in `rhs`.
            #[must_use]
            pub fn all_gt(&self, rhs: Self) -> bool {
                true $(&& self.$field > rhs.$field)+
            }

            /// True if every component is greater than or equal to the matching one in `rhs`.
            #[must_use]
            pub fn all_ge(&self, rhs: Self) -> bool {
                true $(&& self.$field >= rhs.$field)+
            }

            /// Components as a flat array.
            #[must_use]
            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            /// Borrow the components as a flat array.
            #[must_use]
            #[inline]
            pub fn as_array(&self) -> &[f32; $n] {
                bytemuck::cast_ref(self)
            }

            /// Mutably borrow the components as a flat array.
            #[inline]
            pub fn as_array_mut(&mut self) -> &mut [f32; $n] {
                bytemuck::cast_mut(self)
            }
        }

        impl From<[f32; $n]> for $ty {
            fn from(array: [f32; $n]) -> Self {
                bytemuck::cast(array)
            }
        }

        impl From<$ty> for [f32; $n] {
            fn from(v: $ty) -> Self {
                v.to_array()
            }
        }

        impl ::std::ops::Index<usize> for $ty {
            type Output = f32;

            #[inline]
            fn index(&self, i: usize) -> &f32 {
                debug_assert!(i < $n, "vector index {i} out of range");
                &self.as_array()[i]
            }
        }

        impl ::std::ops::IndexMut<usize> for $ty {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut f32 {
                debug_assert!(i < $n, "vector index {i} out of range");
                &mut self.as_array_mut()[i]
            }
        }

        impl ::std::ops::Neg for $ty {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl ::std::ops::Add for $ty {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl ::std::ops::Add<f32> for $ty {
            type Output = Self;

            #[inline]
            fn add(self, rhs: f32) -> Self {
                Self { $($field: self.$field + rhs),+ }
            }
        }

        impl ::std::ops::Add<$ty> for f32 {
            type Output = $ty;

            #[inline]
            fn add(self, rhs: $ty) -> $ty {
                $ty { $($field: self + rhs.$field),+ }
            }
        }

        impl ::std::ops::Sub for $ty {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl ::std::ops::Sub<f32> for $ty {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: f32) -> Self {
                Self { $($field: self.$field - rhs),+ }
            }
        }

        impl ::std::ops::Sub<$ty> for f32 {
            type Output = $ty;

            #[inline]
            fn sub(self, rhs: $ty) -> $ty {
                $ty { $($field: self - rhs.$field),+ }
            }
        }

        impl ::std::ops::Mul for $ty {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl ::std::ops::Mul<f32> for $ty {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl ::std::ops::Mul<$ty> for f32 {
            type Output = $ty;

            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                $ty { $($field: self * rhs.$field),+ }
            }
        }

        impl ::std::ops::Div for $ty {
            type Output = Self;

            #[inline]
            fn div(self, rhs: Self) -> Self {
                Self { $($field: self.$field / rhs.$field),+ }
            }
        }

        impl ::std::ops::Div<f32> for $ty {
            type Output = Self;

            #[inline]
            fn div(self, rhs: f32) -> Self {
                debug_assert!(rhs != 0.0, "division of a vector by zero");
                let inv = 1.0 / rhs;
                Self { $($field: self.$field * inv),+ }
            }
        }

        impl ::std::ops::Div<$ty> for f32 {
            type Output = $ty;

            #[inline]
            fn div(self, rhs: $ty) -> $ty {
                $ty { $($field: self / rhs.$field),+ }
            }
        }

        impl ::std::ops::AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl ::std::ops::AddAssign<f32> for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: f32) {
                $(self.$field += rhs;)+
            }
        }

        impl ::std::ops::SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl ::std::ops::SubAssign<f32> for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: f32) {
                $(self.$field -= rhs;)+
            }
        }

        impl ::std::ops::MulAssign for $ty {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                $(self.$field *= rhs.$field;)+
            }
        }

        impl ::std::ops::MulAssign<f32> for $ty {
            #[inline]
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$field *= rhs;)+
            }
        }

        impl ::std::ops::DivAssign for $ty {
            #[inline]
            fn div_assign(&mut self, rhs: Self) {
                $(self.$field /= rhs.$field;)+
            }
        }

        impl ::std::ops::DivAssign<f32> for $ty {
            #[inline]
            fn div_assign(&mut self, rhs: f32) {
                debug_assert!(rhs != 0.0, "division of a vector by zero");
                let inv = 1.0 / rhs;
                $(self.$field *= inv;)+
            }
        }
    };
}

pub(crate) use impl_vector_ops;

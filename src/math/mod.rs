//! Numeric kernel
//!
//! Small value types for spatial work: vectors, row-major matrices and
//! rotation quaternions. All components are `f32`. Every type is `Pod` so
//! it can be viewed as a flat float array, and converts to and from the
//! matching [`glam`] type for interop.

mod mat3;
mod mat4;
mod ops;
mod quat;
pub mod scalar;
mod vec2;
mod vec3;
mod vec4;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;

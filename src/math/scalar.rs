//! Scalar constants and helpers shared by the vector, matrix and quaternion types.

use rand::Rng;

/// π
pub const PI: f32 = std::f32::consts::PI;
/// 2π
pub const TWO_PI: f32 = std::f32::consts::TAU;
/// π / 2
pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
/// π / 4
pub const QUARTER_PI: f32 = std::f32::consts::FRAC_PI_4;
/// Multiply degrees by this to get radians.
pub const DEGREE_TO_RADIAN: f32 = PI / 180.0;
/// Multiply radians by this to get degrees.
pub const RADIAN_TO_DEGREE: f32 = 180.0 / PI;

/// Squared-length threshold under which a vector counts as zero length.
pub(crate) const ZERO_LENGTH_SQUARED: f32 = 1e-6 * 1e-6;

/// Returns true if `value` is NaN.
#[must_use]
#[inline]
pub fn is_nan(value: f32) -> bool {
    value.is_nan()
}

/// Draws a uniformly distributed value in `[0, 1]` from the caller's generator.
#[must_use]
pub fn random_unit<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(0.0..=1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_is_nan() {
        assert!(is_nan(f32::NAN));
        assert!(!is_nan(0.0));
        assert!(!is_nan(f32::INFINITY));
    }

    #[test]
    fn test_angle_conversion() {
        assert!((180.0 * DEGREE_TO_RADIAN - PI).abs() < 1e-6);
        assert!((HALF_PI * RADIAN_TO_DEGREE - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_random_unit_is_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..32 {
            let value = random_unit(&mut a);
            assert!((0.0..=1.0).contains(&value));
            assert_eq!(value.to_bits(), random_unit(&mut b).to_bits());
        }
    }
}

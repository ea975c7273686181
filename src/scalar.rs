use core::fmt::Debug;
use nalgebra::RealField;

/// The scalar type used by all attitude parameterizations.
///
/// Any `nalgebra` real field qualifies, most notably `f32` and `f64`.
pub trait Real: RealField + Copy + Debug {}

impl<T> Real for T where T: RealField + Copy + Debug {}

/// Converts an `f64` literal into the scalar type `T`.
#[inline(always)]
pub(crate) fn lit<T: Real>(value: f64) -> T {
    nalgebra::convert::<f64, T>(value)
}

/// Converts a scalar back into `f64`, e.g. for error reporting.
#[inline]
pub(crate) fn to_f64<T: Real>(value: T) -> f64 {
    let value: Option<f64> = value.to_subset();
    value.unwrap_or(f64::NAN)
}

/// The machine epsilon of `T`.
#[inline]
pub(crate) fn machine_epsilon<T: Real>() -> T {
    T::default_epsilon()
}

pub trait NearZero<T> {
    /// Determines whether the value lies within `tolerance` of zero.
    ///
    /// Used to detect the singular boundaries of the three-parameter sets,
    /// e.g. a vanishing denominator in a CRP composition.
    ///
    /// ## Arguments
    /// * `tolerance` - The absolute tolerance, e.g. `1e-12`.
    fn is_near_zero(&self, tolerance: T) -> bool;
}

impl<T> NearZero<T> for T
where
    T: Real,
{
    #[inline]
    fn is_near_zero(&self, tolerance: T) -> bool {
        (*self).abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero_f32() {
        // The detection tolerance.
        const TOLERANCE: f32 = 0.1;

        // The value to use for testing the tolerance. We use a value less than
        // the tolerance here to account for floating-point rounding issues.
        const TOLERANCE_TEST: f32 = TOLERANCE * 0.99;

        assert!(0.0_f32.is_near_zero(TOLERANCE));
        assert!(TOLERANCE_TEST.is_near_zero(TOLERANCE));
        assert!((-TOLERANCE_TEST).is_near_zero(TOLERANCE));
        assert!(!1.0_f32.is_near_zero(TOLERANCE));
        assert!(!(-1.0_f32).is_near_zero(TOLERANCE));
    }

    #[test]
    fn test_near_zero_f64() {
        const TOLERANCE: f64 = 1e-12;
        const TOLERANCE_TEST: f64 = TOLERANCE * 0.99;

        assert!(0.0_f64.is_near_zero(TOLERANCE));
        assert!(TOLERANCE_TEST.is_near_zero(TOLERANCE));
        assert!((-TOLERANCE_TEST).is_near_zero(TOLERANCE));
        assert!(!1e-6_f64.is_near_zero(TOLERANCE));
    }

    #[test]
    fn test_literal_conversion() {
        assert_eq!(lit::<f64>(0.25), 0.25);
        assert_eq!(lit::<f32>(0.5), 0.5_f32);
        assert_eq!(to_f64(2.0_f32), 2.0);
    }
}

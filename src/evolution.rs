//! Kinematic differential equations mapping body rates to parameter rates.

use crate::scalar::lit;
use crate::{BodyRate, Crp, Mrp, Quaternion, Real};
use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

/// The kinematic differential equation of an attitude parameterization.
pub trait Kinematics<T> {
    /// The time derivative of the parameter set.
    type Rate;

    /// Maps the body angular rate `omega` onto the parameter rate at the
    /// current attitude.
    fn rate(&self, omega: &BodyRate<T>) -> Self::Rate;
}

impl<T> Kinematics<T> for Crp<T>
where
    T: Real,
{
    type Rate = Vector3<T>;

    /// `q̇ = ½·[I + q̃ + qqᵀ]·ω`
    fn rate(&self, omega: &BodyRate<T>) -> Self::Rate {
        let (q1, q2, q3) = (self.q1, self.q2, self.q3);
        let one = T::one();

        let m = Matrix3::new(
            one + q1 * q1,
            q1 * q2 - q3,
            q1 * q3 + q2,
            q1 * q2 + q3,
            one + q2 * q2,
            q2 * q3 - q1,
            q1 * q3 - q2,
            q2 * q3 + q1,
            one + q3 * q3,
        );

        m * omega.to_vector() * lit::<T>(0.5)
    }
}

impl<T> Kinematics<T> for Mrp<T>
where
    T: Real,
{
    type Rate = Vector3<T>;

    /// `ṡ = ¼·[(1 − s²)·I + 2s̃ + 2ssᵀ]·ω`
    fn rate(&self, omega: &BodyRate<T>) -> Self::Rate {
        let (s1, s2, s3) = (self.s1, self.s2, self.s3);
        let one = T::one();
        let two = one + one;
        let diagonal = one - self.norm_sq();

        let m = Matrix3::new(
            diagonal + two * s1 * s1,
            two * (s1 * s2 - s3),
            two * (s1 * s3 + s2),
            two * (s1 * s2 + s3),
            diagonal + two * s2 * s2,
            two * (s2 * s3 - s1),
            two * (s1 * s3 - s2),
            two * (s2 * s3 + s1),
            diagonal + two * s3 * s3,
        );

        m * omega.to_vector() * lit::<T>(0.25)
    }
}

impl<T> Kinematics<T> for Quaternion<T>
where
    T: Real,
{
    type Rate = Vector4<T>;

    /// `ḃ = ½·B(b)·(0, ω)`
    fn rate(&self, omega: &BodyRate<T>) -> Self::Rate {
        euler_parameter_rates(self.b(), omega)
    }
}

/// Calculates `ḃ = ½·B(b)·(0, ω)` for a raw Euler parameter vector.
///
/// Integrated states drift off the unit sphere, so each row of `B(b)` is
/// scaled back to unit length before it is applied. A zero vector `b` has
/// no attitude and yields a zero rate.
pub fn euler_parameter_rates<T>(b: &Vector4<T>, omega: &BodyRate<T>) -> Vector4<T>
where
    T: Real,
{
    let (b0, b1, b2, b3) = (b[0], b[1], b[2], b[3]);

    // Every row of B(b) is a signed permutation of b, so they share its norm.
    let norm = b.norm();
    if norm == T::zero() {
        return Vector4::zeros();
    }

    let m = Matrix4::new(
        b0, -b1, -b2, -b3, //
        b1, b0, -b3, b2, //
        b2, b3, b0, -b1, //
        b3, -b2, b1, b0,
    );

    let omega = Vector4::new(T::zero(), omega.omega_x, omega.omega_y, omega.omega_z);
    m * omega * (lit::<T>(0.5) / norm)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::NearZero;
    use approx::assert_relative_eq;

    fn sample() -> Quaternion<f64> {
        Quaternion::from_vector(Vector4::new(0.9, 0.1, -0.3, 0.2).normalize()).unwrap()
    }

    #[test]
    fn test_zero_rate() {
        let b = sample();
        let zero = BodyRate::zero();
        assert_eq!(b.rate(&zero), Vector4::zeros());
        assert_eq!(b.to_crp().unwrap().rate(&zero), Vector3::zeros());
        assert_eq!(b.to_mrp().unwrap().rate(&zero), Vector3::zeros());
    }

    #[test]
    fn test_rate_is_tangent_to_unit_sphere() {
        let b = sample();
        let rate = b.rate(&BodyRate::new(0.1, -0.2, 0.3));
        assert!(b.b().dot(&rate).is_near_zero(1e-15));
    }

    #[test]
    fn test_small_step_keeps_unit_norm() {
        let b = *sample().b();
        let dt = 1e-4;
        let next = b + euler_parameter_rates(&b, &BodyRate::new(0.1, -0.2, 0.3)) * dt;
        assert_relative_eq!(next.norm(), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_drifted_state_is_renormalized() {
        let b = *sample().b();
        let omega = BodyRate::new(0.1, -0.2, 0.3);
        let unit = euler_parameter_rates(&b, &omega);
        let drifted = euler_parameter_rates(&(b * 1.5), &omega);
        assert_relative_eq!(unit, drifted, epsilon = 1e-15);
    }

    #[test]
    fn test_spin_about_z() {
        let rate = Quaternion::<f64>::identity().rate(&BodyRate::new(0.0, 0.0, 2.0));
        assert_eq!(rate, Vector4::new(0.0, 0.0, 0.0, 1.0));
    }

    /// The CRP and MRP rates must agree with the derivative of the
    /// quaternion trajectory mapped into each parameter set.
    #[test]
    fn test_consistent_with_quaternion_rates() {
        let b = sample();
        let omega = BodyRate::new(0.1, -0.2, 0.3);
        let h = 1e-7;

        let next = b.b() + b.rate(&omega) * h;
        let next = Quaternion::from_vector(next.normalize()).unwrap();

        let crp_rate = (next.to_crp().unwrap().to_vector() - b.to_crp().unwrap().to_vector()) / h;
        assert_relative_eq!(
            crp_rate,
            b.to_crp().unwrap().rate(&omega),
            epsilon = 1e-6
        );

        let mrp_rate = (next.to_mrp().unwrap().to_vector() - b.to_mrp().unwrap().to_vector()) / h;
        assert_relative_eq!(
            mrp_rate,
            b.to_mrp().unwrap().rate(&omega),
            epsilon = 1e-6
        );
    }
}

use crate::{impl_three_component, Quaternion, Real};
use nalgebra::{Matrix3, Vector3};
use uniform_array_derive::UniformArray;

/// Classical Rodrigues Parameters, `q = ê·tan(θ/2)`.
///
/// The set is singular for a principal rotation of 180°, where the
/// parameters grow without bound.
#[derive(UniformArray, Copy)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Crp<T> {
    pub q1: T,
    pub q2: T,
    pub q3: T,
}

impl<T> Crp<T>
where
    T: Real,
{
    /// The CRP set of the identity rotation.
    #[inline]
    pub fn identity() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Calculates the squared norm `q·q`, i.e. `tan²(θ/2)`.
    #[inline]
    pub fn norm_sq(&self) -> T {
        self.q1 * self.q1 + self.q2 * self.q2 + self.q3 * self.q3
    }

    /// Converts into Euler parameters, `b = (1, q) / √(1 + q·q)`.
    ///
    /// This never fails since every finite CRP set describes a rotation
    /// other than 180°.
    pub fn to_quaternion(&self) -> Quaternion<T> {
        let scale = (T::one() + self.norm_sq()).sqrt().recip();
        Quaternion::from_unit_vector_unchecked(nalgebra::Vector4::new(
            scale,
            self.q1 * scale,
            self.q2 * scale,
            self.q3 * scale,
        ))
    }

    /// Builds the direction cosine matrix described by this parameter set.
    pub fn to_dcm(&self) -> Matrix3<T> {
        *self.to_quaternion().dcm()
    }
}

impl<T> From<Vector3<T>> for Crp<T>
where
    T: Real,
{
    #[inline]
    fn from(value: Vector3<T>) -> Self {
        Self::from_vector(&value)
    }
}

impl_three_component!(Crp, q1, q2, q3);

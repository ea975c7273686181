use crate::error::{Result, Singularity};
use crate::{impl_three_component, Quaternion, Real};
use nalgebra::{Matrix3, Vector3};
use uniform_array_derive::UniformArray;

/// Modified Rodrigues Parameters, `s = ê·tan(θ/4)`.
///
/// Every attitude has two MRP descriptions, `s` and its shadow set
/// `−s/(s·s)`. Switching between them keeps `|s| ≤ 1` and steers clear of
/// the singularity at 360°.
#[derive(UniformArray, Copy)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Mrp<T> {
    pub s1: T,
    pub s2: T,
    pub s3: T,
}

impl<T> Mrp<T>
where
    T: Real,
{
    /// The MRP set of the identity rotation.
    #[inline]
    pub fn identity() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Calculates the squared norm `s·s`, i.e. `tan²(θ/4)`.
    #[inline]
    pub fn norm_sq(&self) -> T {
        self.s1 * self.s1 + self.s2 * self.s2 + self.s3 * self.s3
    }

    /// Returns the shadow set `−s/(s·s)` describing the same attitude.
    ///
    /// The identity `s = 0` has no shadow set and yields
    /// [`Singularity::MrpZeroShadow`].
    pub fn shadow(&self) -> Result<Self> {
        let norm_sq = self.norm_sq();
        if norm_sq == T::zero() {
            return Err(Singularity::MrpZeroShadow.into());
        }

        let scale = -norm_sq.recip();
        Ok(Self::new(self.s1 * scale, self.s2 * scale, self.s3 * scale))
    }

    /// Returns the set with `|s| ≤ 1`, switching to the shadow set if needed.
    pub fn shortest(&self) -> Self {
        if self.norm_sq() > T::one() {
            // A norm above one is never zero.
            let scale = -self.norm_sq().recip();
            Self::new(self.s1 * scale, self.s2 * scale, self.s3 * scale)
        } else {
            *self
        }
    }

    /// Converts into Euler parameters,
    /// `b = (1 − s·s, 2s) / (1 + s·s)`.
    pub fn to_quaternion(&self) -> Quaternion<T> {
        let norm_sq = self.norm_sq();
        let two = T::one() + T::one();
        let scale = (T::one() + norm_sq).recip();
        Quaternion::from_unit_vector_unchecked(nalgebra::Vector4::new(
            (T::one() - norm_sq) * scale,
            two * self.s1 * scale,
            two * self.s2 * scale,
            two * self.s3 * scale,
        ))
    }

    /// Builds the direction cosine matrix described by this parameter set.
    pub fn to_dcm(&self) -> Matrix3<T> {
        *self.to_quaternion().dcm()
    }
}

impl<T> From<Vector3<T>> for Mrp<T>
where
    T: Real,
{
    #[inline]
    fn from(value: Vector3<T>) -> Self {
        Self::from_vector(&value)
    }
}

impl_three_component!(Mrp, s1, s2, s3);

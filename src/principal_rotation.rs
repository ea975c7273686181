use crate::error::{Result, Singularity};
use crate::{Quaternion, Real};
use nalgebra::Vector3;

/// A principal rotation: a rotation by `angle` radians about the unit `axis`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrincipalRotation<T: Real> {
    angle: T,
    axis: Vector3<T>,
}

impl<T> PrincipalRotation<T>
where
    T: Real,
{
    /// Initializes a new [`PrincipalRotation`], normalizing the axis.
    ///
    /// ## Errors
    /// Fails with [`Singularity::ZeroRotation`] if the axis has zero length.
    pub fn new(angle: T, axis: Vector3<T>) -> Result<Self> {
        let norm = axis.norm();
        if norm == T::zero() {
            return Err(Singularity::ZeroRotation.into());
        }

        Ok(Self::from_unit_axis(angle, axis / norm))
    }

    pub(crate) fn from_unit_axis(angle: T, axis: Vector3<T>) -> Self {
        Self { angle, axis }
    }

    /// The principal rotation angle, in radians.
    #[inline]
    pub fn angle(&self) -> T {
        self.angle
    }

    /// The unit principal rotation axis.
    #[inline]
    pub fn axis(&self) -> &Vector3<T> {
        &self.axis
    }

    /// Converts into Euler parameters.
    pub fn to_quaternion(&self) -> Quaternion<T> {
        Quaternion::from_principal_rotation(self)
    }
}

use crate::impl_three_component;
use core::ops::Mul;
use uniform_array_derive::UniformArray;

/// A body-frame angular rate vector.
#[derive(UniformArray, Copy)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct BodyRate<T> {
    /// The angular rate around the body x-axis, in radians per second.
    pub omega_x: T,
    /// The angular rate around the body y-axis, in radians per second.
    pub omega_y: T,
    /// The angular rate around the body z-axis, in radians per second.
    pub omega_z: T,
}

impl<T> BodyRate<T> {
    /// Constructs a new [`BodyRate`] instance from a reading in a given coordinate frame.
    #[cfg(feature = "coordinate-frame")]
    #[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
    pub fn north_east_down<C>(coordinate: C) -> Self
    where
        C: Into<coordinate_frame::NorthEastDown<T>>,
        T: Clone,
    {
        let coordinate = coordinate.into();
        Self {
            omega_x: coordinate.x(),
            omega_y: coordinate.y(),
            omega_z: coordinate.z(),
        }
    }

    /// Returns the zero rate, i.e. a body at rest.
    #[inline]
    pub fn zero() -> Self
    where
        T: crate::Real,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }
}

impl<T> Mul<T> for BodyRate<T>
where
    T: Mul<T, Output = T> + Clone,
{
    type Output = BodyRate<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Self {
            omega_x: self.omega_x * rhs.clone(),
            omega_y: self.omega_y * rhs.clone(),
            omega_z: self.omega_z * rhs.clone(),
        }
    }
}

#[cfg(feature = "coordinate-frame")]
#[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
impl<T, C> From<C> for BodyRate<T>
where
    C: coordinate_frame::CoordinateFrame<Type = T>,
    T: Copy + coordinate_frame::SaturatingNeg<Output = T>,
{
    fn from(value: C) -> Self {
        Self::north_east_down(value.to_ned())
    }
}

impl_three_component!(BodyRate, omega_x, omega_y, omega_z);

//! Composition of successive rotations for each parameterization.
//!
//! For a first rotation `R(first)` followed by `R(second)`, the composed
//! attitude satisfies `R(result) = R(second)·R(first)`.

use crate::error::{Result, Singularity};
use crate::scalar::{lit, machine_epsilon};
use crate::{Crp, Mrp, NearZero, Quaternion, Real};
use log::{debug, warn};
use nalgebra::{Matrix4, Vector3};

/// The MRP composition denominator below which one operand is replaced by
/// its shadow set.
pub const DEFAULT_SHADOW_TOLERANCE: f64 = 1e-2;

/// Composition algebra of an attitude parameterization.
pub trait Compose: Sized {
    /// Composes `self` followed by `second`, i.e. `R(result) = R(second)·R(self)`.
    ///
    /// ## Errors
    /// Fails with [`AttitudeError::SingularRepresentation`](crate::AttitudeError::SingularRepresentation)
    /// if the result lies on a singular boundary of the parameterization.
    fn compose(&self, second: &Self) -> Result<Self>;

    /// Extracts the rotation that carries `reference` onto `self`, i.e. the
    /// `R(result)` with `R(result)·R(reference) = R(self)`.
    fn relative(&self, reference: &Self) -> Result<Self>;
}

impl<T> Quaternion<T>
where
    T: Real,
{
    /// Builds the quaternion product matrix of the second rotation of a
    /// composition.
    fn product_matrix(&self) -> Matrix4<T> {
        let b = self.b();
        let (b0, b1, b2, b3) = (b[0], b[1], b[2], b[3]);

        Matrix4::new(
            b0, -b1, -b2, -b3, //
            b1, b0, b3, -b2, //
            b2, -b3, b0, b1, //
            b3, b2, -b1, b0,
        )
    }
}

impl<T> Compose for Quaternion<T>
where
    T: Real,
{
    fn compose(&self, second: &Self) -> Result<Self> {
        Ok(Self::from_unit_vector_unchecked(
            second.product_matrix() * self.b(),
        ))
    }

    fn relative(&self, reference: &Self) -> Result<Self> {
        reference.conjugate().compose(self)
    }
}

impl<T> Compose for Crp<T>
where
    T: Real,
{
    /// Composes `(q'' + q' − q''×q') / (1 − q'·q'')`.
    ///
    /// ## Errors
    /// The result is a 180° rotation, and thus undefined, when `q'·q'' = 1`.
    fn compose(&self, second: &Self) -> Result<Self> {
        let first = self.to_vector();
        let second = second.to_vector();

        let denom = T::one() - first.dot(&second);
        if denom.is_near_zero(machine_epsilon()) {
            warn!("CRP composition describes a 180° rotation");
            return Err(Singularity::CrpHalfTurn.into());
        }

        let numerator = second + first - second.cross(&first);
        Ok(Self::from_vector(&(numerator / denom)))
    }

    fn relative(&self, reference: &Self) -> Result<Self> {
        (-*reference).compose(self)
    }
}

impl<T> Mrp<T>
where
    T: Real,
{
    /// Composes `self` followed by `second`, switching to a shadow set when
    /// the closed-form denominator `1 + |s'|²|s''|² − 2s'·s''` falls below
    /// `tolerance`.
    ///
    /// The operand with the larger norm is replaced by its shadow set; on a
    /// tie the second operand is switched.
    pub fn compose_with_tolerance(&self, second: &Self, tolerance: T) -> Result<Self> {
        let first_vec = self.to_vector();
        let second_vec = second.to_vector();

        let first_sq = first_vec.norm_squared();
        let second_sq = second_vec.norm_squared();
        let two = T::one() + T::one();
        let denom = T::one() + first_sq * second_sq - two * first_vec.dot(&second_vec);

        if denom >= tolerance {
            return Self::compose_closed_form(&first_vec, &second_vec);
        }

        if first_sq > second_sq {
            debug!("MRP composition denominator {denom:?} below {tolerance:?}, switching the first operand to its shadow set");
            let shadow = self.shadow()?.to_vector();
            Self::compose_closed_form(&shadow, &second_vec)
        } else {
            debug!("MRP composition denominator {denom:?} below {tolerance:?}, switching the second operand to its shadow set");
            let shadow = second.shadow()?.to_vector();
            Self::compose_closed_form(&first_vec, &shadow)
        }
    }

    /// Relative rotation with an explicit shadow-switch tolerance.
    pub fn relative_with_tolerance(&self, reference: &Self, tolerance: T) -> Result<Self> {
        (-*reference).compose_with_tolerance(self, tolerance)
    }

    fn compose_closed_form(first: &Vector3<T>, second: &Vector3<T>) -> Result<Self> {
        let first_sq = first.norm_squared();
        let second_sq = second.norm_squared();
        let one = T::one();
        let two = one + one;

        let denom = one + first_sq * second_sq - two * first.dot(second);
        if denom.is_near_zero(machine_epsilon()) {
            warn!("MRP composition describes a 360° rotation");
            return Err(Singularity::MrpFullTurn.into());
        }

        let numerator =
            first * (one - second_sq) + second * (one - first_sq) - second.cross(first) * two;
        Ok(Self::from_vector(&(numerator / denom)))
    }
}

impl<T> Compose for Mrp<T>
where
    T: Real,
{
    /// Composes with the [`DEFAULT_SHADOW_TOLERANCE`].
    fn compose(&self, second: &Self) -> Result<Self> {
        self.compose_with_tolerance(second, lit::<T>(DEFAULT_SHADOW_TOLERANCE))
    }

    fn relative(&self, reference: &Self) -> Result<Self> {
        self.relative_with_tolerance(reference, lit::<T>(DEFAULT_SHADOW_TOLERANCE))
    }
}

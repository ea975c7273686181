use crate::error::{InvalidInput, Result};
use crate::Real;
use nalgebra::{Matrix3, Matrix4, Vector3};

/// The matrices of Davenport's q-method for one set of weighted vector
/// observations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DavenportMatrices<T: Real> {
    /// The attitude profile matrix `B = Σ wᵢ·v_bᵢ·v_nᵢᵀ`.
    profile: Matrix3<T>,
    /// `S = B + Bᵀ`
    s: Matrix3<T>,
    /// `σ = tr(B)`
    sigma: T,
    /// The vector form of the skew-symmetric part of `B`.
    z: Vector3<T>,
    /// `K = [[σ, Zᵀ], [Z, S − σI]]`
    k: Matrix4<T>,
    /// The sum of all observation weights.
    total_weight: T,
}

impl<T> DavenportMatrices<T>
where
    T: Real,
{
    /// Builds the Davenport matrices from paired observations.
    ///
    /// ## Arguments
    /// * `weights` - One non-negative weight per observation.
    /// * `body` - The observed directions in the body frame.
    /// * `reference` - The same directions in the reference frame.
    ///
    /// ## Errors
    /// Fails with [`InvalidInput`] if the slices are empty or differ in
    /// length, a weight is negative or not finite, or all weights are zero.
    pub fn from_observations(
        weights: &[T],
        body: &[Vector3<T>],
        reference: &[Vector3<T>],
    ) -> Result<Self> {
        if weights.len() != body.len() || weights.len() != reference.len() {
            return Err(InvalidInput::MismatchedLengths {
                weights: weights.len(),
                body: body.len(),
                reference: reference.len(),
            }
            .into());
        }

        if weights.is_empty() {
            return Err(InvalidInput::NoObservations.into());
        }

        let mut total_weight = T::zero();
        for (index, weight) in weights.iter().enumerate() {
            if !weight.is_finite() || *weight < T::zero() {
                return Err(InvalidInput::InvalidWeight { index }.into());
            }
            total_weight += *weight;
        }

        if total_weight == T::zero() {
            return Err(InvalidInput::ZeroTotalWeight.into());
        }

        let profile = weights
            .iter()
            .zip(body.iter().zip(reference))
            .fold(Matrix3::zeros(), |profile, (weight, (body, reference))| {
                profile + body * reference.transpose() * *weight
            });

        Ok(Self::from_profile(profile, total_weight))
    }

    fn from_profile(profile: Matrix3<T>, total_weight: T) -> Self {
        let s = profile + profile.transpose();
        let sigma = profile.trace();
        let z = antisymmetric_vector(&profile);

        #[rustfmt::skip]
        let k = Matrix4::new(
            sigma, z[0], z[1], z[2],
            z[0], s[(0, 0)] - sigma, s[(0, 1)], s[(0, 2)],
            z[1], s[(1, 0)], s[(1, 1)] - sigma, s[(1, 2)],
            z[2], s[(2, 0)], s[(2, 1)], s[(2, 2)] - sigma,
        );

        Self {
            profile,
            s,
            sigma,
            z,
            k,
            total_weight,
        }
    }

    /// The attitude profile matrix `B`.
    #[inline]
    pub fn profile(&self) -> &Matrix3<T> {
        &self.profile
    }

    /// The symmetric matrix `S = B + Bᵀ`.
    #[inline]
    pub fn s(&self) -> &Matrix3<T> {
        &self.s
    }

    /// The trace `σ` of the attitude profile matrix.
    #[inline]
    pub fn sigma(&self) -> T {
        self.sigma
    }

    /// The vector `Z = (B₂₃ − B₃₂, B₃₁ − B₁₃, B₁₂ − B₂₁)`.
    #[inline]
    pub fn z(&self) -> &Vector3<T> {
        &self.z
    }

    /// The symmetric 4×4 Davenport matrix `K`.
    #[inline]
    pub fn k(&self) -> &Matrix4<T> {
        &self.k
    }

    /// The sum of the observation weights, an upper bound of the largest
    /// eigenvalue of `K`.
    #[inline]
    pub fn total_weight(&self) -> T {
        self.total_weight
    }
}

/// Extracts the vector form of the skew-symmetric part of a matrix.
fn antisymmetric_vector<T>(m: &Matrix3<T>) -> Vector3<T>
where
    T: Real,
{
    Vector3::new(
        m[(1, 2)] - m[(2, 1)],
        m[(2, 0)] - m[(0, 2)],
        m[(0, 1)] - m[(1, 0)],
    )
}

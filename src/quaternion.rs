use crate::error::{InvalidInput, Result, Singularity};
use crate::evolution::euler_parameter_rates;
use crate::scalar::{lit, machine_epsilon, to_f64};
use crate::{BodyRate, Crp, Mrp, NearZero, PrincipalRotation, Real};
use nalgebra::{Matrix3, Vector3, Vector4};

/// The tolerance on `|‖b‖ − 1|` accepted when constructing a [`Quaternion`].
///
/// Scalars too coarse to resolve it use four machine epsilons instead.
pub const UNIT_NORM_TOLERANCE: f64 = 1e-7;

/// A unit quaternion of Euler parameters `b = (b0, b1, b2, b3)`, scalar first.
///
/// The unit norm is checked at construction and the direction cosine matrix
/// is computed once; the value is immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion<T: Real> {
    b: Vector4<T>,
    dcm: Matrix3<T>,
}

impl<T> Quaternion<T>
where
    T: Real,
{
    /// Initializes a new [`Quaternion`] from its scalar-first components.
    ///
    /// ## Arguments
    /// * `b0` - The scalar part, `cos(θ/2)`.
    /// * `b1`, `b2`, `b3` - The vector part, `ê·sin(θ/2)`.
    ///
    /// ## Errors
    /// Fails with [`InvalidInput::NotUnitNorm`] if the components do not have unit
    /// length within [`UNIT_NORM_TOLERANCE`].
    pub fn new(b0: T, b1: T, b2: T, b3: T) -> Result<Self> {
        Self::from_vector(Vector4::new(b0, b1, b2, b3))
    }

    /// Initializes a new [`Quaternion`] from a scalar-first column vector.
    pub fn from_vector(b: Vector4<T>) -> Result<Self> {
        let norm = b.norm();
        let floor = machine_epsilon::<T>() * lit(4.0);
        let mut tolerance = lit::<T>(UNIT_NORM_TOLERANCE);
        if tolerance < floor {
            tolerance = floor;
        }

        if !((norm - T::one()).abs() < tolerance) {
            return Err(InvalidInput::NotUnitNorm {
                norm: to_f64(norm),
            }
            .into());
        }

        Ok(Self::from_unit_vector_unchecked(b))
    }

    /// Builds the value from components already known to have unit length.
    pub(crate) fn from_unit_vector_unchecked(b: Vector4<T>) -> Self {
        Self {
            b,
            dcm: Self::build_dcm(&b),
        }
    }

    /// The identity rotation.
    pub fn identity() -> Self {
        Self::from_unit_vector_unchecked(Vector4::new(
            T::one(),
            T::zero(),
            T::zero(),
            T::zero(),
        ))
    }

    /// Builds the Euler parameters of a principal rotation,
    /// `b = (cos(θ/2), ê·sin(θ/2))`.
    pub fn from_principal_rotation(rotation: &PrincipalRotation<T>) -> Self {
        let half_angle = rotation.angle() * lit::<T>(0.5);
        let (sin, cos) = half_angle.sin_cos();
        let axis = rotation.axis();
        Self::from_unit_vector_unchecked(Vector4::new(
            cos,
            axis[0] * sin,
            axis[1] * sin,
            axis[2] * sin,
        ))
    }

    /// Builds the Euler parameters of a CRP set.
    #[inline]
    pub fn from_crp(crp: &Crp<T>) -> Self {
        crp.to_quaternion()
    }

    /// Builds the Euler parameters of an MRP set.
    #[inline]
    pub fn from_mrp(mrp: &Mrp<T>) -> Self {
        mrp.to_quaternion()
    }

    /// Extracts the Euler parameters of a direction cosine matrix using
    /// Sheppard's method. The scalar part of the result is non-negative.
    ///
    /// ## Errors
    /// Fails with [`InvalidInput::NotUnitNorm`] if the matrix is not a rotation.
    pub fn from_dcm(dcm: &Matrix3<T>) -> Result<Self> {
        let one = T::one();
        let two = one + one;
        let quarter = lit::<T>(0.25);
        let trace = dcm.trace();

        let squares = [
            (one + trace) * quarter,
            (one + two * dcm[(0, 0)] - trace) * quarter,
            (one + two * dcm[(1, 1)] - trace) * quarter,
            (one + two * dcm[(2, 2)] - trace) * quarter,
        ];

        let mut largest = 0;
        for (i, square) in squares.iter().enumerate().skip(1) {
            if *square > squares[largest] {
                largest = i;
            }
        }

        let pivot = squares[largest].sqrt();
        let scale = (pivot * lit::<T>(4.0)).recip();
        let b = match largest {
            0 => Vector4::new(
                pivot,
                (dcm[(1, 2)] - dcm[(2, 1)]) * scale,
                (dcm[(2, 0)] - dcm[(0, 2)]) * scale,
                (dcm[(0, 1)] - dcm[(1, 0)]) * scale,
            ),
            1 => Vector4::new(
                (dcm[(1, 2)] - dcm[(2, 1)]) * scale,
                pivot,
                (dcm[(0, 1)] + dcm[(1, 0)]) * scale,
                (dcm[(2, 0)] + dcm[(0, 2)]) * scale,
            ),
            2 => Vector4::new(
                (dcm[(2, 0)] - dcm[(0, 2)]) * scale,
                (dcm[(0, 1)] + dcm[(1, 0)]) * scale,
                pivot,
                (dcm[(1, 2)] + dcm[(2, 1)]) * scale,
            ),
            _ => Vector4::new(
                (dcm[(0, 1)] - dcm[(1, 0)]) * scale,
                (dcm[(2, 0)] + dcm[(0, 2)]) * scale,
                (dcm[(1, 2)] + dcm[(2, 1)]) * scale,
                pivot,
            ),
        };

        if b[0] < T::zero() {
            Self::from_vector(-b)
        } else {
            Self::from_vector(b)
        }
    }

    fn build_dcm(b: &Vector4<T>) -> Matrix3<T> {
        let (b0, b1, b2, b3) = (b[0], b[1], b[2], b[3]);
        let two = T::one() + T::one();

        Matrix3::new(
            b0 * b0 + b1 * b1 - b2 * b2 - b3 * b3,
            two * (b1 * b2 + b0 * b3),
            two * (b1 * b3 - b0 * b2),
            two * (b1 * b2 - b0 * b3),
            b0 * b0 - b1 * b1 + b2 * b2 - b3 * b3,
            two * (b2 * b3 + b0 * b1),
            two * (b1 * b3 + b0 * b2),
            two * (b2 * b3 - b0 * b1),
            b0 * b0 - b1 * b1 - b2 * b2 + b3 * b3,
        )
    }

    /// Returns the scalar-first Euler parameters.
    #[inline]
    pub fn b(&self) -> &Vector4<T> {
        &self.b
    }

    /// Returns the scalar part `b0`.
    #[inline]
    pub fn scalar(&self) -> T {
        self.b[0]
    }

    /// Returns the vector part `(b1, b2, b3)`.
    #[inline]
    pub fn vector(&self) -> Vector3<T> {
        Vector3::new(self.b[1], self.b[2], self.b[3])
    }

    /// Returns the direction cosine matrix computed at construction.
    #[inline]
    pub fn dcm(&self) -> &Matrix3<T> {
        &self.dcm
    }

    /// Returns the inverse rotation.
    pub fn conjugate(&self) -> Self {
        Self::from_unit_vector_unchecked(Vector4::new(
            self.b[0], -self.b[1], -self.b[2], -self.b[3],
        ))
    }

    /// Maps a vector through the direction cosine matrix, `C·v`.
    #[inline]
    pub fn rotate(&self, vector: &Vector3<T>) -> Vector3<T> {
        self.dcm * vector
    }

    /// Extracts the principal rotation, `θ = 2·acos(b0)` and
    /// `ê = (b1, b2, b3) / sin(θ/2)`.
    ///
    /// ## Errors
    /// The axis is undefined when `sin(θ/2)` vanishes, i.e. for the identity
    /// (and the equivalent 360° rotation).
    pub fn to_principal_rotation(&self) -> Result<PrincipalRotation<T>> {
        let b0 = if self.b[0] > T::one() {
            T::one()
        } else if self.b[0] < -T::one() {
            -T::one()
        } else {
            self.b[0]
        };

        let half_angle = b0.acos();
        let sin = half_angle.sin();
        if sin.is_near_zero(machine_epsilon()) {
            return Err(Singularity::ZeroRotation.into());
        }

        let two = T::one() + T::one();
        Ok(PrincipalRotation::from_unit_axis(
            two * half_angle,
            self.vector() / sin,
        ))
    }

    /// Converts into Classical Rodrigues Parameters, `q = (b1, b2, b3) / b0`.
    ///
    /// ## Errors
    /// Fails with [`Singularity::CrpHalfTurn`] when `b0` vanishes.
    pub fn to_crp(&self) -> Result<Crp<T>> {
        let b0 = self.b[0];
        if b0.is_near_zero(machine_epsilon()) {
            return Err(Singularity::CrpHalfTurn.into());
        }

        Ok(Crp::from_vector(&(self.vector() / b0)))
    }

    /// Converts into Modified Rodrigues Parameters, `s = (b1, b2, b3) / (1 + b0)`.
    ///
    /// ## Errors
    /// Fails with [`Singularity::MrpFullTurn`] when `b0 = −1`.
    pub fn to_mrp(&self) -> Result<Mrp<T>> {
        let denom = T::one() + self.b[0];
        if denom.is_near_zero(machine_epsilon()) {
            return Err(Singularity::MrpFullTurn.into());
        }

        Ok(Mrp::from_vector(&(self.vector() / denom)))
    }

    /// Advances the attitude by one explicit Euler step of length `dt`
    /// under the body rate `omega` and renormalizes the result.
    ///
    /// ## Errors
    /// Fails with [`InvalidInput::NotUnitNorm`] if the step does not leave a
    /// finite, nonzero vector, e.g. for a non-finite `omega` or `dt`.
    pub fn propagate(&self, omega: &BodyRate<T>, dt: T) -> Result<Self> {
        let next = self.b + euler_parameter_rates(&self.b, omega) * dt;
        Self::from_vector(next.normalize())
    }
}

impl<T> Default for Quaternion<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::identity()
    }
}

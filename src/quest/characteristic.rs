use crate::error::{AttitudeError, Result};
use crate::scalar::{lit, machine_epsilon};
use crate::Real;
use log::{debug, trace, warn};
use nalgebra::{Matrix3, Matrix4, Vector3};

/// The characteristic polynomial `f(x) = det(K − x·I)` of a 4×4 matrix,
/// stored as the monic quartic `x⁴ + c₃x³ + c₂x² + c₁x + c₀`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacteristicPolynomial<T> {
    c3: T,
    c2: T,
    c1: T,
    c0: T,
}

impl<T> CharacteristicPolynomial<T>
where
    T: Real,
{
    /// Derives the coefficients from the power sums `tr(K)`, `tr(K²)`,
    /// `tr(K³)` and the determinant (Newton's identities).
    pub fn from_matrix(k: &Matrix4<T>) -> Self {
        let k2 = k * k;
        let p1 = k.trace();
        let p2 = k2.trace();
        let p3 = (k2 * k).trace();

        let two = T::one() + T::one();
        let three = two + T::one();

        let e1 = p1;
        let e2 = (p1 * p1 - p2) / two;
        let e3 = (p1 * p1 * p1 - three * p1 * p2 + two * p3) / lit::<T>(6.0);
        let e4 = k.determinant();

        Self {
            c3: -e1,
            c2: e2,
            c1: -e3,
            c0: e4,
        }
    }

    /// Builds the characteristic polynomial of the Davenport matrix
    /// `K = [[σ, Zᵀ], [Z, S − σI]]` directly from its blocks (Shuster):
    ///
    /// `f(x) = x⁴ − (a + b)x² − cx + (ab + cσ − d)`, with
    /// `a = σ² − tr(adj S)`, `b = σ² + Z·Z`, `c = det S + Z·SZ` and `d = Z·S²Z`.
    ///
    /// `K` is traceless, so the cubic coefficient is exactly zero.
    pub fn from_attitude_profile(s: &Matrix3<T>, sigma: T, z: &Vector3<T>) -> Self {
        let adjugate_trace = (s[(1, 1)] * s[(2, 2)] - s[(1, 2)] * s[(2, 1)])
            + (s[(0, 0)] * s[(2, 2)] - s[(0, 2)] * s[(2, 0)])
            + (s[(0, 0)] * s[(1, 1)] - s[(0, 1)] * s[(1, 0)]);

        let sz = s * z;
        let a = sigma * sigma - adjugate_trace;
        let b = sigma * sigma + z.dot(z);
        let c = s.determinant() + z.dot(&sz);
        let d = sz.dot(&sz);

        Self {
            c3: T::zero(),
            c2: -(a + b),
            c1: -c,
            c0: a * b + c * sigma - d,
        }
    }

    /// Evaluates `f(x)`.
    #[inline]
    pub fn evaluate(&self, x: T) -> T {
        (((x + self.c3) * x + self.c2) * x + self.c1) * x + self.c0
    }

    /// Evaluates `f'(x) = 4x³ + 3c₃x² + 2c₂x + c₁`.
    #[inline]
    pub fn derivative(&self, x: T) -> T {
        let two = T::one() + T::one();
        let three = two + T::one();
        let four = two + two;
        ((four * x + three * self.c3) * x + two * self.c2) * x + self.c1
    }

    /// Finds a root with Newton-Raphson iterations starting at `initial`.
    ///
    /// The iteration stops once a step changes the iterate by no more than
    /// `tolerance·max(1, |x|)`, or when `f(x)` vanishes exactly. The tolerance
    /// is raised to a few machine epsilons of `T` if set lower. Once rounding
    /// noise in `f` dominates, the steps stop shrinking; the iteration then
    /// ends with whichever of the last two iterates has the smaller `|f|`.
    /// Returns the root and the number of Newton steps taken.
    ///
    /// ## Errors
    /// Fails with [`AttitudeError::NonConvergence`] when `max_iterations`
    /// steps do not settle, the derivative vanishes away from a root, or the
    /// iterate leaves the finite range.
    pub fn newton_root(&self, initial: T, tolerance: T, max_iterations: usize) -> Result<(T, usize)> {
        let floor = machine_epsilon::<T>() * lit::<T>(4.0);
        let tolerance = if tolerance > floor { tolerance } else { floor };

        // Relative step size below which a non-shrinking step is rounding noise.
        let noise = machine_epsilon::<T>().sqrt().sqrt();

        let mut x = initial;
        let mut previous_step: Option<T> = None;

        for iteration in 0..max_iterations {
            let f = self.evaluate(x);
            if f == T::zero() {
                debug!("Characteristic polynomial vanishes at {x:?} after {iteration} iterations");
                return Ok((x, iteration));
            }

            let slope = self.derivative(x);
            if slope == T::zero() {
                warn!("Characteristic polynomial is stationary at {x:?}, f = {f:?}");
                return Err(AttitudeError::NonConvergence {
                    iterations: iteration,
                });
            }

            let next = x - f / slope;
            if !next.is_finite() {
                warn!("Newton-Raphson iterate diverged from {x:?}");
                return Err(AttitudeError::NonConvergence {
                    iterations: iteration + 1,
                });
            }

            let step = (next - x).abs();
            trace!("Newton-Raphson iteration {iteration}: x = {next:?}, step = {step:?}");
            let scale = if next.abs() > T::one() { next.abs() } else { T::one() };

            if let Some(previous) = previous_step {
                if step >= previous && step <= noise * scale {
                    let root = if self.evaluate(next).abs() < f.abs() { next } else { x };
                    debug!("Newton-Raphson stalled at {root:?} after {} iterations", iteration + 1);
                    return Ok((root, iteration + 1));
                }
            }

            x = next;
            if step <= tolerance * scale {
                debug!("Newton-Raphson converged to {x:?} after {} iterations", iteration + 1);
                return Ok((x, iteration + 1));
            }

            previous_step = Some(step);
        }

        warn!("Newton-Raphson did not converge within {max_iterations} iterations, last iterate {x:?}");
        Err(AttitudeError::NonConvergence {
            iterations: max_iterations,
        })
    }
}

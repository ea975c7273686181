//! Optimal attitude determination from weighted vector observations.
//!
//! Solves Wahba's problem with Davenport's q-method, finding the largest
//! eigenvalue of the Davenport matrix `K` with QUEST's Newton-Raphson
//! iteration on its characteristic polynomial. The attitude is recovered as
//! Classical Rodrigues Parameters and optionally converted into Euler
//! parameters. Each solution is polished with Rayleigh quotient steps and
//! checked against the eigenvalue gap of `K`, so nearly parallel
//! observations fail instead of returning an arbitrary attitude. The resulting
//! attitude maps reference-frame directions onto body-frame directions,
//! `v_b ≈ C·v_n`.

mod characteristic;
mod davenport;

pub use characteristic::CharacteristicPolynomial;
pub use davenport::DavenportMatrices;

use crate::error::{Result, Singularity};
use crate::scalar::{lit, machine_epsilon};
use crate::{Crp, Quaternion, Real};
use log::{debug, trace, warn};
use nalgebra::{Matrix3, Vector3, Vector4};

/// The default convergence tolerance of the eigenvalue iteration.
pub const DEFAULT_TOLERANCE: f64 = 1e-15;

/// The default bound on the number of Newton-Raphson steps.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// The number of Rayleigh quotient steps applied to the Newton-Raphson eigenvalue.
const REFINEMENT_STEPS: usize = 2;

/// A QUEST attitude solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quest<T> {
    /// The relative step size at which the eigenvalue iteration stops.
    tolerance: T,
    /// The maximum number of Newton-Raphson steps.
    max_iterations: usize,
    /// The relative eigenvalue gap below which the observations are
    /// considered degenerate.
    degeneracy_tolerance: T,
}

/// The result of a QUEST solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuestSolution<T> {
    /// The optimal attitude.
    pub crp: Crp<T>,
    /// The largest eigenvalue of `K`.
    pub eigenvalue: T,
    /// Wahba's loss at the optimum, `Σw − λ`.
    pub loss: T,
    /// The number of Newton-Raphson steps taken.
    pub iterations: usize,
}

impl<T> Quest<T>
where
    T: Real,
{
    /// Initializes a new [`Quest`] solver.
    ///
    /// ## Arguments
    /// * `tolerance` - The relative step size at which the eigenvalue
    ///   iteration stops, e.g. `1e-15`.
    /// * `max_iterations` - The maximum number of Newton-Raphson steps.
    ///
    /// The degeneracy tolerance defaults to the cube root of the machine
    /// epsilon of `T`, see [`Quest::with_degeneracy_tolerance`].
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            degeneracy_tolerance: machine_epsilon::<T>().cbrt(),
        }
    }

    /// Replaces the convergence tolerance.
    pub fn with_tolerance(self, tolerance: T) -> Self {
        Self { tolerance, ..self }
    }

    /// Replaces the iteration bound.
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Replaces the degeneracy tolerance.
    ///
    /// A solve fails with [`Singularity::DegenerateObservations`] when
    /// `|f'(λ)| < tolerance·(Σw)³`, i.e. when the two largest eigenvalues of
    /// `K` lie too close together to tell the attitude apart. For two unit
    /// weighted observations `φ` radians apart this is `2φ² < tolerance`.
    pub fn with_degeneracy_tolerance(self, degeneracy_tolerance: T) -> Self {
        Self {
            degeneracy_tolerance,
            ..self
        }
    }

    /// The degeneracy tolerance.
    pub fn degeneracy_tolerance(&self) -> T {
        self.degeneracy_tolerance
    }

    /// The convergence tolerance.
    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    /// The iteration bound.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Solves for the optimal attitude as Classical Rodrigues Parameters.
    ///
    /// ## Arguments
    /// * `weights` - One non-negative weight per observation.
    /// * `body` - Unit observation directions in the body frame.
    /// * `reference` - The same unit directions in the reference frame.
    ///
    /// ## Errors
    /// * [`InvalidInput`](crate::InvalidInput) for malformed observation sets.
    /// * [`AttitudeError::NonConvergence`](crate::AttitudeError::NonConvergence)
    ///   if the eigenvalue iteration does not settle.
    /// * [`Singularity::DegenerateObservations`] if the observations do not
    ///   pin down the attitude, or the optimum is a 180° rotation that CRPs
    ///   cannot describe.
    pub fn solve_crp(
        &self,
        weights: &[T],
        body: &[Vector3<T>],
        reference: &[Vector3<T>],
    ) -> Result<QuestSolution<T>> {
        let matrices = DavenportMatrices::from_observations(weights, body, reference)?;
        self.solve_matrices(&matrices)
    }

    /// Solves for the optimal attitude as Euler parameters.
    ///
    /// See [`Quest::solve_crp`] for the arguments and errors.
    pub fn solve_quaternion(
        &self,
        weights: &[T],
        body: &[Vector3<T>],
        reference: &[Vector3<T>],
    ) -> Result<Quaternion<T>> {
        let solution = self.solve_crp(weights, body, reference)?;
        Ok(solution.crp.to_quaternion())
    }

    /// Solves for the optimal attitude from prepared Davenport matrices.
    pub fn solve_matrices(&self, matrices: &DavenportMatrices<T>) -> Result<QuestSolution<T>> {
        let (mut eigenvalue, iterations) = self.largest_eigenvalue(matrices)?;

        let total_weight = matrices.total_weight();
        let window = self.degeneracy_tolerance * total_weight;

        let mut q = Self::crp_at(matrices, eigenvalue)?;
        for step in 0..REFINEMENT_STEPS {
            let refined = rayleigh_quotient(matrices, &q);
            trace!("QUEST refinement {step}: eigenvalue {refined:?}");

            if !((refined - eigenvalue).abs() <= window) {
                warn!("QUEST eigenvalue moved from {eigenvalue:?} to {refined:?} during refinement");
                return Err(Singularity::DegenerateObservations.into());
            }

            if refined == eigenvalue {
                break;
            }

            eigenvalue = refined;
            q = Self::crp_at(matrices, eigenvalue)?;
        }

        let gap = Self::polynomial(matrices).derivative(eigenvalue).abs();
        if gap < window * total_weight * total_weight {
            warn!("QUEST eigenvalue {eigenvalue:?} is not isolated, f'(λ) = {gap:?}");
            return Err(Singularity::DegenerateObservations.into());
        }

        let residual = eigen_residual(matrices, &q, eigenvalue);
        if !(residual <= window) {
            warn!("QUEST attitude leaves an eigen-residual of {residual:?}");
            return Err(Singularity::DegenerateObservations.into());
        }

        let loss = Self::loss(total_weight, eigenvalue);
        debug!("QUEST solved with eigenvalue {eigenvalue:?}, loss {loss:?}, after {iterations} iterations");

        Ok(QuestSolution {
            crp: Crp::from_vector(&q),
            eigenvalue,
            loss,
            iterations,
        })
    }

    /// Finds the largest eigenvalue of `K` by Newton-Raphson on
    /// `det(K − λI)`, starting from the total weight.
    ///
    /// Returns the eigenvalue and the number of steps taken.
    pub fn largest_eigenvalue(&self, matrices: &DavenportMatrices<T>) -> Result<(T, usize)> {
        Self::polynomial(matrices).newton_root(
            matrices.total_weight(),
            self.tolerance,
            self.max_iterations,
        )
    }

    fn polynomial(matrices: &DavenportMatrices<T>) -> CharacteristicPolynomial<T> {
        CharacteristicPolynomial::from_attitude_profile(matrices.s(), matrices.sigma(), matrices.z())
    }

    /// Solves `q = ((λ + σ)·I − S)⁻¹·Z`.
    fn crp_at(matrices: &DavenportMatrices<T>, eigenvalue: T) -> Result<Vector3<T>> {
        let system = Matrix3::from_diagonal_element(eigenvalue + matrices.sigma()) - matrices.s();
        let Some(inverse) = system.try_inverse() else {
            warn!("QUEST system matrix is singular at eigenvalue {eigenvalue:?}");
            return Err(Singularity::DegenerateObservations.into());
        };

        let q = inverse * matrices.z();
        if !q.iter().all(|value| value.is_finite()) {
            warn!("QUEST attitude is not finite at eigenvalue {eigenvalue:?}");
            return Err(Singularity::DegenerateObservations.into());
        }

        Ok(q)
    }

    /// Wahba's loss `Σw − λ` of a solution with eigenvalue `λ`.
    #[inline]
    pub fn loss(total_weight: T, eigenvalue: T) -> T {
        total_weight - eigenvalue
    }
}

/// The unnormalized eigenvector `(1, q)` of `K` described by a CRP set.
fn eigenvector<T: Real>(q: &Vector3<T>) -> Vector4<T> {
    Vector4::new(T::one(), q[0], q[1], q[2])
}

/// The Rayleigh quotient `xᵀKx / xᵀx` of `x = (1, q)`.
fn rayleigh_quotient<T: Real>(matrices: &DavenportMatrices<T>, q: &Vector3<T>) -> T {
    let x = eigenvector(q);
    x.dot(&(matrices.k() * x)) / x.norm_squared()
}

/// The relative residual `‖(K − λI)·x‖ / ‖x‖` of `x = (1, q)`.
fn eigen_residual<T: Real>(matrices: &DavenportMatrices<T>, q: &Vector3<T>, eigenvalue: T) -> T {
    let x = eigenvector(q);
    (matrices.k() * x - x * eigenvalue).norm() / x.norm()
}

impl<T> Default for Quest<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new(lit::<T>(DEFAULT_TOLERANCE), DEFAULT_MAX_ITERATIONS)
    }
}

/// Solves for the optimal attitude as CRPs using the default [`Quest`] settings.
pub fn solve_attitude<T>(
    weights: &[T],
    body: &[Vector3<T>],
    reference: &[Vector3<T>],
) -> Result<Crp<T>>
where
    T: Real,
{
    Ok(Quest::default().solve_crp(weights, body, reference)?.crp)
}

/// Solves for the optimal attitude as Euler parameters using the default
/// [`Quest`] settings.
pub fn solve_attitude_quaternion<T>(
    weights: &[T],
    body: &[Vector3<T>],
    reference: &[Vector3<T>],
) -> Result<Quaternion<T>>
where
    T: Real,
{
    Quest::default().solve_quaternion(weights, body, reference)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AttitudeError, InvalidInput};
    use approx::assert_relative_eq;

    fn truth() -> Quaternion<f64> {
        Quaternion::from_vector(Vector4::new(1.0, 2.0, -3.0, 4.0).normalize()).unwrap()
    }

    fn assert_same_attitude(a: &Vector4<f64>, b: &Vector4<f64>, epsilon: f64) {
        let sign = if a.dot(b) < 0.0 { -1.0 } else { 1.0 };
        assert_relative_eq!(a, &(b * sign), epsilon = epsilon);
    }

    #[test]
    fn test_orthonormal_observations() {
        let truth = truth();
        let reference = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let body = reference.map(|v| truth.rotate(&v));
        let weights = [1.0, 1.0, 1.0];

        let b = solve_attitude_quaternion(&weights, &body, &reference).unwrap();
        assert_same_attitude(b.b(), truth.b(), 1e-6);

        let solution = Quest::default().solve_crp(&weights, &body, &reference).unwrap();
        assert_relative_eq!(solution.eigenvalue, 3.0, epsilon = 1e-12);
        assert_relative_eq!(solution.loss, 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            solution.crp.to_vector(),
            truth.to_crp().unwrap().to_vector(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_two_observations_with_unequal_weights() {
        let truth = truth();
        let reference = [
            Vector3::new(0.6, 0.8, 0.0),
            Vector3::new(0.0, 0.6, 0.8),
        ];
        let body = reference.map(|v| truth.rotate(&v));

        let crp = solve_attitude(&[0.7, 0.2], &body, &reference).unwrap();
        assert_same_attitude(crp.to_quaternion().b(), truth.b(), 1e-9);
    }

    #[test]
    fn test_noisy_observations() {
        let truth = truth();
        let reference = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.6, 0.8),
            Vector3::new(0.48, 0.6, -0.64),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let noise = [
            Vector3::new(1e-4, -2e-4, 0.0),
            Vector3::new(-1e-4, 0.0, 1.5e-4),
            Vector3::new(0.0, 1e-4, -1e-4),
            Vector3::new(2e-4, 1e-4, 0.0),
        ];

        let mut body = [Vector3::zeros(); 4];
        for (i, v) in reference.iter().enumerate() {
            body[i] = (truth.rotate(v) + noise[i]).normalize();
        }

        let solution = Quest::default()
            .solve_crp(&[1.0, 0.5, 0.5, 2.0], &body, &reference)
            .unwrap();
        assert!(solution.loss > 0.0);
        assert!(solution.loss < 1e-6);
        assert!(solution.eigenvalue < 4.0);
        assert_same_attitude(solution.crp.to_quaternion().b(), truth.b(), 1e-3);
    }

    #[test]
    fn test_close_observations() {
        let truth = truth();
        for separation in [5e-2, 1e-2_f64] {
            let reference = [
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(separation.cos(), separation.sin(), 0.0),
            ];
            let body = reference.map(|v| truth.rotate(&v));

            let b = solve_attitude_quaternion(&[1.0, 1.0], &body, &reference).unwrap();
            assert_same_attitude(b.b(), truth.b(), 1e-6);
        }
    }

    #[test]
    fn test_nearly_parallel_observations() {
        let truth = truth();
        let separation = 1e-5_f64;
        let reference = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(separation.cos(), separation.sin(), 0.0),
        ];
        let body = reference.map(|v| truth.rotate(&v));

        assert_eq!(
            solve_attitude(&[1.0, 1.0], &body, &reference),
            Err(AttitudeError::SingularRepresentation(
                Singularity::DegenerateObservations
            ))
        );

        // A stricter gap requirement also rejects the otherwise solvable 1e-2 rad pair.
        let separation = 1e-2_f64;
        let reference = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(separation.cos(), separation.sin(), 0.0),
        ];
        let body = reference.map(|v| truth.rotate(&v));
        let quest = Quest::default().with_degeneracy_tolerance(0.1);
        assert_eq!(
            quest.solve_quaternion(&[1.0, 1.0], &body, &reference),
            Err(AttitudeError::SingularRepresentation(
                Singularity::DegenerateObservations
            ))
        );
    }

    #[test]
    fn test_single_precision() {
        let truth =
            Quaternion::from_vector(Vector4::new(1.0, 2.0, -3.0, 4.0_f32).normalize()).unwrap();
        let reference = [
            Vector3::new(1.0, 0.0, 0.0_f32),
            Vector3::new(0.0, 0.6, 0.8),
            Vector3::new(0.48, 0.6, -0.64),
        ];

        let body = reference.map(|v| truth.rotate(&v));
        let b = solve_attitude_quaternion(&[1.0, 1.0, 1.0], &body, &reference).unwrap();
        let sign = if b.b().dot(truth.b()) < 0.0 { -1.0 } else { 1.0 };
        assert_relative_eq!(b.b() * sign, *truth.b(), epsilon = 1e-5);

        let noise = [
            Vector3::new(1e-4, -2e-4, 0.0_f32),
            Vector3::new(-1e-4, 0.0, 1.5e-4),
            Vector3::new(0.0, 1e-4, -1e-4),
        ];
        let mut body = [Vector3::zeros(); 3];
        for (i, v) in reference.iter().enumerate() {
            body[i] = (truth.rotate(v) + noise[i]).normalize();
        }

        let b = solve_attitude_quaternion(&[1.0, 0.5, 2.0], &body, &reference).unwrap();
        let sign = if b.b().dot(truth.b()) < 0.0 { -1.0 } else { 1.0 };
        assert_relative_eq!(b.b() * sign, *truth.b(), epsilon = 1e-3);
    }

    #[test]
    fn test_identity() {
        let reference = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)];
        let crp = solve_attitude(&[1.0, 1.0], &reference, &reference).unwrap();
        assert_relative_eq!(crp.to_vector(), Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_duplicated_observation_is_deterministic() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        let first = solve_attitude(&[1.0, 1.0], &[v, v], &[v, v]);
        let second = solve_attitude(&[1.0, 1.0], &[v, v], &[v, v]);
        assert_eq!(first, second);

        match first {
            Err(AttitudeError::SingularRepresentation(Singularity::DegenerateObservations)) => {}
            Ok(crp) => assert_relative_eq!(crp.to_vector(), Vector3::zeros(), epsilon = 1e-12),
            Err(err) => panic!("unexpected error: {err:?}"),
        }
    }

    #[test]
    fn test_iteration_bound() {
        let truth = truth();
        let reference = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.6, 0.8)];
        let mut body = reference.map(|v| truth.rotate(&v));
        body[0] = (body[0] + Vector3::new(1e-3, -1e-3, 2e-3)).normalize();

        let quest = Quest::default().with_max_iterations(1);
        assert_eq!(quest.max_iterations(), 1);
        assert_eq!(
            quest.solve_crp(&[1.0, 1.0], &body, &reference),
            Err(AttitudeError::NonConvergence { iterations: 1 })
        );
    }

    #[test]
    fn test_invalid_input() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(
            solve_attitude(&[1.0], &[v, v], &[v, v]),
            Err(AttitudeError::InvalidInput(InvalidInput::MismatchedLengths {
                weights: 1,
                body: 2,
                reference: 2,
            }))
        );
    }

    #[test]
    fn test_settings() {
        let quest = Quest::<f64>::default();
        assert_eq!(quest.tolerance(), 1e-15);
        assert_eq!(quest.max_iterations(), 100);

        assert_relative_eq!(quest.degeneracy_tolerance(), f64::EPSILON.cbrt());

        let quest = quest.with_tolerance(1e-12).with_max_iterations(10);
        assert_eq!(quest, Quest::new(1e-12, 10));
        assert_eq!(quest.with_degeneracy_tolerance(1e-3).degeneracy_tolerance(), 1e-3);
    }
}

use thiserror::Error;

/// Errors raised by the attitude parameterizations and the QUEST solver.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AttitudeError {
    /// The input was rejected at construction time.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// A parameter set hit one of its singular boundaries.
    #[error("singular representation: {0}")]
    SingularRepresentation(#[from] Singularity),
    /// The eigenvalue iteration did not settle within the iteration bound.
    #[error("eigenvalue iteration did not converge within {iterations} iterations")]
    NonConvergence { iterations: usize },
}

/// The reasons an input is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidInput {
    #[error("Euler parameters must have unit length, got a norm of {norm}")]
    NotUnitNorm { norm: f64 },
    #[error("at least one vector observation is required")]
    NoObservations,
    #[error("got {weights} weights, {body} body vectors and {reference} reference vectors")]
    MismatchedLengths {
        weights: usize,
        body: usize,
        reference: usize,
    },
    #[error("weight {index} is negative or not finite")]
    InvalidWeight { index: usize },
    #[error("the observation weights sum to zero")]
    ZeroTotalWeight,
}

/// The singular boundaries of the attitude parameterizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Singularity {
    /// CRPs are undefined for a rotation of 180°.
    #[error("classical Rodrigues parameters are singular at a 180° rotation")]
    CrpHalfTurn,
    /// MRPs are undefined for a rotation of 360°.
    #[error("modified Rodrigues parameters are singular at a 360° rotation")]
    MrpFullTurn,
    /// The identity has no MRP shadow set.
    #[error("the zero MRP vector has no shadow set")]
    MrpZeroShadow,
    /// The rotation axis is undefined for a zero rotation angle.
    #[error("the principal rotation axis is undefined for a zero rotation")]
    ZeroRotation,
    /// The vector observations do not determine a unique attitude.
    #[error("the vector observations do not determine a unique attitude")]
    DegenerateObservations,
}

pub type Result<T, E = AttitudeError> = core::result::Result<T, E>;

//! # Attitude Parameters
//!
//! Attitude representations for rigid bodies and an optimal attitude solver:
//!
//! - [`Quaternion`] (Euler parameters), [`Crp`] (Classical Rodrigues Parameters)
//!   and [`Mrp`] (Modified Rodrigues Parameters), together with the
//!   [`PrincipalRotation`] they convert from and to.
//! - Successive and relative rotations through [`Compose`], including MRP
//!   shadow-set switching.
//! - Kinematic differential equations through [`Kinematics`].
//! - The QUEST solver for Wahba's problem, see [`Quest`].

// Enable no_std mode.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod body_rate;
pub mod composition;
mod crp;
mod error;
pub mod evolution;
mod macros;
mod mrp;
mod principal_rotation;
mod quaternion;
pub mod quest;
mod scalar;

pub use crate::body_rate::BodyRate;
pub use crate::composition::{Compose, DEFAULT_SHADOW_TOLERANCE};
pub use crate::crp::Crp;
pub use crate::error::{AttitudeError, InvalidInput, Result, Singularity};
pub use crate::evolution::{euler_parameter_rates, Kinematics};
pub use crate::mrp::Mrp;
pub use crate::principal_rotation::PrincipalRotation;
pub use crate::quaternion::{Quaternion, UNIT_NORM_TOLERANCE};
pub use crate::quest::{solve_attitude, solve_attitude_quaternion, Quest, QuestSolution};
pub use crate::scalar::{NearZero, Real};

//! Error types for the diffusion pipelines.

use ff_core::FfError;
use ff_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffusionError {
    /// A parameter violates a precondition; nothing was assembled.
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    /// Zero diagonal entry, or the solver failed to converge.
    #[error("Numerical instability: {what}")]
    NumericalInstability { what: String },

    /// Flat solution length does not match the requested profile shape.
    #[error("Reshape mismatch: expected {expected} values, got {actual}")]
    ReshapeMismatch { expected: usize, actual: usize },

    #[error("Solve cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },
}

pub type DiffusionResult<T> = Result<T, DiffusionError>;

impl From<FfError> for DiffusionError {
    fn from(e: FfError) -> Self {
        DiffusionError::InvalidInput {
            what: e.to_string(),
        }
    }
}

impl From<SolverError> for DiffusionError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Cancelled { iterations } => DiffusionError::Cancelled { iterations },
            SolverError::InvalidConfig { what } => DiffusionError::InvalidInput { what },
            other => DiffusionError::NumericalInstability {
                what: other.to_string(),
            },
        }
    }
}

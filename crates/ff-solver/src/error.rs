//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur while setting up or iterating a linear system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Dimension error: {what}")]
    Dimension { what: String },

    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Zero diagonal entry at row {row}")]
    ZeroDiagonal { row: usize },

    #[error("Solve cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },
}

pub type SolverResult<T> = Result<T, SolverError>;

//! Iterative linear solver for fickflow.
//!
//! This crate provides the classic Jacobi fixed-point iteration for square
//! systems `A·x = b`. Every unknown of a sweep is computed from the previous
//! full iterate only; the solver never reads partially-updated values.
//! Systems are stored sparse (CSR), so a sweep costs one pass over the stored
//! entries.

pub mod error;
pub mod jacobi;
pub mod system;

pub use error::{SolverError, SolverResult};
pub use jacobi::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, JacobiConfig, JacobiResult, jacobi_solve,
    jacobi_solve_from,
};
pub use system::LinearSystem;

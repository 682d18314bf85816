//! One-dimensional Fick diffusion by finite differences.
//!
//! Two pipelines share the Jacobi solver from `ff-solver`:
//! - steady: near-tridiagonal boundary-value problem, one profile over space
//! - transient: block-structured space/time system, one profile per time step
//!
//! Both take plain numeric parameters and return plain numeric arrays; the
//! caller owns presentation. The `build_*_matrix` functions return dense
//! matrices for inspection; the pipelines assemble the same entries sparse.

pub mod error;
pub mod params;
pub mod profile;
pub mod steady;
pub mod transient;

pub use error::{DiffusionError, DiffusionResult};
pub use params::{SteadyParams, TransientParams};
pub use profile::{flatten_row_major, reshape_row_major};
pub use steady::{
    SteadySolution, build_steady_matrix, build_steady_rhs, solve_steady, solve_steady_with,
};
pub use transient::{
    TransientSolution, build_transient_matrix, build_transient_rhs, solve_transient,
    solve_transient_with, transient_alpha,
};

// Solver knobs are part of the pipeline API.
pub use ff_solver::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, JacobiConfig};

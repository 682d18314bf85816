//! Jacobi fixed-point iteration.

use crate::error::{SolverError, SolverResult};
use crate::system::LinearSystem;
use ff_core::ensure_positive;
use nalgebra::DVector;
use std::sync::atomic::{AtomicBool, Ordering};

/// Convergence threshold on `‖x_new − x_old‖₂`.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Sweep cap used by the bounded variant.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Jacobi solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JacobiConfig {
    /// Threshold on the Euclidean norm of the change between consecutive iterates
    pub tolerance: f64,
    /// Maximum number of sweeps (`None` iterates until convergence)
    pub max_iterations: Option<usize>,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }
}

impl JacobiConfig {
    /// Bounded variant with a custom sweep cap.
    pub fn bounded(max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            ..Self::default()
        }
    }

    /// Unbounded variant: iterates until the convergence test passes.
    ///
    /// Never returns for systems on which Jacobi diverges unless a stop flag
    /// is supplied to [`jacobi_solve_from`].
    pub fn unbounded() -> Self {
        Self {
            max_iterations: None,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> SolverResult<()> {
        ensure_positive(self.tolerance, "tolerance")
            .map(|_| ())
            .map_err(|e| SolverError::InvalidConfig {
                what: e.to_string(),
            })
    }
}

/// Jacobi iteration result.
#[derive(Clone, Debug)]
pub struct JacobiResult {
    /// Last computed iterate
    pub x: DVector<f64>,
    /// Number of sweeps performed
    pub iterations: usize,
    /// `‖x_new − x_old‖₂` of the final sweep (infinite if no sweep ran)
    pub step_norm: f64,
    /// Whether the convergence test passed before the cap
    pub converged: bool,
}

/// Solve `A·x = b` starting from the zero vector.
pub fn jacobi_solve(system: &LinearSystem, config: &JacobiConfig) -> SolverResult<JacobiResult> {
    jacobi_solve_from(system, DVector::zeros(system.dim()), config, None)
}

/// Solve `A·x = b` from an explicit initial guess.
///
/// When `stop_flag` is given it is polled once per sweep; observing `true`
/// aborts with [`SolverError::Cancelled`]. Hitting the sweep cap is not an
/// error: the last iterate is returned with `converged == false`.
pub fn jacobi_solve_from(
    system: &LinearSystem,
    x0: DVector<f64>,
    config: &JacobiConfig,
    stop_flag: Option<&AtomicBool>,
) -> SolverResult<JacobiResult> {
    config.validate()?;

    let n = system.dim();
    if x0.len() != n {
        return Err(SolverError::Dimension {
            what: format!("initial guess length {} != system dimension {}", x0.len(), n),
        });
    }
    if let Some(row) = system.zero_diagonal_row() {
        return Err(SolverError::ZeroDiagonal { row });
    }

    let a = system.matrix();
    let diag = system.diagonal();
    let b = system.rhs();

    let mut x = x0;
    let mut x_new = DVector::zeros(n);
    let mut iterations = 0;
    let mut step_norm = f64::INFINITY;

    loop {
        if config.max_iterations.is_some_and(|cap| iterations >= cap) {
            tracing::warn!(
                iterations,
                step_norm,
                tolerance = config.tolerance,
                "Jacobi hit iteration cap without converging; returning last iterate"
            );
            return Ok(JacobiResult {
                x,
                iterations,
                step_norm,
                converged: false,
            });
        }

        if stop_flag.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(SolverError::Cancelled { iterations });
        }

        for (i, row) in a.row_iter().enumerate() {
            let sigma: f64 = row
                .col_indices()
                .iter()
                .zip(row.values())
                .filter(|(k, _)| **k != i)
                .map(|(&k, aik)| aik * x[k])
                .sum();
            x_new[i] = (b[i] - sigma) / diag[i];
        }
        iterations += 1;

        step_norm = (&x_new - &x).norm();
        std::mem::swap(&mut x, &mut x_new);
        tracing::trace!(iterations, step_norm, "Jacobi sweep");

        if step_norm < config.tolerance {
            tracing::debug!(iterations, step_norm, dim = n, "Jacobi converged");
            return Ok(JacobiResult {
                x,
                iterations,
                step_norm,
                converged: true,
            });
        }
    }
}

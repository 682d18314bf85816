//! Steady-state diffusion: assembly and pipeline.

use crate::error::{DiffusionError, DiffusionResult};
use crate::params::SteadyParams;
use ff_core::{Timer, linspace};
use ff_solver::{JacobiConfig, LinearSystem, jacobi_solve_from};
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CooMatrix;
use std::sync::atomic::AtomicBool;

/// Converged steady profile with solver diagnostics.
#[derive(Clone, Debug)]
pub struct SteadySolution {
    /// `spatial_nodes − 1` evenly spaced samples over `[0, domain_length]`
    pub positions: Vec<f64>,
    /// Unknown `i` is the value at spatial node `i + 1`
    pub profile: Vec<f64>,
    pub iterations: usize,
    pub step_norm: f64,
    pub converged: bool,
}

/// Stored entries of steady row `i` out of `size`, in column order.
///
/// The last row's sub-diagonal is `2` for the reflective far boundary; a
/// single unknown has no sub-diagonal at all.
fn steady_row(i: usize, size: usize, y: f64, mut emit: impl FnMut(usize, f64)) {
    if i > 0 {
        emit(i - 1, if i + 1 == size { 2.0 } else { 1.0 });
    }
    emit(i, -2.0 - y);
    if i + 1 < size {
        emit(i + 1, 1.0);
    }
}

/// Coefficient matrix of size `(node_count − 1)²`.
///
/// Diagonal `−2 − Y` with `Y = diffusion_constant² · spatial_step²`, unit
/// neighbours, and a `2` at the last row's sub-diagonal for the reflective
/// far boundary.
pub fn build_steady_matrix(
    diffusion_constant: f64,
    spatial_step: f64,
    node_count: u32,
) -> DMatrix<f64> {
    let y = diffusion_constant.powi(2) * spatial_step.powi(2);
    let size = (node_count as usize).saturating_sub(1);
    let mut matrix = DMatrix::zeros(size, size);
    for i in 0..size {
        steady_row(i, size, y, |k, v| matrix[(i, k)] = v);
    }
    matrix
}

/// Same entries as [`build_steady_matrix`], assembled sparse for the solver.
fn assemble_steady_system(params: &SteadyParams) -> DiffusionResult<LinearSystem> {
    let y = params.diffusion_constant.powi(2) * params.spatial_step().powi(2);
    let size = params.unknowns();
    let mut coo = CooMatrix::new(size, size);
    for i in 0..size {
        steady_row(i, size, y, |k, v| coo.push(i, k, v));
    }
    let rhs = build_steady_rhs(size, params.boundary_value);
    Ok(LinearSystem::from_coo(&coo, rhs)?)
}

/// Right-hand side: zero except `−boundary_value` at index 0.
pub fn build_steady_rhs(unknown_count: usize, boundary_value: f64) -> DVector<f64> {
    let mut rhs = DVector::zeros(unknown_count);
    if unknown_count > 0 {
        rhs[0] = -boundary_value;
    }
    rhs
}

/// Solve the steady problem and return `(positions, profile)`.
///
/// Uses the default bounded Jacobi configuration; non-convergence is an
/// error rather than a hang.
pub fn solve_steady(
    domain_length: f64,
    spatial_node_count: u32,
    diffusion_constant: f64,
    boundary_value: f64,
) -> DiffusionResult<(Vec<f64>, Vec<f64>)> {
    let params = SteadyParams {
        domain_length,
        spatial_nodes: spatial_node_count,
        diffusion_constant,
        boundary_value,
    };
    let solution = solve_steady_with(&params, &JacobiConfig::default(), None)?;
    Ok((solution.positions, solution.profile))
}

/// Steady pipeline with explicit solver configuration and optional stop flag.
///
/// With [`JacobiConfig::unbounded`] the loop runs until convergence, as the
/// uncapped formulation does; otherwise reaching the cap is reported as
/// [`DiffusionError::NumericalInstability`].
pub fn solve_steady_with(
    params: &SteadyParams,
    config: &JacobiConfig,
    stop_flag: Option<&AtomicBool>,
) -> DiffusionResult<SteadySolution> {
    params.validate()?;

    let unknowns = params.unknowns();
    let system = assemble_steady_system(params)?;

    tracing::info!(
        unknowns,
        spatial_step = params.spatial_step(),
        "solving steady diffusion system"
    );
    if !system.is_diagonally_dominant() {
        tracing::warn!("steady system is not diagonally dominant; Jacobi may diverge");
    }

    let timer = Timer::start("steady solve");
    let result = jacobi_solve_from(&system, DVector::zeros(unknowns), config, stop_flag)?;
    timer.stop_and_log();

    if !result.converged {
        return Err(DiffusionError::NumericalInstability {
            what: format!(
                "steady solve did not converge within {} iterations (step norm {:.3e})",
                result.iterations, result.step_norm
            ),
        });
    }

    Ok(SteadySolution {
        positions: linspace(0.0, params.domain_length, unknowns),
        profile: result.x.iter().copied().collect(),
        iterations: result.iterations,
        step_norm: result.step_norm,
        converged: result.converged,
    })
}

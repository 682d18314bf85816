//! Transient diffusion: block-structured space/time assembly and pipeline.
//!
//! Unknowns are ordered time-slice major: global index `j·N + i` is spatial
//! unknown `i` at time step `j`, with `N = spatial_nodes − 1`.

use crate::error::DiffusionResult;
use crate::params::TransientParams;
use crate::profile::reshape_row_major;
use ff_core::{Timer, linspace};
use ff_solver::{JacobiConfig, LinearSystem, jacobi_solve_from};
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CooMatrix;
use std::sync::atomic::AtomicBool;

/// Transient profile with solver diagnostics.
#[derive(Clone, Debug)]
pub struct TransientSolution {
    /// `N` evenly spaced samples over `[0, length]`
    pub positions: Vec<f64>,
    /// Shape `(time_nodes, N)`; row `j` is the spatial profile at step `j`
    pub profile: DMatrix<f64>,
    pub iterations: usize,
    pub step_norm: f64,
    /// False when the iteration cap was reached first
    pub converged: bool,
}

impl TransientSolution {
    /// Profile as charted: the solved values negated.
    pub fn display_profile(&self) -> DMatrix<f64> {
        -&self.profile
    }

    pub fn time_steps(&self) -> usize {
        self.profile.nrows()
    }
}

/// `sqrt(material_constant · dt / dx²)` with `dx = length / spatial_nodes`
/// and `dt = total_time / time_nodes`.
pub fn transient_alpha(
    length: f64,
    total_time: f64,
    spatial_nodes: u32,
    time_nodes: u32,
    material_constant: f64,
) -> f64 {
    let dx = length / f64::from(spatial_nodes);
    let dt = total_time / f64::from(time_nodes);
    (material_constant * dt / dx.powi(2)).sqrt()
}

/// Band coefficients shared by the dense builder and the sparse assembly.
struct TransientStencil {
    n: usize,
    steps: usize,
    dx2: f64,
    /// Coupling to the previous time slice
    b0: f64,
    b1: f64,
    /// Coupling to the next time slice
    b2: f64,
}

impl TransientStencil {
    fn new(
        length: f64,
        total_time: f64,
        spatial_nodes: u32,
        time_nodes: u32,
        alpha: f64,
    ) -> Self {
        let dx = length / f64::from(spatial_nodes);
        let dt = total_time / f64::from(time_nodes);
        let dx2 = dx.powi(2);
        Self {
            n: (spatial_nodes as usize).saturating_sub(1),
            steps: time_nodes as usize,
            dx2,
            b0: dt,
            b1: -2.0 * dx2 - dt + dx2 * alpha.powi(2),
            b2: dt,
        }
    }

    fn size(&self) -> usize {
        self.n * self.steps
    }

    fn row(&self, i: usize, mut emit: impl FnMut(usize, f64)) {
        let n = self.n;
        emit(i, self.b1);
        if i >= n {
            emit(i - n, self.b0);
        }
        if i + n < self.size() {
            emit(i + n, self.b2);
        }
        // Spatial neighbours never wrap across a slice boundary.
        if (i + 1) % n != 0 {
            emit(i + 1, self.dx2);
        }
        if i % n != 0 {
            emit(i - 1, self.dx2);
        }
    }
}

/// Dense `(N·time_nodes)²` coefficient matrix.
///
/// Diagonal `−2dx² − dt + dx²α²`, `dt` at offsets `±N` between consecutive
/// time slices, `dx²` between spatial neighbours inside a slice.
pub fn build_transient_matrix(
    length: f64,
    total_time: f64,
    spatial_nodes: u32,
    time_nodes: u32,
    alpha: f64,
) -> DMatrix<f64> {
    let stencil = TransientStencil::new(length, total_time, spatial_nodes, time_nodes, alpha);
    let size = stencil.size();
    let mut matrix = DMatrix::zeros(size, size);
    for i in 0..size {
        stencil.row(i, |k, v| matrix[(i, k)] = v);
    }
    matrix
}

/// Same entries as [`build_transient_matrix`], assembled sparse for the solver.
fn assemble_transient_system(params: &TransientParams) -> DiffusionResult<LinearSystem> {
    let stencil = TransientStencil::new(
        params.length,
        params.total_time,
        params.spatial_nodes,
        params.time_nodes,
        params.alpha(),
    );
    let size = stencil.size();
    let mut coo = CooMatrix::new(size, size);
    for i in 0..size {
        stencil.row(i, |k, v| coo.push(i, k, v));
    }
    let rhs = build_transient_rhs(
        params.length,
        params.total_time,
        params.spatial_nodes,
        params.time_nodes,
        params.boundary_value,
        params.initial_value,
    );
    Ok(LinearSystem::from_coo(&coo, rhs)?)
}

/// Right-hand side of length `N·time_nodes`.
///
/// Slice `j` carries `(j+1)·dt` on its first unknown and `−j·dx²` elsewhere;
/// then `boundary_value` is subtracted at index 0 and `initial_value` at the
/// first unknown of the last slice.
pub fn build_transient_rhs(
    length: f64,
    total_time: f64,
    spatial_nodes: u32,
    time_nodes: u32,
    boundary_value: f64,
    initial_value: f64,
) -> DVector<f64> {
    let dx = length / f64::from(spatial_nodes);
    let dt = total_time / f64::from(time_nodes);
    let n = (spatial_nodes as usize).saturating_sub(1);
    let steps = time_nodes as usize;

    let mut rhs = DVector::zeros(n * steps);
    if rhs.is_empty() {
        return rhs;
    }

    for j in 0..steps {
        for i in 0..n {
            rhs[j * n + i] = if i == 0 {
                (j + 1) as f64 * dt
            } else {
                j as f64 * -dx.powi(2)
            };
        }
    }

    rhs[0] -= boundary_value;
    rhs[n * (steps - 1)] -= initial_value;

    rhs
}

/// Solve the transient problem and return the `(time_nodes, N)` profile.
pub fn solve_transient(
    length: f64,
    total_time: f64,
    spatial_nodes: u32,
    time_nodes: u32,
    material_constant: f64,
    boundary_value: f64,
    initial_value: f64,
) -> DiffusionResult<DMatrix<f64>> {
    let params = TransientParams {
        length,
        total_time,
        spatial_nodes,
        time_nodes,
        material_constant,
        boundary_value,
        initial_value,
    };
    let solution = solve_transient_with(&params, &JacobiConfig::default(), None)?;
    Ok(solution.profile)
}

/// Transient pipeline with explicit solver configuration and optional stop flag.
///
/// Reaching the iteration cap is not an error: the last iterate is reshaped
/// and returned with `converged == false`.
pub fn solve_transient_with(
    params: &TransientParams,
    config: &JacobiConfig,
    stop_flag: Option<&AtomicBool>,
) -> DiffusionResult<TransientSolution> {
    params.validate()?;

    let alpha = params.alpha();
    let system = assemble_transient_system(params)?;

    let n = params.spatial_unknowns();
    let steps = params.time_nodes as usize;
    tracing::info!(
        unknowns = system.dim(),
        spatial_unknowns = n,
        time_nodes = steps,
        alpha,
        "solving transient diffusion system"
    );
    tracing::debug!(
        diagonally_dominant = system.is_diagonally_dominant(),
        "transient system assembled"
    );

    let timer = Timer::start("transient solve");
    let result = jacobi_solve_from(&system, DVector::zeros(system.dim()), config, stop_flag)?;
    timer.stop_and_log();

    if !result.converged {
        tracing::warn!(
            iterations = result.iterations,
            step_norm = result.step_norm,
            "transient solve stopped at the iteration cap; profile is best effort"
        );
    }

    debug_assert_eq!(result.x.len(), n * steps);
    let profile = reshape_row_major(result.x.as_slice(), steps, n)?;

    Ok(TransientSolution {
        positions: linspace(0.0, params.length, n),
        profile,
        iterations: result.iterations,
        step_norm: result.step_norm,
        converged: result.converged,
    })
}

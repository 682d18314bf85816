//! Discretization parameters for both regimes.

use crate::error::{DiffusionError, DiffusionResult};
use ff_core::{ensure_finite, ensure_positive};

/// Steady-state boundary-value problem.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteadyParams {
    /// Length of the diffusion domain
    pub domain_length: f64,
    /// Spatial node count, including the fixed boundary node
    pub spatial_nodes: u32,
    pub diffusion_constant: f64,
    /// Fixed value at node 0
    pub boundary_value: f64,
}

impl SteadyParams {
    pub fn validate(&self) -> DiffusionResult<()> {
        ensure_positive(self.domain_length, "domain_length")?;
        ensure_positive(self.diffusion_constant, "diffusion_constant")?;
        ensure_finite(self.boundary_value, "boundary_value")?;
        if self.spatial_nodes < 2 {
            return Err(DiffusionError::InvalidInput {
                what: format!(
                    "spatial_nodes must be at least 2 (got {}), no unknowns remain",
                    self.spatial_nodes
                ),
            });
        }
        Ok(())
    }

    /// `domain_length / spatial_nodes`, real division.
    pub fn spatial_step(&self) -> f64 {
        self.domain_length / f64::from(self.spatial_nodes)
    }

    /// Interior unknowns: every node but the fixed boundary.
    pub fn unknowns(&self) -> usize {
        (self.spatial_nodes as usize).saturating_sub(1)
    }
}

/// Transient initial/boundary-value problem.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransientParams {
    pub length: f64,
    /// Total simulated time
    pub total_time: f64,
    pub spatial_nodes: u32,
    pub time_nodes: u32,
    pub material_constant: f64,
    pub boundary_value: f64,
    pub initial_value: f64,
}

impl TransientParams {
    pub fn validate(&self) -> DiffusionResult<()> {
        ensure_positive(self.length, "length")?;
        ensure_positive(self.total_time, "total_time")?;
        ensure_positive(self.material_constant, "material_constant")?;
        ensure_finite(self.boundary_value, "boundary_value")?;
        ensure_finite(self.initial_value, "initial_value")?;
        if self.spatial_nodes < 2 {
            return Err(DiffusionError::InvalidInput {
                what: format!(
                    "spatial_nodes must be at least 2 (got {})",
                    self.spatial_nodes
                ),
            });
        }
        if self.time_nodes < 1 {
            return Err(DiffusionError::InvalidInput {
                what: "time_nodes must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn dx(&self) -> f64 {
        self.length / f64::from(self.spatial_nodes)
    }

    pub fn dt(&self) -> f64 {
        self.total_time / f64::from(self.time_nodes)
    }

    /// `sqrt(material_constant · dt / dx²)`
    pub fn alpha(&self) -> f64 {
        (self.material_constant * self.dt() / self.dx().powi(2)).sqrt()
    }

    /// Spatial unknowns per time slice (`N`).
    pub fn spatial_unknowns(&self) -> usize {
        (self.spatial_nodes as usize).saturating_sub(1)
    }

    /// Total unknowns `N · time_nodes`.
    pub fn unknowns(&self) -> usize {
        self.spatial_unknowns()
            .saturating_mul(self.time_nodes as usize)
    }
}

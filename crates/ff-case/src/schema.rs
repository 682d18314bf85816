//! Case file schema.

use ff_diffusion::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, JacobiConfig, SteadyParams, TransientParams,
};
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub problem: ProblemDef,
    #[serde(default)]
    pub solver: SolverDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemDef {
    Steady(SteadyParams),
    Transient(TransientParams),
}

impl ProblemDef {
    pub fn kind(&self) -> &'static str {
        match self {
            ProblemDef::Steady(_) => "steady",
            ProblemDef::Transient(_) => "transient",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Ignore `max_iterations` and iterate until convergence
    #[serde(default)]
    pub unbounded: bool,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            unbounded: false,
        }
    }
}

impl SolverDef {
    pub fn jacobi_config(&self) -> JacobiConfig {
        let base = if self.unbounded {
            JacobiConfig::unbounded()
        } else {
            JacobiConfig::bounded(self.max_iterations)
        };
        base.with_tolerance(self.tolerance)
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

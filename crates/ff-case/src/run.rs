//! Execute a case through the matching diffusion pipeline.

use crate::report::{Report, SteadyReport, TransientReport};
use crate::schema::{CaseFile, ProblemDef};
use crate::validate::validate_case;
use crate::CaseResult;
use ff_diffusion::{solve_steady_with, solve_transient_with};
use std::sync::atomic::AtomicBool;

#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    /// Report transient profiles negated, as they are charted
    pub negate_transient: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            negate_transient: true,
        }
    }
}

pub fn run_case(
    case: &CaseFile,
    options: &RunOptions,
    stop_flag: Option<&AtomicBool>,
) -> CaseResult<Report> {
    validate_case(case)?;
    let config = case.solver.jacobi_config();
    tracing::info!(case = %case.name, kind = case.problem.kind(), "running case");

    let report = match &case.problem {
        ProblemDef::Steady(params) => {
            let solution = solve_steady_with(params, &config, stop_flag)?;
            Report::Steady(SteadyReport::new(&case.name, solution))
        }
        ProblemDef::Transient(params) => {
            let solution = solve_transient_with(params, &config, stop_flag)?;
            Report::Transient(TransientReport::new(
                &case.name,
                &solution,
                options.negate_transient,
            ))
        }
    };

    tracing::info!(
        case = %case.name,
        iterations = report.iterations(),
        converged = report.converged(),
        "case finished"
    );
    Ok(report)
}

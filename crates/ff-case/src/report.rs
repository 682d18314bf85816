//! Result reports and CSV export.

use ff_diffusion::{SteadySolution, TransientSolution};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SteadyReport {
    pub case: String,
    pub positions: Vec<f64>,
    pub profile: Vec<f64>,
    pub iterations: usize,
    pub step_norm: Option<f64>,
    pub converged: bool,
}

impl SteadyReport {
    pub fn new(case: &str, solution: SteadySolution) -> Self {
        Self {
            case: case.to_string(),
            positions: solution.positions,
            profile: solution.profile,
            iterations: solution.iterations,
            step_norm: finite(solution.step_norm),
            converged: solution.converged,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransientReport {
    pub case: String,
    pub positions: Vec<f64>,
    /// One row per time step
    pub profile: Vec<Vec<f64>>,
    /// Whether `profile` holds the negated (charted) values
    pub negated: bool,
    pub iterations: usize,
    pub step_norm: Option<f64>,
    pub converged: bool,
}

impl TransientReport {
    pub fn new(case: &str, solution: &TransientSolution, negate: bool) -> Self {
        let values = if negate {
            solution.display_profile()
        } else {
            solution.profile.clone()
        };
        let profile = values
            .row_iter()
            .map(|row| row.iter().copied().collect::<Vec<f64>>())
            .collect();
        Self {
            case: case.to_string(),
            positions: solution.positions.clone(),
            profile,
            negated: negate,
            iterations: solution.iterations,
            step_norm: finite(solution.step_norm),
            converged: solution.converged,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Steady(SteadyReport),
    Transient(TransientReport),
}

impl Report {
    pub fn converged(&self) -> bool {
        match self {
            Report::Steady(r) => r.converged,
            Report::Transient(r) => r.converged,
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            Report::Steady(r) => r.iterations,
            Report::Transient(r) => r.iterations,
        }
    }

    pub fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Report::Steady(r) => write_steady_csv(out, r),
            Report::Transient(r) => write_transient_csv(out, r),
        }
    }
}

/// `position,value` per unknown.
pub fn write_steady_csv<W: Write>(out: &mut W, report: &SteadyReport) -> io::Result<()> {
    writeln!(out, "position,value")?;
    for (x, v) in report.positions.iter().zip(&report.profile) {
        writeln!(out, "{},{}", x, v)?;
    }
    Ok(())
}

/// `position,step_1,...,step_T`: one line per spatial unknown.
pub fn write_transient_csv<W: Write>(out: &mut W, report: &TransientReport) -> io::Result<()> {
    write!(out, "position")?;
    for j in 1..=report.profile.len() {
        write!(out, ",step_{}", j)?;
    }
    writeln!(out)?;

    for (i, x) in report.positions.iter().enumerate() {
        write!(out, "{}", x)?;
        for row in &report.profile {
            match row.get(i) {
                Some(v) => write!(out, ",{}", v)?,
                None => write!(out, ",")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_diffusion::{JacobiConfig, TransientParams, solve_transient_with};

    fn transient_solution() -> TransientSolution {
        let params = TransientParams {
            length: 1.0,
            total_time: 0.1,
            spatial_nodes: 4,
            time_nodes: 2,
            material_constant: 0.1,
            boundary_value: 100.0,
            initial_value: 20.0,
        };
        solve_transient_with(&params, &JacobiConfig::default(), None).unwrap()
    }

    #[test]
    fn steady_csv_layout() {
        let report = SteadyReport {
            case: "rod".to_string(),
            positions: vec![0.0, 5.0],
            profile: vec![2.5, 1.25],
            iterations: 3,
            step_norm: Some(1e-7),
            converged: true,
        };
        let mut buf = Vec::new();
        write_steady_csv(&mut buf, &report).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "position,value\n0,2.5\n5,1.25\n"
        );
    }

    #[test]
    fn transient_report_optionally_negates() {
        let solution = transient_solution();
        let shown = TransientReport::new("slab", &solution, true);
        let raw = TransientReport::new("slab", &solution, false);
        assert_eq!(shown.profile.len(), 2);
        assert_eq!(shown.profile[0].len(), 3);
        assert_eq!(shown.profile[1][2], -raw.profile[1][2]);
        assert!(shown.negated && !raw.negated);
    }

    #[test]
    fn transient_csv_has_one_column_per_step() {
        let report = TransientReport::new("slab", &transient_solution(), true);
        let mut buf = Vec::new();
        write_transient_csv(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "position,step_1,step_2");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("0,"));
        assert_eq!(lines[3].split(',').count(), 3);
    }

    #[test]
    fn non_finite_step_norm_is_dropped() {
        assert_eq!(finite(f64::INFINITY), None);
        assert_eq!(finite(0.5), Some(0.5));
    }
}

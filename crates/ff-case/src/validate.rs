//! Case validation logic.

use crate::schema::{CaseFile, LATEST_VERSION, ProblemDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {kind} problem: {reason}")]
    InvalidProblem { kind: &'static str, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_case(case: &CaseFile) -> Result<(), ValidationError> {
    if case.version == 0 || case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }

    if case.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: format!("{:?}", case.name),
            reason: "must not be empty".to_string(),
        });
    }

    let tolerance = case.solver.tolerance;
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "solver.tolerance".to_string(),
            value: tolerance.to_string(),
            reason: "must be positive".to_string(),
        });
    }

    let checked = match &case.problem {
        ProblemDef::Steady(params) => params.validate(),
        ProblemDef::Transient(params) => params.validate(),
    };
    checked.map_err(|e| ValidationError::InvalidProblem {
        kind: case.problem.kind(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SolverDef;
    use ff_diffusion::SteadyParams;

    fn case() -> CaseFile {
        CaseFile {
            version: 1,
            name: "rod".to_string(),
            description: None,
            problem: ProblemDef::Steady(SteadyParams {
                domain_length: 10.0,
                spatial_nodes: 5,
                diffusion_constant: 1.0,
                boundary_value: 100.0,
            }),
            solver: SolverDef::default(),
        }
    }

    #[test]
    fn accepts_valid_case() {
        validate_case(&case()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut c = case();
        c.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_blank_name() {
        let mut c = case();
        c.name = "  ".to_string();
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_bad_tolerance() {
        let mut c = case();
        c.solver.tolerance = -1.0;
        assert!(validate_case(&c).is_err());
    }

    #[test]
    fn rejects_invalid_problem() {
        let mut c = case();
        c.problem = ProblemDef::Steady(SteadyParams {
            domain_length: 10.0,
            spatial_nodes: 1,
            diffusion_constant: 1.0,
            boundary_value: 100.0,
        });
        let err = validate_case(&c).unwrap_err();
        assert!(err.to_string().contains("steady"));
    }
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use ff_case::{
    CaseError, CaseFile, CaseResult, LATEST_VERSION, ProblemDef, Report, RunOptions, SolverDef,
    load_case, run_case, validate_case,
};
use ff_diffusion::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, SteadyParams, TransientParams};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ff-cli")]
#[command(about = "FickFlow CLI - 1-D finite-difference diffusion solver", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log solve timings
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the steady-state problem
    Steady {
        /// Length of the diffusion domain
        #[arg(long)]
        length: f64,
        /// Spatial node count (at least 2)
        #[arg(long)]
        nodes: u32,
        /// Diffusion constant
        #[arg(long)]
        diffusion: f64,
        /// Boundary value at node 0
        #[arg(long)]
        boundary: f64,
        #[command(flatten)]
        solver: SolverArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Solve the transient problem
    Transient {
        /// Length of the diffusion domain
        #[arg(long)]
        length: f64,
        /// Total simulated time
        #[arg(long)]
        time: f64,
        /// Spatial node count (at least 2)
        #[arg(long)]
        nodes: u32,
        /// Time node count
        #[arg(long)]
        time_nodes: u32,
        /// Material constant
        #[arg(long)]
        material: f64,
        /// Boundary value
        #[arg(long)]
        boundary: f64,
        /// Initial value
        #[arg(long)]
        initial: f64,
        /// Report solved values instead of the negated charted values
        #[arg(long)]
        raw: bool,
        #[command(flatten)]
        solver: SolverArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a case file (YAML, or JSON by extension)
    Run {
        /// Path to the case file
        case_path: PathBuf,
        /// Report solved values instead of the negated charted values
        #[arg(long)]
        raw: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate a case file without solving
    Validate {
        /// Path to the case file
        case_path: PathBuf,
    },
}

#[derive(Args)]
struct SolverArgs {
    /// Convergence threshold on the change between iterates
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
    /// Iteration cap
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Iterate until convergence with no cap (may not terminate)
    #[arg(long)]
    unbounded: bool,
}

impl SolverArgs {
    fn solver_def(&self) -> SolverDef {
        SolverDef {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            unbounded: self.unbounded,
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

fn main() -> CaseResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.timing {
        ff_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Steady {
            length,
            nodes,
            diffusion,
            boundary,
            solver,
            output,
        } => {
            let case = inline_case(
                "steady",
                ProblemDef::Steady(SteadyParams {
                    domain_length: length,
                    spatial_nodes: nodes,
                    diffusion_constant: diffusion,
                    boundary_value: boundary,
                }),
                solver.solver_def(),
            );
            cmd_solve(&case, false, &output)
        }
        Commands::Transient {
            length,
            time,
            nodes,
            time_nodes,
            material,
            boundary,
            initial,
            raw,
            solver,
            output,
        } => {
            let case = inline_case(
                "transient",
                ProblemDef::Transient(TransientParams {
                    length,
                    total_time: time,
                    spatial_nodes: nodes,
                    time_nodes,
                    material_constant: material,
                    boundary_value: boundary,
                    initial_value: initial,
                }),
                solver.solver_def(),
            );
            cmd_solve(&case, raw, &output)
        }
        Commands::Run {
            case_path,
            raw,
            output,
        } => {
            let case = load_case(&case_path)?;
            cmd_solve(&case, raw, &output)
        }
        Commands::Validate { case_path } => cmd_validate(&case_path),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn inline_case(name: &str, problem: ProblemDef, solver: SolverDef) -> CaseFile {
    CaseFile {
        version: LATEST_VERSION,
        name: name.to_string(),
        description: None,
        problem,
        solver,
    }
}

fn cmd_validate(case_path: &Path) -> CaseResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_case(case_path)?;
    validate_case(&case)?;
    println!("✓ Case '{}' ({}) is valid", case.name, case.problem.kind());
    Ok(())
}

fn cmd_solve(case: &CaseFile, raw: bool, output: &OutputArgs) -> CaseResult<()> {
    let options = RunOptions {
        negate_transient: !raw,
    };
    let report = run_case(case, &options, None)?;
    tracing::info!(
        case = %case.name,
        kind = case.problem.kind(),
        iterations = report.iterations(),
        converged = report.converged(),
        "case solved"
    );
    if !report.converged() {
        tracing::warn!(
            iterations = report.iterations(),
            "solver stopped without converging; writing best-effort profile"
        );
    }

    match &output.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_report(&mut out, &report, output.format)?;
            out.flush()?;
            tracing::info!(path = %path.display(), format = ?output.format, "✓ wrote report");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(&mut out, &report, output.format)?;
        }
    }
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &Report, format: Format) -> CaseResult<()> {
    match format {
        Format::Csv => report.write_csv(out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, report).map_err(CaseError::from)?;
            writeln!(out)?;
        }
        Format::Table => write_table(out, report)?,
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    match report {
        Report::Steady(r) => {
            writeln!(out, "Steady profile: {}", r.case)?;
            writeln!(out, "  {:>12}  {:>14}", "x", "T")?;
            for (x, v) in r.positions.iter().zip(&r.profile) {
                writeln!(out, "  {:>12.4}  {:>14.6}", x, v)?;
            }
        }
        Report::Transient(r) => {
            let label = if r.negated { "-T" } else { "T" };
            writeln!(out, "Transient profile: {} ({})", r.case, label)?;
            write!(out, "  {:>12}", "position")?;
            for j in 1..=r.profile.len() {
                write!(out, "  {:>14}", format!("step {}", j))?;
            }
            writeln!(out)?;
            for (i, x) in r.positions.iter().enumerate() {
                write!(out, "  {:>12.4}", x)?;
                for row in &r.profile {
                    write!(out, "  {:>14.6}", row[i])?;
                }
                writeln!(out)?;
            }
        }
    }
    writeln!(
        out,
        "Iterations: {}  converged: {}",
        report.iterations(),
        report.converged()
    )
}

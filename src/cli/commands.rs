use crate::config::{load_planner_config, PlannerConfig};
use crate::export::{render_artifact, write_artifact, ArtifactFormat};
use crate::pipeline::{plan_file, PlanRun};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Exit status of `plan --fail-on-cycle` when the graph has a cycle.
pub const CYCLE_EXIT_CODE: u8 = 2;

/// Command-line interface for apiseq
///
/// Builds the dependency graph of an OpenAPI document and prints the order in
/// which its operations can be called.
#[derive(Parser)]
#[command(name = "apiseq")]
#[command(about = "OpenAPI operation dependency planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compute the execution plan of a specification
    Plan {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Write the artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write `<title slug>.plan.<ext>` into this directory instead of stdout
        #[arg(long, conflicts_with = "output")]
        output_dir: Option<PathBuf>,

        /// Artifact format (default: from the output extension, else json)
        #[arg(long, value_enum)]
        format: Option<ArtifactFormat>,

        /// Planner configuration file (TOML)
        #[arg(long, env = "APISEQ_CONFIG")]
        config: Option<PathBuf>,

        /// Exit with status 2 when the graph contains a cycle
        #[arg(long, default_value_t = false)]
        fail_on_cycle: bool,
    },
    /// List operations with their producer/protected classification
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Planner configuration file (TOML)
        #[arg(long, env = "APISEQ_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print the default planner configuration as TOML
    Config,
}

/// Resolve the planner configuration.
///
/// An explicitly named file must exist; without one the defaults apply.
fn resolve_config(path: Option<&Path>) -> anyhow::Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let config = load_planner_config(path)?
        .with_context(|| format!("Planner config not found: {}", path.display()))?;
    debug!(path = %path.display(), "loaded planner config");
    Ok(config)
}

fn summary_line(run: &PlanRun) -> String {
    let status = if run.plan.is_acyclic() {
        "ok"
    } else {
        "cycle_detected"
    };
    format!(
        "{status}: {} operations, {} edges, {} cycles",
        run.graph.node_count(),
        run.graph.edge_count(),
        run.plan.cycles.len()
    )
}

fn inspect_lines(run: &PlanRun) -> Vec<String> {
    run.operations
        .iter()
        .zip(&run.classifications)
        .map(|(op, class)| {
            let headers: Vec<&str> = class.required_headers.iter().map(String::as_str).collect();
            format!(
                "{}\tproducer={}\tprotected={}\theaders=[{}]",
                op.id,
                class.is_producer,
                class.is_protected,
                headers.join(",")
            )
        })
        .collect()
}

/// Execute a parsed command
///
/// # Errors
///
/// Returns an error if:
/// - The specification cannot be read or parsed
/// - An explicitly named configuration file is missing or invalid
/// - The artifact cannot be written
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Plan {
            spec,
            output,
            output_dir,
            format,
            config,
            fail_on_cycle,
        } => {
            let config = resolve_config(config.as_deref())?;
            let run = plan_file(&spec, &config)?;
            let artifact = run.artifact();

            let output = output.or_else(|| {
                output_dir.map(|dir| {
                    dir.join(run.default_artifact_name(format.unwrap_or_default()))
                })
            });
            match &output {
                Some(path) => {
                    let format = format.unwrap_or_else(|| ArtifactFormat::from_path(path));
                    write_artifact(&artifact, path, format)?;
                }
                None => {
                    let rendered = render_artifact(&artifact, format.unwrap_or_default())?;
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{}", rendered.trim_end())
                        .context("Failed to write plan to stdout")?;
                }
            }
            eprintln!("{}", summary_line(&run));

            if fail_on_cycle && !artifact.is_ok() {
                return Ok(ExitCode::from(CYCLE_EXIT_CODE));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { spec, config } => {
            let config = resolve_config(config.as_deref())?;
            let run = plan_file(&spec, &config)?;
            let mut stdout = std::io::stdout().lock();
            for line in inspect_lines(&run) {
                writeln!(stdout, "{line}").context("Failed to write to stdout")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            let rendered = PlannerConfig::default().to_toml_string()?;
            print!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Parse process arguments and execute the command
pub fn run_cli() -> anyhow::Result<ExitCode> {
    run(Cli::parse())
}

//! dbbench-viz: chart database benchmark results.
//!
//! ```text
//! dbbench-viz render metrics.csv -o charts -m both
//! dbbench-viz plan metrics.csv -m per-entity
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use dbbench_viz::config::{Config, FailurePolicy};
use dbbench_viz::group::{plan, unclassified_operations, GroupingMode};
use dbbench_viz::pipeline::Pipeline;
use dbbench_viz::record::load_records;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Database benchmark chart generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one PNG chart per operation (or entity/operation) group
    Render(RenderArgs),
    /// List the charts a render would produce without writing anything
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Benchmark CSV (defaults to the config file value, then metrics.csv)
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    output: Option<PathBuf>,

    /// Grouping of records into charts
    #[arg(short, long, value_enum)]
    mode: Option<ModeOpt>,

    /// Output resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// Theme: whitegrid, darkgrid, white, ticks
    #[arg(long)]
    theme: Option<String>,

    /// Palette: deep, muted, colorblind
    #[arg(long)]
    palette: Option<String>,

    /// YAML configuration file
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Stop at the first chart that cannot be written
    #[arg(long, action = ArgAction::SetTrue)]
    fail_fast: bool,

    /// Debug logging
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short, long, action = ArgAction::SetTrue)]
    quiet: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Benchmark CSV
    #[arg(default_value = "metrics.csv", value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Grouping of records into charts
    #[arg(short, long, value_enum, default_value_t = ModeOpt::Global)]
    mode: ModeOpt,

    /// Debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeOpt {
    Global,
    PerEntity,
    Both,
}

impl From<ModeOpt> for GroupingMode {
    fn from(value: ModeOpt) -> Self {
        match value {
            ModeOpt::Global => GroupingMode::Global,
            ModeOpt::PerEntity => GroupingMode::PerEntity,
            ModeOpt::Both => GroupingMode::Both,
        }
    }
}

/// Exit status when some charts failed but the run completed.
const EXIT_PARTIAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = match &cli.command {
        Command::Render(args) if args.verbose => "debug",
        Command::Render(args) if args.quiet => "warn",
        Command::Plan(args) if args.verbose => "debug",
        Command::Render(_) | Command::Plan(_) => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let outcome = match cli.command {
        Command::Render(args) => handle_render(&args),
        Command::Plan(args) => handle_plan(&args).map(|()| ExitCode::SUCCESS),
    };
    outcome.unwrap_or_else(|err| {
        eprintln!("error: {err:#}");
        ExitCode::FAILURE
    })
}

fn resolve_config(args: &RenderArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(input) = &args.input {
        config.input_path.clone_from(input);
    }
    if let Some(output) = &args.output {
        config.output_dir.clone_from(output);
    }
    if let Some(mode) = args.mode {
        config.grouping_mode = mode.into();
    }
    if let Some(dpi) = args.dpi {
        config.dpi = dpi;
    }
    if let Some(theme) = &args.theme {
        config.theme.clone_from(theme);
    }
    if let Some(palette) = &args.palette {
        config.palette.clone_from(palette);
    }
    if args.fail_fast {
        config.failure_policy = FailurePolicy::Abort;
    }
    Ok(config)
}

fn handle_render(args: &RenderArgs) -> Result<ExitCode> {
    let config = resolve_config(args)?;
    let pipeline = Pipeline::new(config).context("invalid configuration")?;
    let report = match pipeline.run() {
        Ok(report) => report,
        // With --fail-fast the first chart failure ends the run.
        Err(err) if !err.is_data_load() && !err.is_config() => {
            eprintln!("stopped at first failed chart: {err}");
            return Ok(ExitCode::from(EXIT_PARTIAL));
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("charting {}", pipeline.config().input_path.display()));
        }
    };

    if report.is_success() {
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!(
        "{} chart(s) written, {} failed:",
        report.written.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        eprintln!("  {}: {}", failure.key, failure.error);
    }
    Ok(ExitCode::from(EXIT_PARTIAL))
}

fn handle_plan(args: &PlanArgs) -> Result<()> {
    let records = load_records(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mode = GroupingMode::from(args.mode);

    for group in plan(&records, mode) {
        println!("{}  {}  {}", group.key, group.family, group.records);
    }
    let skipped = unclassified_operations(&records);
    if !skipped.is_empty() {
        println!("unclassified: {}", skipped.join(", "));
    }
    Ok(())
}

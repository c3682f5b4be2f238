//! datefold - collapse datestamped directories into calendar buckets.
//!
//! Usage:
//!   dfold [PATH]                     Collapse the children of PATH
//!   dfold -n [PATH]                  Report what a collapse would do
//!   dfold plan [PATH] --format json  Print the assignment only
//!   dfold --help                     Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use datefold_core::CollapseConfig;
use datefold_ops::{CollapsePlan, Collapser, MergeReport};

#[derive(Parser)]
#[command(
    name = "datefold",
    version,
    about = "Collapse datestamped backup directories into calendar buckets",
    long_about = "datefold reorganizes a flat set of date-stamped directories into a\n\
                  progressively coarser hierarchy: recent dates keep daily granularity,\n\
                  older dates collapse into weekly, monthly and finally yearly buckets."
)]
struct Cli {
    /// Directory whose children will be collapsed (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Perform every check and report every action without touching the filesystem
    #[arg(short = 'n', long)]
    pretend: bool,

    /// Report every planned or performed action
    #[arg(short, long)]
    verbose: bool,

    /// Log filter, e.g. "debug" or "datefold_ops=debug" (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the assignment of directories to calendar buckets
    Plan {
        /// Directory whose children will be planned
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Some(Command::Plan { path, format }) => run_plan(&path, format),
        None => run_collapse(&cli.path, cli.pretend, cli.verbose || cli.pretend),
    }
}

/// Install the tracing subscriber, honoring --log-level over RUST_LOG.
fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run a collapse and print its report.
fn run_collapse(path: &PathBuf, pretend: bool, verbose: bool) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;

    if pretend || verbose {
        println!(
            "{}",
            if pretend {
                "Pretend mode (no actions will be performed)"
            } else {
                "Real mode (directory will be collapsed)"
            }
        );
    }

    let config = CollapseConfig::builder()
        .pretend(pretend)
        .build()
        .context("Invalid configuration")?;

    eprintln!("Collapsing {}...", path.display());
    let report = Collapser::with_config(config).collapse(&path)?;

    print_report(&report, verbose);
    Ok(())
}

/// Print what a collapse run did (or would do).
fn print_report(report: &MergeReport, verbose: bool) {
    if verbose {
        for action in &report.actions {
            println!("{action}");
        }
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!(" warning: {}", warning.message);
        }
    }

    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} renamed, {} removed, {} skipped{}",
        report.renames(),
        report.removals(),
        report.skips(),
        if report.pretend { " (pretend)" } else { "" }
    );
    println!("{}", "─".repeat(60));
}

/// Print the assignment without executing it.
fn run_plan(path: &PathBuf, format: OutputFormat) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;
    let plan = Collapser::new().plan(&path)?;

    match format {
        OutputFormat::Text => print_plan(&path, &plan),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }

    Ok(())
}

/// Print a plan as ruled text.
fn print_plan(path: &std::path::Path, plan: &CollapsePlan) {
    println!("{}", "─".repeat(60));
    println!(" Collapse plan for {}", path.display());
    println!("{}", "─".repeat(60));

    for bucket in &plan.buckets {
        println!();
        println!(" {}  ({})", bucket.destination, bucket.slice);
        for member in &bucket.members {
            let marker = if *member == bucket.destination { "=" } else { "<" };
            println!("   {marker} {member}");
        }
    }

    if !plan.warnings.is_empty() {
        println!();
        for warning in &plan.warnings {
            println!(" warning: {}", warning.message);
        }
    }

    println!();
    println!(" {} directories would move", plan.move_count());
}

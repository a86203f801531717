//! # tally
//!
//! Command-line entry point for the sales reconciliation engine.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse flags (clap)                                                  │
//! │  2. Load TallyConfig (defaults ► tally.toml ► TALLY_* env)              │
//! │  3. Apply flags, validate                                               │
//! │  4. Initialize tracing                                                  │
//! │  5. Dispatch: report | generate                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exits non-zero only for configuration problems. Degraded inputs and
//! failed reports are logged and reported in the run summary instead.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tally_io::pipeline::{self, ReportOutcome, RunSummary};
use tally_io::Generator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::TallyConfig;

// =============================================================================
// Command Line
// =============================================================================

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Reconcile salesman transaction files into revenue reports")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the salesman and product revenue reports
    Report(ReportArgs),

    /// Write a synthetic input dataset
    Generate(GenerateArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Config file (default: platform config dir, then ./tally.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Salesman info file
    #[arg(long, value_name = "PATH")]
    salesmen_file: Option<PathBuf>,

    /// Product catalog file
    #[arg(long, value_name = "PATH")]
    products_file: Option<PathBuf>,

    /// Directory of transaction files
    #[arg(long, value_name = "DIR")]
    sales_dir: Option<PathBuf>,

    /// Salesman report output
    #[arg(long, value_name = "PATH")]
    salesmen_report: Option<PathBuf>,

    /// Product report output
    #[arg(long, value_name = "PATH")]
    products_report: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Config file (default: platform config dir, then ./tally.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for reproducible output (default: derived from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of salesmen
    #[arg(long)]
    salesmen: Option<usize>,

    /// Number of products
    #[arg(long)]
    products: Option<usize>,

    /// Product lines per transaction file
    #[arg(long)]
    sales_per_salesman: Option<usize>,
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Report(args) => {
            let config = report_config(&args)?;
            init_tracing(&config, cli.verbose)?;
            report(&config, args.json)
        }
        Command::Generate(args) => {
            let config = generate_config(&args)?;
            init_tracing(&config, cli.verbose)?;
            generate(&config)
        }
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=...` - Always wins when set
/// - `--verbose` - Debug for everything
/// - Default: `logging.filter` from config (`info,tally=debug`)
fn init_tracing(config: &TallyConfig, verbose: bool) -> Result<()> {
    let fallback = if verbose { "debug" } else { config.logging.filter.as_str() };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback).with_context(|| format!("invalid log filter '{fallback}'"))?,
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

// =============================================================================
// Configuration Assembly
// =============================================================================

fn report_config(args: &ReportArgs) -> Result<TallyConfig> {
    let mut config = TallyConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    let overrides = [
        (&args.salesmen_file, &mut config.input.salesmen_file),
        (&args.products_file, &mut config.input.products_file),
        (&args.sales_dir, &mut config.input.sales_dir),
        (&args.salesmen_report, &mut config.output.salesmen_report),
        (&args.products_report, &mut config.output.products_report),
    ];
    for (flag, slot) in overrides {
        if let Some(path) = flag {
            *slot = path.clone();
        }
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn generate_config(args: &GenerateArgs) -> Result<TallyConfig> {
    let mut config = TallyConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    if let Some(seed) = args.seed {
        config.generator.seed = Some(seed);
    }
    if let Some(salesmen) = args.salesmen {
        config.generator.salesmen = salesmen;
    }
    if let Some(products) = args.products {
        config.generator.products = products;
    }
    if let Some(lines) = args.sales_per_salesman {
        config.generator.sales_per_salesman = lines;
    }

    config.validate().context("invalid configuration")?;
    config.validate_generator().context("invalid generator configuration")?;
    Ok(config)
}

// =============================================================================
// Commands
// =============================================================================

fn report(config: &TallyConfig, json: bool) -> Result<()> {
    let summary = pipeline::run(&config.layout());

    if json {
        println!("{}", summary.to_json()?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "salesmen: {}  products: {}  sale files: {}  sales accepted: {}",
        summary.salesmen, summary.products, summary.sale_files, summary.sales
    );
    for (name, outcome) in [
        ("salesman report", &summary.salesmen_report),
        ("product report", &summary.products_report),
    ] {
        match outcome {
            ReportOutcome::Written { path, rows } => {
                println!("{name}: {rows} rows -> {}", path.display());
            }
            ReportOutcome::Failed { path, error } => {
                println!("{name}: not written ({}): {error}", path.display());
            }
        }
    }
}

fn generate(config: &TallyConfig) -> Result<()> {
    let seed = config.generator.seed.unwrap_or_else(clock_seed);
    info!(seed, "Generating synthetic dataset");

    let layout = config.layout();
    let dataset = Generator::new(seed)
        .write_dataset(&layout, &config.generator_settings())
        .context("failed to write synthetic dataset")?;

    println!(
        "seed {seed}: {} salesmen, {} products, {} sale files under {}",
        dataset.salesmen,
        dataset.products,
        dataset.sale_files,
        layout.sales_dir.display()
    );
    Ok(())
}

/// Seed for runs without an explicit one; logged so the run can be repeated.
fn clock_seed() -> u64 {
    Utc::now().timestamp_micros().unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_flags() {
        let cli = Cli::parse_from(["tally", "-v", "report", "--sales-dir", "/data/sales", "--json"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.sales_dir, Some(PathBuf::from("/data/sales")));
                assert!(args.json);
                assert!(args.config.is_none());
            }
            Command::Generate(_) => panic!("expected report"),
        }
    }

    #[test]
    fn test_generate_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "[generator]\nsalesmen = 3\nseed = 1\n").unwrap();

        let cli = Cli::parse_from([
            "tally",
            "generate",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "5",
            "--products",
            "8",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };

        let config = generate_config(&args).unwrap();
        assert_eq!(config.generator.seed, Some(5));
        assert_eq!(config.generator.salesmen, 3);
        assert_eq!(config.generator.products, 8);
    }

    #[test]
    fn test_report_ignores_generator_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "[generator]\nproducts = 0\n").unwrap();

        let cli = Cli::parse_from(["tally", "report", "--config", path.to_str().unwrap()]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert!(report_config(&args).is_ok());
    }

    #[test]
    fn test_zero_products_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "").unwrap();

        let cli = Cli::parse_from(["tally", "generate", "--products", "0", "--config", path.to_str().unwrap()]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(generate_config(&args).is_err());
    }
}

//! Auction Gym - Main binary
//!
//! Runs a block-parallel ad auction simulation from a JSON run document and
//! compares finished runs.
//!
//! ```text
//! auction-gym run --config world.json [--output runs] [--sequential]
//! auction-gym compare runs/1700000000 runs/1700000100
//! ```
//!
//! A run writes `<output>/<run_id>/` with the seller, metrics and history
//! tables plus `summary.json`. The run id is the unix time at start.

mod config;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quant::MetricComparison;
use simulation::{LocalExecutor, SimulationSession};
use storage::RunWriter;
use tracing::info;

use config::load_config;

/// Auction Gym - ad marketplace simulation
#[derive(Parser, Debug)]
#[command(name = "auction-gym")]
#[command(about = "Block-parallel ad auction marketplace simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a run and write its tables
    Run {
        /// Path to the JSON run document
        #[arg(short, long, value_name = "PATH")]
        config: PathBuf,

        /// Directory that receives one subdirectory per run
        #[arg(short, long, default_value = "runs", env = "AUCTION_OUTPUT")]
        output: PathBuf,

        /// Run blocks sequentially even when built with `parallel`
        #[arg(long, env = "AUCTION_SEQUENTIAL")]
        sequential: bool,
    },
    /// Compare seller outcomes of two finished runs
    Compare {
        /// Baseline run directory
        #[arg(value_name = "RUN_A")]
        run_a: PathBuf,

        /// Candidate run directory
        #[arg(value_name = "RUN_B")]
        run_b: PathBuf,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            output,
            sequential,
        } => run(config, output, sequential),
        Commands::Compare { run_a, run_b, json } => compare(run_a, run_b, json),
    }
}

fn run(config_path: PathBuf, output: PathBuf, sequential: bool) -> Result<()> {
    let config = load_config(&config_path)?;
    let run_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_secs();
    let run_dir = output.join(run_id.to_string());

    let executor = LocalExecutor {
        force_sequential: sequential,
    };
    info!(
        run_id,
        config = %config_path.display(),
        workers = executor.workers(),
        "run planned"
    );

    let session = SimulationSession::new(config)?;
    let result = session.run(&executor)?;
    let files = RunWriter::new(&run_dir)
        .write(&result)
        .with_context(|| format!("failed to write run to {}", run_dir.display()))?;

    let metrics = &result.run.metrics;
    println!("Run {run_id} complete:");
    println!("  Blocks:           {}", metrics.blocks);
    println!("  Opportunities:    {}", metrics.opportunities);
    println!("  Platform revenue: {:.4}", metrics.platform_revenue);
    println!("  Social welfare:   {:.4}", metrics.social_welfare);
    println!("  User experience:  {:.6}", metrics.user_experience);
    println!("  Output:           {}", run_dir.display());
    info!(summary = %files.summary.display(), "done");
    Ok(())
}

fn compare(run_a: PathBuf, run_b: PathBuf, json: bool) -> Result<()> {
    let a = storage::read_run_sellers(&run_a)
        .with_context(|| format!("failed to read run {}", run_a.display()))?;
    let b = storage::read_run_sellers(&run_b)
        .with_context(|| format!("failed to read run {}", run_b.display()))?;
    let rows = quant::compare(&a, &b);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_comparison(&rows);
    }
    Ok(())
}

fn print_comparison(rows: &[MetricComparison]) {
    println!(
        "{:<12} {:>14} {:>14} {:>14} {:>10}",
        "metric", "mean_a", "mean_b", "delta", "p_value"
    );
    for row in rows {
        println!(
            "{:<12} {:>14.4} {:>14.4} {:>14.4} {:>10.4}",
            row.metric, row.mean_a, row.mean_b, row.delta, row.p_value
        );
    }
}

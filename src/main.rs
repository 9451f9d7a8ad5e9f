use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use warpnn_io::{DatasetReader, NeighborWriter};
use warpnn_knn::KnnConfig;

#[derive(Parser)]
#[command(name = "warpnn")]
#[command(about = "Exact k-nearest-neighbor search over time series under windowed DTW")]
#[command(version)]
struct Cli {
    /// Path to the dataset: one sequence per line, whitespace-separated values
    data: PathBuf,

    /// Warping window as a fraction of the sequence length, in (0, 1]
    window: f64,

    /// Number of nearest neighbors to find for every point
    k: usize,

    /// Number of worker threads (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Output path (defaults to <data>_neighbors_<k>.txt)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Serialize)]
struct RunSummary {
    n_points: usize,
    n_timesteps: usize,
    k: usize,
    window: f64,
    radius: usize,
    output: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let dataset = DatasetReader::new(&cli.data)
        .read()
        .context("failed to read dataset")?;
    info!(
        n_points = dataset.len(),
        n_timesteps = dataset.n_timesteps(),
        "dataset loaded"
    );

    let mut config = KnnConfig::new(cli.k, cli.window)?;
    if let Some(threads) = cli.threads {
        config = config.with_threads(threads);
        info!(threads, "worker pool configured");
    }
    let radius = config.radius_for(dataset.n_timesteps());

    let table = config
        .search(&dataset.series)
        .context("neighbor search failed")?;
    info!(n = table.len(), k = table.k(), "search complete");

    let writer = match cli.output {
        Some(path) => NeighborWriter::new(path),
        None => NeighborWriter::for_dataset(&cli.data, cli.k),
    };
    writer
        .write(&table)
        .context("failed to write neighbor table")?;

    let summary = RunSummary {
        n_points: dataset.len(),
        n_timesteps: dataset.n_timesteps(),
        k: cli.k,
        window: cli.window,
        radius,
        output: writer.path().display().to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

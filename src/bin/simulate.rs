//! Run a membership simulation from a JSON config.
//!
//! Usage: `simulate [CONFIG_JSON] [--out DIR] [--name NAME] [--cache-dir DIR] [--redo]`
//!
//! With `--name` the snapshot history is cached under `--cache-dir`
//! (default `simu_archive`). With `--out` every snapshot is flushed to
//! per-year JSONL directories.

use std::path::PathBuf;

use ambassador_sim::flush::{flush_states, run_cached};
use ambassador_sim::stats::{self, YearStats};
use ambassador_sim::{SimConfig, run};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "simulate", version, about = "Run a membership network simulation")]
struct Cli {
    /// JSON config file. Defaults are used when omitted.
    config: Option<PathBuf>,
    /// Flush every snapshot as per-year JSONL under this directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Cache the snapshot history under this name.
    #[arg(long)]
    name: Option<String>,
    /// Where named runs are cached.
    #[arg(long, default_value = "simu_archive")]
    cache_dir: PathBuf,
    /// Recompute a named run even if it is cached.
    #[arg(long, requires = "name")]
    redo: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Cli::parse();
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    info!(
        seed = config.seed,
        years = config.simulation_years,
        cities = config.hub_cities.len(),
        "configuration loaded"
    );

    let (states, year_stats) = match &args.name {
        Some(name) => {
            let states = run_cached(&config, name, args.redo, &args.cache_dir)?;
            let year_stats: Vec<YearStats> = states
                .iter()
                .map(|s| YearStats::measure(s.year, &s.graph))
                .collect();
            (states, year_stats)
        }
        None => {
            let outcome = run(config)?;
            (outcome.states, outcome.stats)
        }
    };

    if let Some(last) = states.last() {
        info!(
            snapshots = states.len(),
            members = last.member_count(),
            links = last.graph.link_count(),
            mean_shortest_path = last.graph.mean_shortest_path().unwrap_or(f64::NAN),
            "final state"
        );
        let per_city = stats::members_per_city_over_time(&states);
        for (city, series) in &per_city {
            info!(city = city.as_str(), members = ?series, "city headcount");
        }
    }

    if let Some(out) = &args.out {
        flush_states(&states, &year_stats, out)?;
        info!(dir = %out.display(), "flushed snapshots");
    }
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::jsonl::{read_snapshots, write_snapshots};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::model::Snapshot;
use crate::sim::run;

pub fn cache_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.jsonl"))
}

/// Load the snapshot history stored under `name`, or run the simulation and
/// store it. `redo` forces a fresh run even when a stored history exists.
///
/// The cache is keyed by name only; callers that change the config must
/// change the name or pass `redo`.
pub fn run_cached(
    config: &SimConfig,
    name: &str,
    redo: bool,
    dir: &Path,
) -> Result<Vec<Snapshot>, SimError> {
    let path = cache_path(dir, name);
    if path.exists() && !redo {
        info!(path = %path.display(), "loading cached run");
        return read_snapshots(&path);
    }

    fs::create_dir_all(dir)?;
    let outcome = run(config.clone())?;
    write_snapshots(&path, &outcome.states)?;
    info!(path = %path.display(), states = outcome.states.len(), "cached run");
    Ok(outcome.states)
}

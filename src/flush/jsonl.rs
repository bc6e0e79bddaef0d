use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::SimError;
use crate::model::Snapshot;
use crate::stats::YearStats;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush one snapshot to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes 2 files:
/// - `members.jsonl`: one member per line
/// - `links.jsonl`: one link per line, endpoints by member id
pub fn flush_snapshot_to_jsonl(snapshot: &Snapshot, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;
    write_jsonl(&output_dir.join("members.jsonl"), snapshot.members())?;
    write_jsonl(&output_dir.join("links.jsonl"), snapshot.links())?;
    Ok(())
}

/// Flush a whole run: `year_NNNNNN/` per snapshot plus `stats.jsonl`.
pub fn flush_states(states: &[Snapshot], stats: &[YearStats], output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;
    for snapshot in states {
        let dir = output_dir.join(format!("year_{:06}", snapshot.year));
        flush_snapshot_to_jsonl(snapshot, &dir)?;
    }
    write_jsonl(&output_dir.join("stats.jsonl"), stats.iter())
}

/// Whole snapshots, one per line, for reloading later.
pub fn write_snapshots(path: &Path, states: &[Snapshot]) -> io::Result<()> {
    write_jsonl(path, states.iter())
}

pub fn read_snapshots(path: &Path) -> Result<Vec<Snapshot>, SimError> {
    let reader = BufReader::new(File::open(path)?);
    let mut states = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        states.push(serde_json::from_str(&line)?);
    }
    Ok(states)
}

mod cache;
mod jsonl;

pub use cache::{cache_path, run_cached};
pub use jsonl::{flush_snapshot_to_jsonl, flush_states, read_snapshots, write_snapshots};

use serde::{Deserialize, Serialize};

use super::graph::MemberGraph;
use super::link::Link;
use super::member::Member;

/// A deep copy of the whole graph at a year boundary.
///
/// Owns its data outright, so later mutation of the live graph never shows
/// through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Year index the snapshot was taken at. Start-of-year snapshots carry
    /// the year about to run; the final one carries `simulation_years`.
    pub year: u32,
    pub graph: MemberGraph,
}

impl Snapshot {
    pub fn capture(year: u32, graph: &MemberGraph) -> Self {
        Self {
            year,
            graph: graph.clone(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.graph.len()
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.graph.members()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.graph.links()
    }
}

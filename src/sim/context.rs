use rand::RngCore;

use crate::config::SimConfig;
use crate::model::MemberGraph;

/// Context passed to each yearly phase.
///
/// Bundled so phases share one signature regardless of what they read.
pub struct TickContext<'a> {
    pub graph: &'a mut MemberGraph,
    pub config: &'a SimConfig,
    pub rng: &'a mut dyn RngCore,
    /// Zero-based index of the year being simulated.
    pub year: u32,
}

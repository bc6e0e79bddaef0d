use rand::Rng;

use super::policy;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::model::MemberGraph;

/// Populate every hub city with a normally distributed headcount of
/// unlinked members of normally distributed age.
pub fn initialize_world<R: Rng + ?Sized>(
    config: &SimConfig,
    rng: &mut R,
) -> Result<MemberGraph, SimError> {
    let mut graph = MemberGraph::new();
    for city in &config.hub_cities {
        let headcount = policy::sample_headcount(
            config.hub_starting_members_avg,
            config.hub_starting_members_std,
            rng,
        )?;
        let ages = policy::sample_ages(
            headcount,
            config.mean_starting_age,
            config.starting_age_std,
            rng,
        )?;
        graph.add_members(city, &ages);
    }
    Ok(graph)
}

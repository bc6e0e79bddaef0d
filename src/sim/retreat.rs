use rand::Rng;
use tracing::debug;

use super::context::TickContext;
use super::gathering::{InteractionTally, mingle};
use super::policy;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::id::MemberId;
use crate::model::MemberGraph;

/// Attendance target for this year's retreats: the configured value, or one
/// fifth of the population as it stands when the retreat phase starts.
pub fn retreat_goers(graph: &MemberGraph, config: &SimConfig) -> usize {
    config.global_retreat_goers.unwrap_or(graph.len() / 5)
}

/// Hold one global retreat with a fixed attendance target.
///
/// Every ambassador attends. Remaining seats go to distinct non-ambassadors
/// drawn uniformly; if the ambassadors already fill the target, they attend
/// alone. Attendees draw `global_retreat_link_multiplier * attendance`
/// random pairs.
pub fn global_retreat<R: Rng + ?Sized>(
    graph: &mut MemberGraph,
    goers: usize,
    config: &SimConfig,
    rng: &mut R,
) -> Result<InteractionTally, SimError> {
    for city in graph.cities() {
        graph.ambassador_of(&city)?;
    }

    let ambassadors = graph.ambassadors();
    let others: Vec<MemberId> = graph
        .members()
        .filter(|m| !m.is_ambassador())
        .map(|m| m.id)
        .collect();

    let extra = policy::retreat_extra_goers(goers, ambassadors.len());
    let mut attendees = policy::choose_distinct(&others, extra, "global retreat", rng)?;
    attendees.extend(ambassadors);

    let draws = config.global_retreat_link_multiplier * attendees.len();
    let pairs = policy::random_pairs(&attendees, draws, rng);
    mingle(graph, &pairs)
}

/// Runs `yearly_global_retreats` retreats, all sized from the population at
/// phase entry.
pub struct RetreatSystem;

impl SimSystem for RetreatSystem {
    fn name(&self) -> &str {
        "global_retreats"
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        if ctx.config.yearly_global_retreats == 0 {
            return Ok(());
        }
        let goers = retreat_goers(ctx.graph, ctx.config);
        for round in 0..ctx.config.yearly_global_retreats {
            let tally = global_retreat(ctx.graph, goers, ctx.config, ctx.rng)?;
            if ctx.config.verbose > 1 {
                debug!(
                    year = ctx.year,
                    round,
                    goers,
                    created = tally.created,
                    incremented = tally.incremented,
                    "global retreat"
                );
            }
        }
        Ok(())
    }
}

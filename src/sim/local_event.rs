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

/// Hold one local event in every city.
///
/// Attendance is the city's ambassador plus `local_event_participants - 1`
/// distinct other members (everyone when the key is absent). Attendees then
/// draw `avg_new_link_per_participant * attendance` random pairs among
/// themselves, each pair being one interaction.
pub fn local_event<R: Rng + ?Sized>(
    graph: &mut MemberGraph,
    config: &SimConfig,
    rng: &mut R,
) -> Result<InteractionTally, SimError> {
    let mut tally = InteractionTally::default();
    for city in graph.cities() {
        let ambassador = graph.ambassador_of(&city)?;
        let others: Vec<MemberId> = graph
            .members()
            .filter(|m| m.city == city && !m.is_ambassador())
            .map(|m| m.id)
            .collect();

        let city_size = others.len() + 1;
        let seats = config.local_event_participants.unwrap_or(city_size);
        if seats > city_size {
            return Err(SimError::InsufficientPopulation {
                context: "local event participants",
                requested: seats,
                available: city_size,
            });
        }

        let mut participants = vec![ambassador];
        participants.extend(policy::choose_distinct(
            &others,
            seats.saturating_sub(1),
            "local event",
            rng,
        )?);

        let draws = config.local_event_avg_new_link_per_participant * participants.len();
        let pairs = policy::random_pairs(&participants, draws, rng);
        tally.absorb(mingle(graph, &pairs)?);
    }
    Ok(tally)
}

/// Runs `yearly_local_events` local events back to back.
pub struct LocalEventSystem;

impl SimSystem for LocalEventSystem {
    fn name(&self) -> &str {
        "local_events"
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        for round in 0..ctx.config.yearly_local_events {
            let tally = local_event(ctx.graph, ctx.config, ctx.rng)?;
            if ctx.config.verbose > 1 {
                debug!(
                    year = ctx.year,
                    round,
                    created = tally.created,
                    incremented = tally.incremented,
                    links = ctx.graph.link_count(),
                    "local event"
                );
            }
        }
        Ok(())
    }
}

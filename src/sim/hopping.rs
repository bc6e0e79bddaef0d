use rand::Rng;
use tracing::{debug, warn};

use super::context::TickContext;
use super::policy;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::model::MemberGraph;

/// Relocate a uniformly chosen share of members to uniformly chosen cities.
///
/// Destinations are the cities present before anyone moves, so a member may
/// land in the city it already lives in. `previous_city` is set for every
/// chosen member either way. An ambassador who actually changes city gives
/// up the title. Returns how many members ended up somewhere new.
pub fn city_hopping<R: Rng + ?Sized>(
    graph: &mut MemberGraph,
    config: &SimConfig,
    rng: &mut R,
) -> Result<usize, SimError> {
    if config.city_hopping_probability.is_none() && config.verbose > 0 {
        warn!("city_hopping_probability is not defined, nobody relocates");
    }

    let ids = graph.member_ids();
    let hops = policy::hop_count(ids.len(), config.hopping_probability());
    if hops == 0 {
        return Ok(0);
    }
    let movers = policy::choose_distinct(&ids, hops, "city hopping", rng)?;
    let cities: Vec<String> = graph.cities().into_iter().collect();

    let mut relocated = 0;
    for id in movers {
        let destination = cities[rng.random_range(0..cities.len())].clone();
        let member = graph.member_mut(id).ok_or(SimError::UnknownMember(id))?;
        let origin = std::mem::replace(&mut member.city, destination);
        if origin != member.city {
            relocated += 1;
            if member.is_ambassador() {
                member.demote();
            }
        }
        member.previous_city = Some(origin);
    }
    Ok(relocated)
}

pub struct CityHoppingSystem;

impl SimSystem for CityHoppingSystem {
    fn name(&self) -> &str {
        "city_hopping"
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        let relocated = city_hopping(ctx.graph, ctx.config, ctx.rng)?;
        if ctx.config.verbose > 1 {
            debug!(year = ctx.year, relocated, "city hopping");
        }
        Ok(())
    }
}

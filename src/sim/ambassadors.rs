use rand::Rng;
use tracing::debug;

use super::context::TickContext;
use super::policy;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::id::MemberId;
use crate::model::MemberGraph;

/// Elect ambassadors city by city.
///
/// A city with no links at all elects uniformly. Otherwise a sitting
/// ambassador keeps the post unless `promote_new_ambassador_yearly` is set;
/// when an election does run, the winner is drawn with weight
/// `degree ^ degree_count_power`. Incumbents who lose are demoted; one who
/// wins again keeps the title and is not marked as a former ambassador.
///
/// Returns the ids elected this call.
pub fn promote_ambassadors<R: Rng + ?Sized>(
    graph: &mut MemberGraph,
    config: &SimConfig,
    rng: &mut R,
) -> Result<Vec<MemberId>, SimError> {
    let mut elected = Vec::new();
    for city in graph.cities() {
        let members = graph.members_in_city(&city);
        let degrees: Vec<usize> = members.iter().map(|&id| graph.degree(id)).collect();
        let incumbents = graph.ambassadors_in(&city);

        let winner = if degrees.iter().all(|&d| d == 0) {
            match policy::uniform_pick(&members, rng) {
                Some(id) => id,
                None => continue,
            }
        } else {
            if !incumbents.is_empty() && !config.promote_new_ambassador_yearly {
                continue;
            }
            let weights = policy::election_weights(&degrees, config.degree_count_power);
            policy::weighted_pick(&members, &weights, rng)?
        };

        let ousted: Vec<MemberId> = incumbents.into_iter().filter(|&id| id != winner).collect();
        demote(graph, &ousted);

        let member = graph.member_mut(winner).ok_or(SimError::UnknownMember(winner))?;
        member.ambassador = Some(true);
        elected.push(winner);
    }
    Ok(elected)
}

fn demote(graph: &mut MemberGraph, ids: &[MemberId]) {
    for &id in ids {
        if let Some(m) = graph.member_mut(id) {
            m.demote();
        }
    }
}

pub struct AmbassadorSystem;

impl SimSystem for AmbassadorSystem {
    fn name(&self) -> &str {
        "ambassadors"
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        let elected = promote_ambassadors(ctx.graph, ctx.config, ctx.rng)?;
        if ctx.config.verbose > 1 {
            debug!(year = ctx.year, elected = elected.len(), "ambassador promotion");
        }
        Ok(())
    }
}

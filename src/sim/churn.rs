use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use super::context::TickContext;
use super::policy;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::id::MemberId;
use crate::model::MemberGraph;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChurnReport {
    /// Drawn by the low-degree mechanism.
    pub low_degree: usize,
    /// Older than `max_age`.
    pub aged_out: usize,
    /// Distinct members actually removed (the two sets can overlap).
    pub removed: usize,
}

/// Yearly attrition.
///
/// Low-degree churn removes `trunc(sum of leave probabilities)` distinct
/// members, drawn with probability proportional to each one's leave
/// probability. Age-out removes everyone older than `max_age`. Both sets are
/// chosen against the same pre-churn graph and removed together.
pub fn churn<R: Rng + ?Sized>(
    graph: &mut MemberGraph,
    config: &SimConfig,
    rng: &mut R,
) -> Result<ChurnReport, SimError> {
    let (ids, degrees): (Vec<MemberId>, Vec<usize>) = graph.degrees().into_iter().unzip();
    let chances = policy::leave_probabilities(
        &degrees,
        config.churn_no_degree_rate,
        config.base_churn,
        config.degree_count_power,
    );

    let leaving = if chances.iter().sum::<f64>() > 0.0 {
        policy::choose_weighted_distinct(&ids, &chances, policy::churn_count(&chances), rng)?
    } else {
        Vec::new()
    };

    let aged: Vec<MemberId> = graph
        .members()
        .filter(|m| m.age > config.max_age)
        .map(|m| m.id)
        .collect();

    let mut departures: BTreeSet<MemberId> = leaving.iter().copied().collect();
    departures.extend(aged.iter().copied());
    let departures: Vec<MemberId> = departures.into_iter().collect();
    let removed = graph.remove_members(&departures);

    Ok(ChurnReport {
        low_degree: leaving.len(),
        aged_out: aged.len(),
        removed,
    })
}

pub struct ChurnSystem;

impl SimSystem for ChurnSystem {
    fn name(&self) -> &str {
        "churn"
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        let report = churn(ctx.graph, ctx.config, ctx.rng)?;
        if ctx.config.verbose > 1 {
            debug!(
                year = ctx.year,
                low_degree = report.low_degree,
                aged_out = report.aged_out,
                members = ctx.graph.len(),
                "members after churn"
            );
        }
        Ok(())
    }
}

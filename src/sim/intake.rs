use rand::Rng;
use tracing::debug;

use super::context::TickContext;
use super::policy;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::model::MemberGraph;

/// Grow every city by `ceil(new_member_ratio * size)` unlinked members.
/// City sizes are read once before anyone joins. Returns how many joined.
pub fn admit_new_members<R: Rng + ?Sized>(
    graph: &mut MemberGraph,
    config: &SimConfig,
    rng: &mut R,
) -> Result<usize, SimError> {
    let mut admitted = 0;
    for (city, size) in graph.city_sizes() {
        let count = policy::intake_count(config.new_member_ratio, size);
        let ages =
            policy::sample_ages(count, config.mean_starting_age, config.starting_age_std, rng)?;
        admitted += graph.add_members(&city, &ages).len();
    }
    Ok(admitted)
}

pub struct IntakeSystem;

impl SimSystem for IntakeSystem {
    fn name(&self) -> &str {
        "intake"
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        let admitted = admit_new_members(ctx.graph, ctx.config, ctx.rng)?;
        if ctx.config.verbose > 1 {
            debug!(year = ctx.year, admitted, "new member intake");
        }
        Ok(())
    }
}

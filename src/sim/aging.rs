use super::context::TickContext;
use super::system::SimSystem;
use crate::error::SimError;

/// Everyone still a member at year end is one year older.
pub struct AgingSystem;

impl SimSystem for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        ctx.graph.age_all(1.0);
        Ok(())
    }
}

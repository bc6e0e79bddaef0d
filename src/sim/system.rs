use super::context::TickContext;
use crate::error::SimError;

/// One phase of the yearly pipeline.
///
/// Object-safe so the driver can hold the ordered pipeline as
/// `Vec<Box<dyn SimSystem>>`. A phase finishes every read and every removal
/// before returning; the next phase sees the settled graph.
pub trait SimSystem {
    fn name(&self) -> &str;
    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError>;
}

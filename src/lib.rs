pub mod config;
pub mod error;
pub mod flush;
pub mod id;
pub mod model;
pub mod sim;
pub mod stats;

#[cfg(test)]
mod testutil;

pub use config::SimConfig;
pub use error::SimError;
pub use id::{IdGenerator, MemberId};
pub use model::{Link, LinkChange, Member, MemberGraph, Snapshot};
pub use sim::{RunPhase, SimOutcome, Simulation, run, run_with_graph};
pub use stats::YearStats;

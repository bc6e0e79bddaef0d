mod aging;
mod ambassadors;
mod churn;
mod context;
mod gathering;
mod hopping;
mod init;
mod intake;
mod local_event;
pub mod policy;
mod retreat;
mod runner;
mod system;

pub use aging::AgingSystem;
pub use ambassadors::{AmbassadorSystem, promote_ambassadors};
pub use churn::{ChurnReport, ChurnSystem, churn};
pub use context::TickContext;
pub use gathering::{InteractionTally, mingle};
pub use hopping::{CityHoppingSystem, city_hopping};
pub use init::initialize_world;
pub use intake::{IntakeSystem, admit_new_members};
pub use local_event::{LocalEventSystem, local_event};
pub use retreat::{RetreatSystem, global_retreat, retreat_goers};
pub use runner::{
    RunPhase, SimOutcome, Simulation, default_pipeline, run, run_with_graph,
};
pub use system::SimSystem;

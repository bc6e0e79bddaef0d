use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use super::aging::AgingSystem;
use super::ambassadors::AmbassadorSystem;
use super::churn::ChurnSystem;
use super::context::TickContext;
use super::hopping::CityHoppingSystem;
use super::init::initialize_world;
use super::intake::IntakeSystem;
use super::local_event::LocalEventSystem;
use super::retreat::RetreatSystem;
use super::system::SimSystem;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::model::{MemberGraph, Snapshot};
use crate::stats::YearStats;

/// Where a [`Simulation`] is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No graph yet; the first step generates one from the config.
    Uninitialized,
    /// `year` is the next year to simulate.
    Running { year: u32 },
    /// Every year has run; weights and final cleanup are pending.
    PostProcessing,
    Done,
}

/// Everything a finished run hands to downstream consumers.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    pub graph: MemberGraph,
    /// Start-of-year snapshots plus one final snapshot, if `save_states`.
    pub states: Vec<Snapshot>,
    /// One entry per simulated year, taken at the start of that year.
    pub stats: Vec<YearStats>,
}

/// The yearly phases in the order they run.
pub fn default_pipeline() -> Vec<Box<dyn SimSystem>> {
    vec![
        Box::new(CityHoppingSystem),
        Box::new(AmbassadorSystem),
        Box::new(IntakeSystem),
        Box::new(LocalEventSystem),
        Box::new(RetreatSystem),
        Box::new(ChurnSystem),
        Box::new(AgingSystem),
    ]
}

/// One run: a graph, a fixed config, and the RNG seeded from it.
///
/// The graph is owned exclusively for the whole run. Snapshots are deep
/// copies, so the history can be read while the run continues.
pub struct Simulation {
    config: SimConfig,
    rng: SmallRng,
    graph: MemberGraph,
    systems: Vec<Box<dyn SimSystem>>,
    phase: RunPhase,
    states: Vec<Snapshot>,
    stats: Vec<YearStats>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = SmallRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            rng,
            graph: MemberGraph::new(),
            systems: default_pipeline(),
            phase: RunPhase::Uninitialized,
            states: Vec::new(),
            stats: Vec::new(),
        })
    }

    /// Start from a prepared graph instead of generating one.
    pub fn with_graph(config: SimConfig, graph: MemberGraph) -> Result<Self, SimError> {
        let mut sim = Self::new(config)?;
        sim.graph = graph;
        sim.phase = sim.first_year_phase();
        Ok(sim)
    }

    /// Replace the phase pipeline. Only meaningful before the first year runs.
    pub fn with_systems(mut self, systems: Vec<Box<dyn SimSystem>>) -> Self {
        self.systems = systems;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn graph(&self) -> &MemberGraph {
        &self.graph
    }

    /// The live graph, for changes made between years.
    pub fn graph_mut(&mut self) -> &mut MemberGraph {
        &mut self.graph
    }

    pub fn states(&self) -> &[Snapshot] {
        &self.states
    }

    pub fn stats(&self) -> &[YearStats] {
        &self.stats
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn first_year_phase(&self) -> RunPhase {
        if self.config.simulation_years == 0 {
            RunPhase::PostProcessing
        } else {
            RunPhase::Running { year: 0 }
        }
    }

    fn initialize(&mut self) -> Result<(), SimError> {
        if self.config.verbose > 0 {
            info!(seed = self.config.seed, "initializing network");
        }
        self.graph = initialize_world(&self.config, &mut self.rng)?;
        self.phase = self.first_year_phase();
        Ok(())
    }

    /// Advance by one year (initializing first if needed). Does nothing once
    /// every year has run. Returns the phase reached.
    pub fn step_year(&mut self) -> Result<RunPhase, SimError> {
        if self.phase == RunPhase::Uninitialized {
            self.initialize()?;
        }
        if let RunPhase::Running { year } = self.phase {
            self.run_year(year)?;
            let next = year + 1;
            self.phase = if next < self.config.simulation_years {
                RunPhase::Running { year: next }
            } else {
                RunPhase::PostProcessing
            };
        }
        Ok(self.phase)
    }

    fn run_year(&mut self, year: u32) -> Result<(), SimError> {
        self.graph.reset_yearly_interactions();

        let stats = YearStats::measure(year, &self.graph);
        if self.config.verbose > 0 {
            info!(
                year,
                members = stats.members,
                avg_age = stats.avg_age.unwrap_or(f64::NAN),
                "year start"
            );
        }
        if self.config.save_states {
            self.states.push(Snapshot::capture(year, &self.graph));
        }
        self.stats.push(stats);

        let mut ctx = TickContext {
            graph: &mut self.graph,
            config: &self.config,
            rng: &mut self.rng,
            year,
        };
        for system in self.systems.iter_mut() {
            system.tick(&mut ctx)?;
            if self.config.verbose > 1 {
                debug!(year, system = system.name(), members = ctx.graph.len(), "phase done");
            }
        }
        Ok(())
    }

    fn post_process(&mut self) {
        self.graph.finalize_weights();
        if self.config.delete_zero_connection_at_end {
            self.graph.remove_isolated();
        }
        if self.config.verbose > 0 {
            info!(
                members = self.graph.len(),
                avg_age = self.graph.average_age().unwrap_or(f64::NAN),
                "simulation finished"
            );
        }
        if self.config.save_states {
            self.states
                .push(Snapshot::capture(self.config.simulation_years, &self.graph));
        }
        self.phase = RunPhase::Done;
    }

    /// Run all remaining years and post-processing.
    pub fn finish(mut self) -> Result<SimOutcome, SimError> {
        while matches!(self.phase, RunPhase::Uninitialized | RunPhase::Running { .. }) {
            self.step_year()?;
        }
        if self.phase == RunPhase::PostProcessing {
            self.post_process();
        }
        Ok(SimOutcome {
            graph: self.graph,
            states: self.states,
            stats: self.stats,
        })
    }
}

/// Generate a graph from `config` and run it to completion.
///
/// Creates a deterministic RNG from `config.seed`, so the same seed always
/// produces the same run.
pub fn run(config: SimConfig) -> Result<SimOutcome, SimError> {
    Simulation::new(config)?.finish()
}

/// Run to completion starting from an existing graph.
pub fn run_with_graph(config: SimConfig, graph: MemberGraph) -> Result<SimOutcome, SimError> {
    Simulation::with_graph(config, graph)?.finish()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::testutil::{city_graph, quiet_config};

    struct RecordingSystem {
        sys_name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl SimSystem for RecordingSystem {
        fn name(&self) -> &str {
            self.sys_name
        }
        fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
            self.log
                .borrow_mut()
                .push(format!("{}:{}", ctx.year, self.sys_name));
            Ok(())
        }
    }

    struct FailingSystem;

    impl SimSystem for FailingSystem {
        fn name(&self) -> &str {
            "failing"
        }
        fn tick(&mut self, _ctx: &mut TickContext) -> Result<(), SimError> {
            Err(SimError::MissingAmbassador {
                city: "Nowhere".to_string(),
            })
        }
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<String> = default_pipeline()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "city_hopping",
                "ambassadors",
                "intake",
                "local_events",
                "global_retreats",
                "churn",
                "aging"
            ]
        );
    }

    #[test]
    fn systems_run_in_order_every_year() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let systems: Vec<Box<dyn SimSystem>> = ["first", "second"]
            .into_iter()
            .map(|name| {
                Box::new(RecordingSystem {
                    sys_name: name,
                    log: Rc::clone(&log),
                }) as Box<dyn SimSystem>
            })
            .collect();
        let config = SimConfig {
            simulation_years: 2,
            ..quiet_config()
        };
        Simulation::new(config).unwrap().with_systems(systems).finish().unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["0:first", "0:second", "1:first", "1:second"]
        );
    }

    #[test]
    fn phases_walk_the_state_machine() {
        let config = SimConfig {
            simulation_years: 2,
            ..quiet_config()
        };
        let mut sim = Simulation::new(config).unwrap();
        assert_eq!(sim.phase(), RunPhase::Uninitialized);
        assert_eq!(sim.step_year().unwrap(), RunPhase::Running { year: 1 });
        assert_eq!(sim.step_year().unwrap(), RunPhase::PostProcessing);
        assert_eq!(sim.step_year().unwrap(), RunPhase::PostProcessing);
        assert_eq!(sim.states().len(), 2);
        let outcome = sim.finish().unwrap();
        assert_eq!(outcome.states.len(), 3);
        assert_eq!(outcome.stats.len(), 2);
    }

    #[test]
    fn zero_years_still_post_processes() {
        let config = SimConfig {
            simulation_years: 0,
            ..quiet_config()
        };
        let outcome = run_with_graph(config, city_graph(&[("A", 3)])).unwrap();
        assert_eq!(outcome.states.len(), 1);
        assert_eq!(outcome.states[0].year, 0);
        assert!(outcome.stats.is_empty());
    }

    #[test]
    fn failure_aborts_the_run() {
        let config = SimConfig {
            simulation_years: 3,
            ..quiet_config()
        };
        let err = Simulation::new(config)
            .unwrap()
            .with_systems(vec![Box::new(FailingSystem)])
            .finish()
            .unwrap_err();
        assert!(matches!(err, SimError::MissingAmbassador { .. }));
    }

    #[test]
    fn no_states_when_saving_disabled() {
        let config = SimConfig {
            simulation_years: 3,
            save_states: false,
            ..quiet_config()
        };
        let outcome = run(config).unwrap();
        assert!(outcome.states.is_empty());
        assert_eq!(outcome.stats.len(), 3);
    }

    #[test]
    fn weights_and_isolated_cleanup_at_end() {
        let mut g = city_graph(&[("A", 3)]);
        let ids = g.member_ids();
        g.add_edge_or_increment(ids[0], ids[1]).unwrap();
        let config = SimConfig {
            simulation_years: 1,
            delete_zero_connection_at_end: true,
            ..quiet_config()
        };
        let outcome = run_with_graph(config, g).unwrap();
        assert_eq!(outcome.graph.len(), 2);
        assert!(outcome.graph.links().all(|l| l.weights == Some(l.interactions)));
        let last = outcome.states.last().unwrap();
        assert_eq!(last.member_count(), 2);
        assert!(outcome.states[0].links().all(|l| l.weights.is_none()));
    }

    #[test]
    fn same_seed_same_history() {
        let config = SimConfig {
            simulation_years: 4,
            seed: 11,
            new_member_ratio: 0.2,
            base_churn: 0.05,
            churn_no_degree_rate: 0.3,
            city_hopping_probability: Some(0.1),
            yearly_local_events: 2,
            local_event_participants: Some(4),
            yearly_global_retreats: 1,
            hub_starting_members_std: 3.0,
            ..SimConfig::default()
        };
        let a = run(config.clone()).unwrap();
        let b = run(config).unwrap();
        assert_eq!(a.states, b.states);
        assert_eq!(a.graph, b.graph);
    }
}

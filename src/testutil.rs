use std::io;
use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::id::MemberId;
use crate::model::MemberGraph;
use crate::sim::{SimSystem, TickContext};

// ---------------------------------------------------------------------------
// Tick execution helpers
// ---------------------------------------------------------------------------

/// Run a single phase once with a fresh seeded RNG.
pub fn tick_system(
    graph: &mut MemberGraph,
    system: &mut dyn SimSystem,
    config: &SimConfig,
    seed: u64,
) -> Result<(), SimError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ctx = TickContext {
        graph,
        config,
        rng: &mut rng,
        year: 0,
    };
    system.tick(&mut ctx)
}

pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

// ---------------------------------------------------------------------------
// Graph builders
// ---------------------------------------------------------------------------

/// Unlinked members, `n` per city, all aged 30.
pub fn city_graph(cities: &[(&str, usize)]) -> MemberGraph {
    let mut graph = MemberGraph::new();
    for &(city, n) in cities {
        graph.add_members(city, &vec![30.0; n]);
    }
    graph
}

/// Make `id` the sitting ambassador of its city.
pub fn crown(graph: &mut MemberGraph, id: MemberId) {
    if let Some(m) = graph.member_mut(id) {
        m.ambassador = Some(true);
    }
}

/// A config where nothing happens unless the test turns it on.
pub fn quiet_config() -> SimConfig {
    SimConfig {
        city_hopping_probability: Some(0.0),
        ..SimConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a thread-local subscriber and return everything it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

use crate::error::SimError;
use crate::id::MemberId;
use crate::model::{LinkChange, MemberGraph};

/// What a batch of interaction pairs did to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionTally {
    pub created: usize,
    pub incremented: usize,
    /// Pairs that drew the same member twice. Dropped, not redrawn.
    pub self_pairs: usize,
}

impl InteractionTally {
    pub fn absorb(&mut self, other: InteractionTally) {
        self.created += other.created;
        self.incremented += other.incremented;
        self.self_pairs += other.self_pairs;
    }

    pub fn interactions(&self) -> usize {
        self.created + self.incremented
    }
}

/// Apply each pair as one interaction, skipping self-pairs.
pub fn mingle(
    graph: &mut MemberGraph,
    pairs: &[(MemberId, MemberId)],
) -> Result<InteractionTally, SimError> {
    let mut tally = InteractionTally::default();
    for &(a, b) in pairs {
        if a == b {
            tally.self_pairs += 1;
            continue;
        }
        match graph.add_edge_or_increment(a, b)? {
            LinkChange::Created => tally.created += 1,
            LinkChange::Incremented => tally.incremented += 1,
        }
    }
    Ok(tally)
}

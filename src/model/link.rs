use serde::{Deserialize, Serialize};

use crate::id::MemberId;

/// An undirected interaction link between two members.
///
/// `source` is always the smaller id (see [`canonical_pair`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: MemberId,
    pub target: MemberId,
    /// Lifetime interaction count.
    pub interactions: u32,
    /// Interactions since the start of the current year.
    pub yearly_interactions: u32,
    /// Copy of `interactions`, set once after the last simulated year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<u32>,
}

impl Link {
    /// A link created by a first interaction.
    pub fn first_contact(a: MemberId, b: MemberId) -> Self {
        let (source, target) = canonical_pair(a, b);
        Self {
            source,
            target,
            interactions: 1,
            yearly_interactions: 1,
            weights: None,
        }
    }

    pub fn record_interaction(&mut self) {
        self.interactions += 1;
        self.yearly_interactions += 1;
    }

    pub fn endpoints(&self) -> (MemberId, MemberId) {
        (self.source, self.target)
    }

    pub fn touches(&self, id: MemberId) -> bool {
        self.source == id || self.target == id
    }
}

/// Order a pair so the smaller id comes first.
pub fn canonical_pair(a: MemberId, b: MemberId) -> (MemberId, MemberId) {
    if a <= b { (a, b) } else { (b, a) }
}

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::link::{Link, canonical_pair};
use super::member::Member;
use crate::error::SimError;
use crate::id::{IdGenerator, MemberId};

/// Outcome of [`MemberGraph::add_edge_or_increment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    Created,
    Incremented,
}

/// The membership graph: members keyed by stable id, links keyed by the
/// canonical endpoint pair so at most one link exists per pair.
///
/// BTreeMaps everywhere for deterministic iteration under a fixed seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord", into = "GraphRecord")]
pub struct MemberGraph {
    members: BTreeMap<MemberId, Member>,
    links: BTreeMap<(MemberId, MemberId), Link>,
    adjacency: BTreeMap<MemberId, BTreeSet<MemberId>>,
    id_gen: IdGenerator,
}

impl MemberGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.get_mut(&id)
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut Member> {
        self.members.values_mut()
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.keys().copied().collect()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn link(&self, a: MemberId, b: MemberId) -> Option<&Link> {
        self.links.get(&canonical_pair(a, b))
    }

    pub fn add_member(&mut self, city: impl Into<String>, age: f64) -> MemberId {
        let id = self.id_gen.next_id();
        self.members.insert(id, Member::new(id, city, age));
        self.adjacency.insert(id, BTreeSet::new());
        id
    }

    /// Add one member per entry in `ages`, all in `city`, none linked.
    pub fn add_members(&mut self, city: &str, ages: &[f64]) -> Vec<MemberId> {
        ages.iter().map(|&age| self.add_member(city, age)).collect()
    }

    /// Record one interaction between `a` and `b`, creating their link on
    /// first contact. `(a, b)` and `(b, a)` address the same link.
    pub fn add_edge_or_increment(
        &mut self,
        a: MemberId,
        b: MemberId,
    ) -> Result<LinkChange, SimError> {
        if a == b {
            return Err(SimError::SelfLink(a));
        }
        for id in [a, b] {
            if !self.members.contains_key(&id) {
                return Err(SimError::UnknownMember(id));
            }
        }

        let pair = canonical_pair(a, b);
        if let Some(link) = self.links.get_mut(&pair) {
            link.record_interaction();
            return Ok(LinkChange::Incremented);
        }

        self.links.insert(pair, Link::first_contact(a, b));
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        Ok(LinkChange::Created)
    }

    /// Remove members and every link touching them. Duplicate and unknown ids
    /// are skipped. Remaining ids are untouched. Returns how many were removed.
    pub fn remove_members(&mut self, ids: &[MemberId]) -> usize {
        let mut removed = 0;
        for &id in ids {
            if self.members.remove(&id).is_none() {
                continue;
            }
            removed += 1;
            let neighbours = self.adjacency.remove(&id).unwrap_or_default();
            for other in neighbours {
                self.links.remove(&canonical_pair(id, other));
                if let Some(adj) = self.adjacency.get_mut(&other) {
                    adj.remove(&id);
                }
            }
        }
        removed
    }

    pub fn degree(&self, id: MemberId) -> usize {
        self.adjacency.get(&id).map_or(0, BTreeSet::len)
    }

    pub fn neighbours(&self, id: MemberId) -> impl Iterator<Item = MemberId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// Every member with its degree, in id order.
    pub fn degrees(&self) -> Vec<(MemberId, usize)> {
        self.members.keys().map(|&id| (id, self.degree(id))).collect()
    }

    /// Distinct cities that currently have at least one member.
    pub fn cities(&self) -> BTreeSet<String> {
        self.members.values().map(|m| m.city.clone()).collect()
    }

    pub fn members_in_city(&self, city: &str) -> Vec<MemberId> {
        self.members
            .values()
            .filter(|m| m.city == city)
            .map(|m| m.id)
            .collect()
    }

    pub fn city_sizes(&self) -> BTreeMap<String, usize> {
        let mut sizes = BTreeMap::new();
        for m in self.members.values() {
            *sizes.entry(m.city.clone()).or_insert(0) += 1;
        }
        sizes
    }

    pub fn ambassadors(&self) -> Vec<MemberId> {
        self.members
            .values()
            .filter(|m| m.is_ambassador())
            .map(|m| m.id)
            .collect()
    }

    pub fn ambassadors_in(&self, city: &str) -> Vec<MemberId> {
        self.members
            .values()
            .filter(|m| m.city == city && m.is_ambassador())
            .map(|m| m.id)
            .collect()
    }

    /// The sitting ambassador of `city`.
    pub fn ambassador_of(&self, city: &str) -> Result<MemberId, SimError> {
        self.members
            .values()
            .find(|m| m.city == city && m.is_ambassador())
            .map(|m| m.id)
            .ok_or_else(|| SimError::MissingAmbassador {
                city: city.to_string(),
            })
    }

    pub fn reset_yearly_interactions(&mut self) {
        for link in self.links.values_mut() {
            link.yearly_interactions = 0;
        }
    }

    pub fn age_all(&mut self, years: f64) {
        for m in self.members.values_mut() {
            m.age += years;
        }
    }

    pub fn average_age(&self) -> Option<f64> {
        if self.members.is_empty() {
            return None;
        }
        let total: f64 = self.members.values().map(|m| m.age).sum();
        Some(total / self.members.len() as f64)
    }

    /// Copy lifetime interactions into `weights` on every link.
    pub fn finalize_weights(&mut self) {
        for link in self.links.values_mut() {
            link.weights = Some(link.interactions);
        }
    }

    pub fn isolated_members(&self) -> Vec<MemberId> {
        self.members
            .keys()
            .copied()
            .filter(|&id| self.degree(id) == 0)
            .collect()
    }

    /// Drop every member with no links. Returns how many were removed.
    pub fn remove_isolated(&mut self) -> usize {
        let isolated = self.isolated_members();
        self.remove_members(&isolated)
    }

    /// Hop distances between every pair of linked members that can reach
    /// each other. Isolated members are left out entirely.
    pub fn all_pairs_shortest_paths(&self) -> BTreeMap<MemberId, BTreeMap<MemberId, u32>> {
        self.adjacency
            .iter()
            .filter(|(_, adj)| !adj.is_empty())
            .map(|(&id, _)| (id, self.bfs_distances(id)))
            .collect()
    }

    fn bfs_distances(&self, start: MemberId) -> BTreeMap<MemberId, u32> {
        let mut dist = BTreeMap::new();
        dist.insert(start, 0);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for next in self.neighbours(current) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Mean hop distance over ordered pairs of distinct, mutually reachable
    /// linked members. `None` when no such pair exists.
    pub fn mean_shortest_path(&self) -> Option<f64> {
        let mut total = 0u64;
        let mut pairs = 0u64;
        for row in self.all_pairs_shortest_paths().values() {
            for &d in row.values().filter(|&&d| d > 0) {
                total += u64::from(d);
                pairs += 1;
            }
        }
        (pairs > 0).then(|| total as f64 / pairs as f64)
    }
}

/// Flat serialized form of [`MemberGraph`]. Links are listed rather than keyed
/// by pair so the output is plain JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphRecord {
    members: Vec<Member>,
    links: Vec<Link>,
    next_id: u64,
}

impl From<MemberGraph> for GraphRecord {
    fn from(graph: MemberGraph) -> Self {
        Self {
            next_id: graph.id_gen.peek(),
            members: graph.members.into_values().collect(),
            links: graph.links.into_values().collect(),
        }
    }
}

impl TryFrom<GraphRecord> for MemberGraph {
    type Error = String;

    fn try_from(record: GraphRecord) -> Result<Self, Self::Error> {
        let mut graph = MemberGraph {
            id_gen: IdGenerator::starting_from(record.next_id),
            ..MemberGraph::default()
        };
        for member in record.members {
            if member.id.0 >= record.next_id {
                return Err(format!("member {} is not below next_id {}", member.id, record.next_id));
            }
            graph.adjacency.insert(member.id, BTreeSet::new());
            if graph.members.insert(member.id, member).is_some() {
                return Err("duplicate member id".to_string());
            }
        }
        for link in record.links {
            let (a, b) = link.endpoints();
            if a == b || !graph.contains(a) || !graph.contains(b) {
                return Err(format!("link {a}-{b} does not join two known members"));
            }
            let pair = canonical_pair(a, b);
            if graph.links.contains_key(&pair) {
                return Err(format!("duplicate link {a}-{b}"));
            }
            graph.adjacency.entry(a).or_default().insert(b);
            graph.adjacency.entry(b).or_default().insert(a);
            graph.links.insert(pair, Link { source: pair.0, target: pair.1, ..link });
        }
        Ok(graph)
    }
}

//! Summaries over the graph and over a run's snapshot history.
//!
//! These are the numbers downstream plotting reads; nothing here mutates.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{MemberGraph, Snapshot};

/// Scalar summary of one year, taken at the start of that year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearStats {
    pub year: u32,
    pub members: usize,
    pub avg_age: Option<f64>,
    pub links: usize,
    pub ambassadors: usize,
    pub cities: usize,
}

impl YearStats {
    pub fn measure(year: u32, graph: &MemberGraph) -> Self {
        Self {
            year,
            members: graph.len(),
            avg_age: graph.average_age(),
            links: graph.link_count(),
            ambassadors: graph.ambassadors().len(),
            cities: graph.cities().len(),
        }
    }
}

pub fn members_over_time(states: &[Snapshot]) -> Vec<usize> {
    states.iter().map(Snapshot::member_count).collect()
}

pub fn avg_age_over_time(states: &[Snapshot]) -> Vec<Option<f64>> {
    states.iter().map(|s| s.graph.average_age()).collect()
}

/// Headcount per city per snapshot. Every city seen in any snapshot gets a
/// full-length series, with zeros where it was empty.
pub fn members_per_city_over_time(states: &[Snapshot]) -> BTreeMap<String, Vec<usize>> {
    let cities: BTreeSet<String> = states.iter().flat_map(|s| s.graph.cities()).collect();
    let mut series: BTreeMap<String, Vec<usize>> = cities
        .into_iter()
        .map(|c| (c, Vec::with_capacity(states.len())))
        .collect();
    for state in states {
        let sizes = state.graph.city_sizes();
        for (city, counts) in series.iter_mut() {
            counts.push(sizes.get(city).copied().unwrap_or(0));
        }
    }
    series
}

/// Ages sorted ascending.
pub fn age_distribution(graph: &MemberGraph) -> Vec<f64> {
    let mut ages: Vec<f64> = graph.members().map(|m| m.age).collect();
    ages.sort_by(f64::total_cmp);
    ages
}

/// Degrees of members who hold or held the ambassador post, and of everyone else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DegreeSplit {
    pub served: Vec<usize>,
    pub others: Vec<usize>,
}

pub fn degree_split(graph: &MemberGraph) -> DegreeSplit {
    let mut split = DegreeSplit::default();
    for m in graph.members() {
        let degree = graph.degree(m.id);
        if m.has_served() {
            split.served.push(degree);
        } else {
            split.others.push(degree);
        }
    }
    split
}

/// Count of ordered member pairs at each hop distance (isolated members and
/// unreachable pairs excluded).
pub fn shortest_path_histogram(graph: &MemberGraph) -> BTreeMap<u32, usize> {
    let mut histogram = BTreeMap::new();
    for row in graph.all_pairs_shortest_paths().values() {
        for &d in row.values().filter(|&&d| d > 0) {
            *histogram.entry(d).or_insert(0) += 1;
        }
    }
    histogram
}

#![allow(dead_code)]

use ambassador_sim::SimConfig;

/// Two cities of ten, nothing turned on.
pub fn two_city_config() -> SimConfig {
    SimConfig {
        hub_cities: vec!["A".to_string(), "B".to_string()],
        hub_starting_members_avg: 10.0,
        hub_starting_members_std: 0.0,
        simulation_years: 1,
        new_member_ratio: 0.0,
        base_churn: 0.0,
        churn_no_degree_rate: 0.0,
        city_hopping_probability: Some(0.0),
        yearly_local_events: 0,
        yearly_global_retreats: 0,
        ..SimConfig::default()
    }
}

/// A config where every phase does something.
pub fn busy_config(seed: u64, years: u32) -> SimConfig {
    SimConfig {
        seed,
        simulation_years: years,
        hub_cities: ["Oslo", "Lyon", "Turku", "Porto"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        hub_starting_members_avg: 25.0,
        hub_starting_members_std: 3.0,
        mean_starting_age: 50.0,
        starting_age_std: 15.0,
        new_member_ratio: 0.15,
        churn_no_degree_rate: 0.3,
        base_churn: 0.02,
        max_age: 80.0,
        city_hopping_probability: Some(0.05),
        yearly_local_events: 2,
        local_event_participants: Some(3),
        local_event_avg_new_link_per_participant: 3,
        yearly_global_retreats: 1,
        global_retreat_link_multiplier: 4,
        promote_new_ambassador_yearly: true,
        ..SimConfig::default()
    }
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SimError;

/// Configuration for a simulation run.
///
/// Deserialized from a flat JSON object. Every key is optional and falls back
/// to the default below; unrecognized keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed and same config produce the same run.
    pub seed: u64,
    /// Names of the cities populated at initialization.
    pub hub_cities: Vec<String>,
    /// Mean starting headcount per hub city.
    pub hub_starting_members_avg: f64,
    /// Standard deviation of the starting headcount.
    pub hub_starting_members_std: f64,
    pub mean_starting_age: f64,
    pub starting_age_std: f64,
    pub simulation_years: u32,
    /// Record a snapshot at the start of each year and one at the end.
    #[serde(deserialize_with = "truthy")]
    pub save_states: bool,
    /// New members per year as a fraction of each city's size (rounded up).
    pub new_member_ratio: f64,
    /// Leave-probability numerator for members with few links.
    pub churn_no_degree_rate: f64,
    /// Flat leave-probability added for every member.
    pub base_churn: f64,
    /// Exponent applied to degrees in churn and ambassador election.
    pub degree_count_power: f64,
    /// Members older than this leave at churn.
    pub max_age: f64,
    /// Fraction of members that relocate each year. Absent means nobody moves.
    #[serde(alias = "city_hopping_propability")]
    pub city_hopping_probability: Option<f64>,
    /// Attendees per global retreat, ambassadors included.
    /// Absent means one fifth of the population at the start of the retreat phase.
    pub global_retreat_goers: Option<usize>,
    pub global_retreat_link_multiplier: usize,
    pub yearly_global_retreats: u32,
    /// Attendees per local event, ambassador included. Absent means the whole city.
    pub local_event_participants: Option<usize>,
    pub local_event_avg_new_link_per_participant: usize,
    pub yearly_local_events: u32,
    /// Re-run the election every year even when a city already has an ambassador.
    #[serde(deserialize_with = "truthy")]
    pub promote_new_ambassador_yearly: bool,
    /// Drop members without any link after the last year.
    #[serde(deserialize_with = "truthy")]
    pub delete_zero_connection_at_end: bool,
    /// 0 = quiet, 1 = yearly summaries, 2 = per-phase detail. `true` reads as 1.
    #[serde(deserialize_with = "verbosity")]
    pub verbose: u8,
}

/// A flag written as a JSON bool or as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Nonzero numbers are true.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match FlagValue::deserialize(deserializer)? {
        FlagValue::Bool(b) => b,
        FlagValue::Int(n) => n != 0,
        FlagValue::Float(x) => x != 0.0,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelValue {
    Bool(bool),
    Int(u64),
}

fn verbosity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    match LevelValue::deserialize(deserializer)? {
        LevelValue::Bool(b) => Ok(u8::from(b)),
        LevelValue::Int(n) => u8::try_from(n).map_err(|_| {
            serde::de::Error::custom(format!("verbose level {n} is out of range"))
        }),
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            hub_cities: (0..5).map(|i| i.to_string()).collect(),
            hub_starting_members_avg: 20.0,
            hub_starting_members_std: 0.0,
            mean_starting_age: 24.0,
            starting_age_std: 2.0,
            simulation_years: 1,
            save_states: true,
            new_member_ratio: 0.0,
            churn_no_degree_rate: 0.0,
            base_churn: 0.0,
            degree_count_power: 1.0,
            max_age: 100.0,
            city_hopping_probability: None,
            global_retreat_goers: None,
            global_retreat_link_multiplier: 10,
            yearly_global_retreats: 0,
            local_event_participants: None,
            local_event_avg_new_link_per_participant: 10,
            yearly_local_events: 0,
            promote_new_ambassador_yearly: false,
            delete_zero_connection_at_end: false,
            verbose: 0,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.hub_cities.is_empty() {
            return Err(SimError::InvalidConfig("hub_cities is empty".to_string()));
        }
        let finite = [
            ("hub_starting_members_avg", self.hub_starting_members_avg),
            ("hub_starting_members_std", self.hub_starting_members_std),
            ("mean_starting_age", self.mean_starting_age),
            ("starting_age_std", self.starting_age_std),
            ("new_member_ratio", self.new_member_ratio),
            ("churn_no_degree_rate", self.churn_no_degree_rate),
            ("base_churn", self.base_churn),
            ("degree_count_power", self.degree_count_power),
            ("max_age", self.max_age),
            ("city_hopping_probability", self.city_hopping_probability.unwrap_or(0.0)),
        ];
        for (key, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!("{key} must be finite, got {value}")));
            }
        }
        for (key, value) in [
            ("hub_starting_members_std", self.hub_starting_members_std),
            ("starting_age_std", self.starting_age_std),
        ] {
            if value < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{key} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Hopping probability with the "absent means zero" rule applied.
    pub fn hopping_probability(&self) -> f64 {
        self.city_hopping_probability.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = SimConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.hub_cities, vec!["0", "1", "2", "3", "4"]);
        assert!(config.save_states);
        assert_eq!(config.city_hopping_probability, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config =
            SimConfig::from_json_str(r#"{"simulation_years": 7, "plot_colors": ["red"]}"#).unwrap();
        assert_eq!(config.simulation_years, 7);
    }

    #[test]
    fn misspelled_hopping_key_is_accepted() {
        let config = SimConfig::from_json_str(r#"{"city_hopping_propability": 0.25}"#).unwrap();
        assert_eq!(config.city_hopping_probability, Some(0.25));
        assert!((config.hopping_probability() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn absent_hopping_probability_is_zero() {
        assert_eq!(SimConfig::default().hopping_probability(), 0.0);
    }

    #[test]
    fn rejects_empty_city_list() {
        let err = SimConfig::from_json_str(r#"{"hub_cities": []}"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_negative_std() {
        let err = SimConfig::from_json_str(r#"{"starting_age_std": -1.0}"#).unwrap_err();
        assert!(err.to_string().contains("starting_age_std"));
    }

    #[test]
    fn numeric_flags_read_as_truthy() {
        let config = SimConfig::from_json_str(
            r#"{
                "promote_new_ambassador_yearly": 1,
                "save_states": 0,
                "delete_zero_connection_at_end": 2.0
            }"#,
        )
        .unwrap();
        assert!(config.promote_new_ambassador_yearly);
        assert!(!config.save_states);
        assert!(config.delete_zero_connection_at_end);

        let config =
            SimConfig::from_json_str(r#"{"promote_new_ambassador_yearly": false}"#).unwrap();
        assert!(!config.promote_new_ambassador_yearly);
    }

    #[test]
    fn boolean_verbose_is_level_one() {
        assert_eq!(SimConfig::from_json_str(r#"{"verbose": true}"#).unwrap().verbose, 1);
        assert_eq!(SimConfig::from_json_str(r#"{"verbose": false}"#).unwrap().verbose, 0);
        assert_eq!(SimConfig::from_json_str(r#"{"verbose": 2}"#).unwrap().verbose, 2);
    }

    #[test]
    fn out_of_range_verbose_is_rejected() {
        let err = SimConfig::from_json_str(r#"{"verbose": 300}"#).unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn flags_survive_a_serialize_round_trip() {
        let config = SimConfig {
            promote_new_ambassador_yearly: true,
            verbose: 2,
            ..SimConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = SimConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }
}

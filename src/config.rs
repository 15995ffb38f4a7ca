//! Match configuration, loadable from JSON.

use std::{
    fs,
    io,
    path::Path
};
use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;
use crate::game::{
    PillConfig,
    PillShape,
    PillType,
    PoolScalingConfig,
    ProgressionConfig,
    QuestConfig,
    VitalsConfig
};

/// Everything needed to generate pools and quests, for every round.
///
/// Missing sections in a JSON file fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// When each pill type shows up, and how likely it is.
    pub pill_types: ProgressionConfig<PillType>,
    /// When each pill shape shows up, and how likely it is.
    pub shapes: ProgressionConfig<PillShape>,
    /// How many pills each round has.
    pub pool: PoolScalingConfig,
    /// How long quests are.
    pub quest: QuestConfig,
    /// How hard damaging pills hit, and how much healing pills restore.
    pub pills: PillConfig,
    /// Lives and resistance players start with.
    pub vitals: VitalsConfig
}

/// An invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A progression config has a `max_round` of 0.
    #[error("max round must be at least 1")]
    MaxRound,
    /// A category has no rule.
    #[error("no rule for {category}")]
    MissingRule {
        /// The category without a rule.
        category: String
    },
    /// A category unlocks in round 0.
    #[error("unlock round of {category} must be at least 1")]
    UnlockRound {
        /// The offending category.
        category: String
    },
    /// A weight is negative or not a number.
    #[error("{field} of {category} must be a non-negative number, got {value}")]
    Percentage {
        /// The offending category.
        category: String,
        /// Which of the two weights is invalid.
        field: &'static str,
        /// The invalid weight.
        value: f64
    },
    /// Pools would start out empty.
    #[error("pool base count must be at least 1")]
    BaseCount,
    /// Pools would grow every 0 rounds.
    #[error("pool growth frequency must be at least 1")]
    Frequency,
    /// The pool cap is below the round 1 size.
    #[error("pool cap {cap} is below the base count {base}")]
    CapBelowBase {
        /// The configured cap.
        cap: u32,
        /// The configured base count.
        base: u32
    },
    /// Quest lengths are zero or out of order.
    #[error("quest lengths must satisfy 1 <= min <= max, got min {min}, max {max}")]
    QuestLength {
        /// The configured minimum length.
        min: usize,
        /// The configured maximum length.
        max: usize
    },
    /// A damage range has its bounds reversed.
    #[error("damage range of {kind} is reversed: min {min}, max {max}")]
    DamageRange {
        /// The pill type the range belongs to.
        kind: String,
        /// The configured minimum.
        min: u32,
        /// The configured maximum.
        max: u32
    },
    /// Players would start without lives or resistance.
    #[error("players need at least 1 life and 1 resistance, got {lives} lives and {resistance} resistance")]
    Vitals {
        /// The configured lives.
        lives: u32,
        /// The configured resistance.
        resistance: u32
    },
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid JSON, or does not have the expected shape.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error)
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config = serde_json::from_str::<Config>(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Config::from_json(&fs::read_to_string(path)?)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pill_types.validate()?;
        self.shapes.validate()?;
        self.pool.validate()?;
        self.quest.validate()?;
        self.pills.validate()?;
        self.vitals.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::game::CategoryRule;
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_json_is_the_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_json_overrides_sections() {
        let config = Config::from_json(r#"{
            "pool": { "base_count": 4, "increase_by": 2, "frequency": 2 },
            "quest": { "min_length": 1, "max_length": 4, "increase_after_round": 3 }
        }"#).unwrap();
        assert_eq!(config.pool, PoolScalingConfig { base_count: 4, increase_by: 2, frequency: 2, max_cap: None });
        assert_eq!(config.quest.max_length, 4);
        assert_eq!(config.pill_types, ProgressionConfig::default());
    }

    #[test]
    fn rules_are_keyed_by_category_name() {
        let mut config = Config::default();
        config.pill_types.rules.insert(PillType::Life, CategoryRule::new(10, 1.0, 2.0));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"LIFE\""));
        assert!(json.contains("\"pineapple\""));
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn invalid_sections_are_rejected() {
        let err = Config::from_json(r#"{ "pool": { "base_count": 8, "increase_by": 1, "frequency": 3, "max_cap": 5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::CapBelowBase { cap: 5, base: 8 }));
        let err = Config::from_json(r#"{ "quest": { "min_length": 0, "max_length": 0, "increase_after_round": 1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::QuestLength { min: 0, max: 0 }));
        let err = Config::from_json(r#"{ "shapes": { "max_round": 0, "rules": {} } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::MaxRound));
        let err = Config::from_json(r#"{ "pill_types": { "max_round": 3, "rules": { "SAFE": { "unlock_round": 1, "start_pct": 1.0, "end_pct": 1.0 } } } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRule { .. }));
    }

    #[test]
    fn pill_effects_are_configurable() {
        let config = Config::from_json(r#"{
            "pills": { "dmg_low": { "min": 2, "max": 3 }, "dmg_high": { "min": 5, "max": 8 }, "heal_amount": 4 },
            "vitals": { "lives": 2, "resistance": 10 }
        }"#).unwrap();
        assert_eq!(config.pills.dmg_high, crate::game::DamageRange::new(5, 8));
        assert_eq!(config.pills.heal_amount, 4);
        assert_eq!(config.vitals, VitalsConfig { lives: 2, resistance: 10 });
        let err = Config::from_json(r#"{ "pills": { "dmg_low": { "min": 3, "max": 1 }, "dmg_high": { "min": 3, "max": 4 }, "heal_amount": 2 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::DamageRange { min: 3, max: 1, .. }));
        let err = Config::from_json(r#"{ "vitals": { "lives": 3, "resistance": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Vitals { lives: 3, resistance: 0 }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Config::from_json("{ not json"), Err(ConfigError::Json(_))));
        assert!(matches!(Config::from_json(r#"{ "shapes": { "max_round": 3, "rules": { "hexagon": {} } } }"#), Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(Config::load("/nonexistent/pill-roulette.json"), Err(ConfigError::Io(_))));
    }
}

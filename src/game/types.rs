//! Data types used by the progression engine.

use std::{
    collections::BTreeMap,
    fmt,
    hash::Hash,
    str::FromStr
};
use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;
use crate::config::ConfigError;

/// A closed set of pill categories, such as pill types or pill shapes.
///
/// Tables and distributions always list categories in `ALL` order, which is also the tie-break order wherever two categories compare equal.
pub trait Category: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + 'static {
    /// Every category, in declaration order.
    const ALL: &'static [Self];

    /// The category forced into a pool when no category of this kind is unlocked.
    const FALLBACK: Self;
}

/// The error returned when parsing a category name fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseCategoryError {
    /// The kind of category that was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String
}

/// What a pill does when swallowed. Hidden until the pill is consumed or revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PillType {
    /// No effect.
    Safe,
    /// Minor damage.
    DmgLow,
    /// Heavy damage.
    DmgHigh,
    /// Kills outright.
    Fatal,
    /// Restores resistance.
    Heal,
    /// Restores a life.
    Life
}

impl PillType {
    /// The canonical name of this pill type, as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match *self {
            PillType::Safe => "SAFE",
            PillType::DmgLow => "DMG_LOW",
            PillType::DmgHigh => "DMG_HIGH",
            PillType::Fatal => "FATAL",
            PillType::Heal => "HEAL",
            PillType::Life => "LIFE"
        }
    }
}

impl Category for PillType {
    const ALL: &'static [PillType] = &[
        PillType::Safe,
        PillType::DmgLow,
        PillType::DmgHigh,
        PillType::Fatal,
        PillType::Heal,
        PillType::Life
    ];

    const FALLBACK: PillType = PillType::Safe;
}

impl FromStr for PillType {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<PillType, ParseCategoryError> {
        let upper = s.trim().to_uppercase();
        PillType::ALL.iter()
            .copied()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| ParseCategoryError { kind: "pill type", value: s.to_owned() })
    }
}

impl fmt::Display for PillType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The visible shape of a pill. Players can see shapes before consuming, which is what shape quests are built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum PillShape {
    Capsule,
    Round,
    Triangle,
    Oval,
    Cross,
    Heart,
    Flower,
    Star,
    Pumpkin,
    Coin,
    Bear,
    Gem,
    Skull,
    Domino,
    Pineapple,
    Fruit
}

impl PillShape {
    /// The canonical lowercase name of this shape.
    pub fn as_str(&self) -> &'static str {
        match *self {
            PillShape::Capsule => "capsule",
            PillShape::Round => "round",
            PillShape::Triangle => "triangle",
            PillShape::Oval => "oval",
            PillShape::Cross => "cross",
            PillShape::Heart => "heart",
            PillShape::Flower => "flower",
            PillShape::Star => "star",
            PillShape::Pumpkin => "pumpkin",
            PillShape::Coin => "coin",
            PillShape::Bear => "bear",
            PillShape::Gem => "gem",
            PillShape::Skull => "skull",
            PillShape::Domino => "domino",
            PillShape::Pineapple => "pineapple",
            PillShape::Fruit => "fruit"
        }
    }
}

impl Category for PillShape {
    const ALL: &'static [PillShape] = &[
        PillShape::Capsule,
        PillShape::Round,
        PillShape::Triangle,
        PillShape::Oval,
        PillShape::Cross,
        PillShape::Heart,
        PillShape::Flower,
        PillShape::Star,
        PillShape::Pumpkin,
        PillShape::Coin,
        PillShape::Bear,
        PillShape::Gem,
        PillShape::Skull,
        PillShape::Domino,
        PillShape::Pineapple,
        PillShape::Fruit
    ];

    const FALLBACK: PillShape = PillShape::Round;
}

impl FromStr for PillShape {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<PillShape, ParseCategoryError> {
        let lower = s.trim().to_lowercase();
        PillShape::ALL.iter()
            .copied()
            .find(|shape| shape.as_str() == lower)
            .ok_or_else(|| ParseCategoryError { kind: "pill shape", value: s.to_owned() })
    }
}

impl fmt::Display for PillShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The probability schedule of a single category.
///
/// The category is absent before `unlock_round`. From then on its raw weight moves linearly from `start_pct` (at the unlock round) to `end_pct` (at the config's `max_round`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Earliest round in which the category may appear.
    pub unlock_round: u32,
    /// Raw weight at the unlock round.
    pub start_pct: f64,
    /// Raw weight at the maximum round.
    pub end_pct: f64
}

impl CategoryRule {
    /// Creates a rule from its unlock round and start/end weights.
    pub fn new(unlock_round: u32, start_pct: f64, end_pct: f64) -> CategoryRule {
        CategoryRule { unlock_round, start_pct, end_pct }
    }
}

/// Per-category probability schedules, plus the round at which interpolation stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig<C: Category> {
    /// Rounds beyond this one behave exactly like it.
    pub max_round: u32,
    /// One rule per category. A category without a rule never appears.
    pub rules: BTreeMap<C, CategoryRule>
}

impl<C: Category> ProgressionConfig<C> {
    /// Creates a progression config from a maximum round and a list of rules.
    pub fn new<I: IntoIterator<Item = (C, CategoryRule)>>(max_round: u32, rules: I) -> ProgressionConfig<C> {
        ProgressionConfig {
            max_round,
            rules: rules.into_iter().collect()
        }
    }

    /// Returns the rule for the given category, if there is one.
    pub fn rule(&self, category: C) -> Option<&CategoryRule> {
        self.rules.get(&category)
    }

    /// Checks that every category has a well-formed rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_round < 1 {
            return Err(ConfigError::MaxRound);
        }
        for &category in C::ALL {
            let rule = self.rule(category).ok_or_else(|| ConfigError::MissingRule { category: category.to_string() })?;
            if rule.unlock_round < 1 {
                return Err(ConfigError::UnlockRound { category: category.to_string() });
            }
            for (field, value) in [("start_pct", rule.start_pct), ("end_pct", rule.end_pct)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::Percentage { category: category.to_string(), field, value });
                }
            }
        }
        Ok(())
    }
}

/// Normalized per-category chances for one round, in percent.
///
/// Every category is present. Values are non-negative and sum to roughly 100, or are all zero if nothing is unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbabilityTable<C: Category>(BTreeMap<C, f64>);

impl<C: Category> ProbabilityTable<C> {
    /// Builds a table from explicit chances. Missing categories get 0; negative or non-finite chances are treated as 0.
    pub fn from_chances<I: IntoIterator<Item = (C, f64)>>(chances: I) -> ProbabilityTable<C> {
        let mut table = ProbabilityTable::zeroed();
        for (category, chance) in chances {
            let chance = if chance.is_finite() && chance > 0.0 { chance } else { 0.0 };
            table.0.insert(category, chance);
        }
        table
    }

    /// A table with every chance at 0.
    pub fn zeroed() -> ProbabilityTable<C> {
        ProbabilityTable(C::ALL.iter().map(|&category| (category, 0.0)).collect())
    }

    /// The chance of the given category, in percent.
    pub fn get(&self, category: C) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    /// Iterates over all categories and their chances in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (C, f64)> + '_ {
        self.0.iter().map(|(&category, &chance)| (category, chance))
    }

    /// The sum of all chances.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// `true` if no category has a positive chance.
    pub fn is_degenerate(&self) -> bool {
        !self.0.values().any(|&chance| chance > 0.0)
    }

    /// Replaces a degenerate table with one where `fallback` has a chance of 100. Non-degenerate tables are returned unchanged.
    pub fn or_fallback(self, fallback: C) -> ProbabilityTable<C> {
        if self.is_degenerate() {
            ProbabilityTable::from_chances([(fallback, 100.0)])
        } else {
            self
        }
    }
}

/// Exact per-category counts, for example the composition of a pill pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution<C: Category>(BTreeMap<C, u32>);

impl<C: Category> Distribution<C> {
    /// A distribution with every count at 0.
    pub fn zeroed() -> Distribution<C> {
        Distribution(C::ALL.iter().map(|&category| (category, 0)).collect())
    }

    /// Builds a distribution from explicit counts. Missing categories get 0.
    pub fn from_counts<I: IntoIterator<Item = (C, u32)>>(counts: I) -> Distribution<C> {
        let mut distribution = Distribution::zeroed();
        for (category, count) in counts {
            distribution.0.insert(category, count);
        }
        distribution
    }

    /// Counts how often each category occurs in `items`.
    pub fn tally<I: IntoIterator<Item = C>>(items: I) -> Distribution<C> {
        let mut distribution = Distribution::zeroed();
        for category in items {
            *distribution.0.entry(category).or_insert(0) += 1;
        }
        distribution
    }

    /// The count of the given category.
    pub fn get(&self, category: C) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Iterates over all categories and their counts in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (C, u32)> + '_ {
        self.0.iter().map(|(&category, &count)| (category, count))
    }

    /// The categories with a positive count, in declaration order.
    pub fn available(&self) -> impl Iterator<Item = C> + '_ {
        self.iter().filter(|&(_, count)| count > 0).map(|(category, _)| category)
    }

    /// The sum of all counts.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub(crate) fn slot_mut(&mut self, category: C) -> &mut u32 {
        self.0.entry(category).or_insert(0)
    }

    /// Lowers the count of `category` by one, stopping at zero.
    pub(crate) fn decrement(&mut self, category: C) {
        let slot = self.slot_mut(category);
        *slot = slot.saturating_sub(1);
    }
}

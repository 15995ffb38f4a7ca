//! Per-round probability tables.

use std::collections::BTreeMap;
use log::debug;
use rand::Rng;
use crate::{
    game::{
        Category,
        CategoryRule,
        PillShape,
        PillType,
        ProbabilityTable,
        ProgressionConfig
    },
    util::round_to_cents
};

/// The round at which the default schedules reach their final weights.
pub const DEFAULT_MAX_ROUND: u32 = 15;

/// Linear interpolation between `start` and `end`. `t` is not clamped.
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Computes the normalized chance of every category in the given round.
///
/// The round is clamped to `1..=max_round`. A category is at 0 until its unlock round, after which its weight is interpolated between its start and end weights. Weights are then scaled so they sum to 100 and rounded to two decimals.
///
/// If no category has a positive weight, the all-zero table is returned. Callers that need a non-empty result should use `ProbabilityTable::or_fallback`.
pub fn chances<C: Category>(round: i32, config: &ProgressionConfig<C>) -> ProbabilityTable<C> {
    let max_round = config.max_round.max(1);
    let clamped_round = (round.max(1) as u32).min(max_round);
    let mut weights = BTreeMap::new();
    let mut total_weight = 0.0;
    for &category in C::ALL {
        let weight = config.rule(category).map_or(0.0, |rule| raw_weight(rule, clamped_round, max_round));
        total_weight += weight;
        weights.insert(category, weight);
    }
    if total_weight > 0.0 {
        for weight in weights.values_mut() {
            *weight = round_to_cents(*weight * 100.0 / total_weight);
        }
    }
    debug!("round {} (clamped to {}): total raw weight {}", round, clamped_round, total_weight);
    ProbabilityTable::from_chances(weights)
}

fn raw_weight(rule: &CategoryRule, clamped_round: u32, max_round: u32) -> f64 {
    if clamped_round < rule.unlock_round {
        return 0.0;
    }
    let span = max_round.saturating_sub(rule.unlock_round);
    let t = if span == 0 {
        1.0
    } else {
        f64::from(clamped_round - rule.unlock_round) / f64::from(span)
    };
    lerp(rule.start_pct, rule.end_pct, t)
}

impl<C: Category> ProbabilityTable<C> {
    /// Draws a single category, weighted by chance.
    ///
    /// A draw that lands past the last positive chance, as it can when the chances sum to slightly less than 100, picks the last category with a positive chance. Only a degenerate table returns `fallback`.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R, fallback: C) -> C {
        let target = rng.gen::<f64>() * 100.0;
        let mut accumulated = 0.0;
        let mut last = None;
        for (category, chance) in self.iter() {
            if chance <= 0.0 { continue; }
            accumulated += chance;
            if target < accumulated {
                return category;
            }
            last = Some(category);
        }
        last.unwrap_or(fallback)
    }
}

impl Default for ProgressionConfig<PillType> {
    /// Round 1 already carries some risk, HEAL unlocks before FATAL, and LIFE is disabled.
    fn default() -> ProgressionConfig<PillType> {
        ProgressionConfig::new(DEFAULT_MAX_ROUND, [
            (PillType::Safe, CategoryRule::new(1, 45.0, 10.0)),
            (PillType::DmgLow, CategoryRule::new(1, 30.0, 15.0)),
            (PillType::DmgHigh, CategoryRule::new(1, 15.0, 25.0)),
            (PillType::Heal, CategoryRule::new(2, 10.0, 15.0)),
            (PillType::Fatal, CategoryRule::new(4, 5.0, 18.0)),
            (PillType::Life, CategoryRule::new(99, 0.0, 0.0))
        ])
    }
}

impl Default for ProgressionConfig<PillShape> {
    /// Two easily told apart shapes in round 1, with one or two new shapes per round after that.
    fn default() -> ProgressionConfig<PillShape> {
        ProgressionConfig::new(DEFAULT_MAX_ROUND, [
            (PillShape::Capsule, CategoryRule::new(1, 50.0, 20.0)),
            (PillShape::Round, CategoryRule::new(1, 50.0, 15.0)),
            (PillShape::Oval, CategoryRule::new(2, 20.0, 20.0)),
            (PillShape::Triangle, CategoryRule::new(3, 15.0, 25.0)),
            (PillShape::Flower, CategoryRule::new(4, 12.0, 15.0)),
            (PillShape::Skull, CategoryRule::new(5, 10.0, 15.0)),
            (PillShape::Star, CategoryRule::new(6, 8.0, 12.0)),
            (PillShape::Heart, CategoryRule::new(7, 8.0, 10.0)),
            (PillShape::Bear, CategoryRule::new(8, 6.0, 10.0)),
            (PillShape::Pumpkin, CategoryRule::new(9, 6.0, 10.0)),
            (PillShape::Gem, CategoryRule::new(10, 5.0, 8.0)),
            (PillShape::Coin, CategoryRule::new(10, 5.0, 8.0)),
            (PillShape::Cross, CategoryRule::new(11, 4.0, 8.0)),
            (PillShape::Domino, CategoryRule::new(12, 4.0, 6.0)),
            (PillShape::Fruit, CategoryRule::new(13, 3.0, 6.0)),
            (PillShape::Pineapple, CategoryRule::new(14, 3.0, 5.0))
        ])
    }
}

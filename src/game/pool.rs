//! Pool sizing, and the pills that make up a round's pool.

use std::{
    fmt,
    iter
};
use log::{
    debug,
    warn
};
use rand::{
    Rng,
    seq::SliceRandom
};
use serde::{
    Deserialize,
    Serialize
};
use uuid::Uuid;
use crate::{
    config::{
        Config,
        ConfigError
    },
    game::{
        Category,
        Distribution,
        DistributionError,
        PillShape,
        PillStats,
        PillType,
        ProgressionConfig,
        chances,
        distribute
    },
    util::random_uuid
};

/// How the number of pills in a pool grows over the rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolScalingConfig {
    /// Pool size in round 1.
    pub base_count: u32,
    /// Pills added each time a cycle completes.
    pub increase_by: u32,
    /// Length of a cycle, in rounds.
    pub frequency: u32,
    /// Upper bound on the pool size, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cap: Option<u32>
}

impl PoolScalingConfig {
    /// Checks the base count, frequency, and cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_count == 0 {
            return Err(ConfigError::BaseCount);
        }
        if self.frequency == 0 {
            return Err(ConfigError::Frequency);
        }
        if let Some(cap) = self.max_cap {
            if cap < self.base_count {
                return Err(ConfigError::CapBelowBase { cap, base: self.base_count });
            }
        }
        Ok(())
    }
}

impl Default for PoolScalingConfig {
    fn default() -> PoolScalingConfig {
        PoolScalingConfig {
            base_count: 6,
            increase_by: 1,
            frequency: 3,
            max_cap: Some(12)
        }
    }
}

/// The number of pills in the pool of the given round.
///
/// Rounds below 1 count as round 1. The size grows by `increase_by` every `frequency` rounds and never exceeds `max_cap`.
pub fn pool_size(round: i32, config: &PoolScalingConfig) -> u32 {
    let safe_round = round.max(1) as u32;
    let cycles = (safe_round - 1) / config.frequency.max(1);
    let size = config.base_count.saturating_add(cycles.saturating_mul(config.increase_by));
    config.max_cap.map_or(size, |cap| size.min(cap))
}

/// Uniquely identifies a pill within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PillId(Uuid);

impl PillId {
    /// Draws a fresh id from the given generator.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> PillId {
        PillId(random_uuid(rng))
    }
}

impl fmt::Display for PillId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single pill. Its shape is public, its type stays hidden until it is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pill {
    /// The pill's id.
    pub id: PillId,
    /// What the pill does.
    pub kind: PillType,
    /// What the pill looks like.
    pub shape: PillShape,
    /// What swallowing the pill does, rolled when the pool is generated.
    pub stats: PillStats,
    /// Whether the pill's type is public knowledge.
    pub revealed: bool
}

/// The pills available in the current round, along with their composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillPool {
    pills: Vec<Pill>,
    type_counts: Distribution<PillType>,
    shape_counts: Distribution<PillShape>
}

impl PillPool {
    /// Generates the pool for the given round, sized according to `config.pool`.
    pub fn generate<R: Rng + ?Sized>(round: i32, config: &Config, rng: &mut R) -> PillPool {
        PillPool::generate_with_count(round, pool_size(round, &config.pool), config, rng)
    }

    /// Generates a pool of exactly `count` pills, with the type and shape composition of the given round.
    ///
    /// Shapes are paired with types at random and the pills are shuffled, so neither the position nor the shape of a pill gives away its type. Each pill's stats are rolled from `config.pills`.
    pub fn generate_with_count<R: Rng + ?Sized>(round: i32, count: u32, config: &Config, rng: &mut R) -> PillPool {
        let type_counts = composition(round, count, &config.pill_types);
        let shape_counts = composition(round, count, &config.shapes);
        let mut shapes = expand(&shape_counts);
        shapes.shuffle(rng);
        let mut pills = expand(&type_counts).into_iter()
            .zip(shapes)
            .map(|(kind, shape)| Pill {
                id: PillId::random(rng),
                stats: PillStats::roll(kind, &config.pills, rng),
                kind, shape,
                revealed: false
            })
            .collect::<Vec<_>>();
        pills.shuffle(rng);
        debug!("round {}: generated {} pills, types {:?}", round, pills.len(), type_counts);
        PillPool { pills, type_counts, shape_counts }
    }

    /// Builds a pool from explicit pills.
    pub fn from_pills(pills: Vec<Pill>) -> PillPool {
        PillPool {
            type_counts: Distribution::tally(pills.iter().map(|pill| pill.kind)),
            shape_counts: Distribution::tally(pills.iter().map(|pill| pill.shape)),
            pills
        }
    }

    /// Removes a pill from the pool and returns it. Unknown ids leave the pool untouched.
    pub fn consume(&mut self, id: &PillId) -> Option<Pill> {
        let idx = self.pills.iter().position(|pill| pill.id == *id)?;
        let pill = self.pills.remove(idx);
        self.type_counts.decrement(pill.kind);
        self.shape_counts.decrement(pill.shape);
        Some(pill)
    }

    /// Makes a pill's type public. Returns `false` if there is no such pill.
    pub fn reveal(&mut self, id: &PillId) -> bool {
        if let Some(pill) = self.pills.iter_mut().find(|pill| pill.id == *id) {
            pill.revealed = true;
            true
        } else {
            false
        }
    }

    /// Looks up a pill by id.
    pub fn get(&self, id: &PillId) -> Option<&Pill> {
        self.pills.iter().find(|pill| pill.id == *id)
    }

    /// The remaining pills, in pool order.
    pub fn pills(&self) -> &[Pill] {
        &self.pills
    }

    /// The number of remaining pills.
    pub fn len(&self) -> usize {
        self.pills.len()
    }

    /// `true` once every pill has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pills.is_empty()
    }

    /// How many of the remaining pills have each type.
    pub fn type_counts(&self) -> &Distribution<PillType> {
        &self.type_counts
    }

    /// How many of the remaining pills have each shape. This is what shape quests are drawn from.
    pub fn shape_counts(&self) -> &Distribution<PillShape> {
        &self.shape_counts
    }
}

/// The per-category counts of a pool of `count` pills in the given round.
///
/// If nothing is unlocked in this round, every pill gets the fallback category of its kind, so a pool always holds exactly `count` pills.
fn composition<C: Category>(round: i32, count: u32, progression: &ProgressionConfig<C>) -> Distribution<C> {
    let table = chances(round, progression);
    if table.is_degenerate() && count > 0 {
        warn!("round {}: nothing unlocked, forcing {} pills of {}", round, count, C::FALLBACK);
    }
    match distribute(count, &table.or_fallback(C::FALLBACK)) {
        Ok(distribution) => distribution,
        Err(DistributionError::DegenerateTable { .. }) => unreachable!("fallback table has a positive chance")
    }
}

fn expand<C: Category>(distribution: &Distribution<C>) -> Vec<C> {
    distribution.iter()
        .flat_map(|(category, count)| iter::repeat(category).take(count as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use rand::{SeedableRng, rngs::StdRng};
    use crate::game::CategoryRule;
    use super::*;

    fn pill(rng: &mut StdRng, kind: PillType, shape: PillShape) -> Pill {
        Pill { id: PillId::random(rng), kind, shape, stats: PillStats::default(), revealed: false }
    }

    #[test]
    fn default_pool_grows_every_three_rounds() {
        let config = PoolScalingConfig::default();
        assert_eq!(pool_size(1, &config), 6);
        assert_eq!(pool_size(3, &config), 6);
        assert_eq!(pool_size(4, &config), 7);
        assert_eq!(pool_size(7, &config), 8);
        assert_eq!(pool_size(16, &config), 11);
        assert_eq!(pool_size(19, &config), 12);
        assert_eq!(pool_size(100, &config), 12);
    }

    #[test]
    fn early_rounds_count_as_round_one() {
        let config = PoolScalingConfig::default();
        assert_eq!(pool_size(0, &config), 6);
        assert_eq!(pool_size(-20, &config), 6);
        assert_eq!(pool_size(i32::MIN, &config), 6);
    }

    #[test]
    fn uncapped_pools_keep_growing() {
        let config = PoolScalingConfig { base_count: 4, increase_by: 2, frequency: 1, max_cap: None };
        assert_eq!(pool_size(1, &config), 4);
        assert_eq!(pool_size(2, &config), 6);
        assert_eq!(pool_size(50, &config), 102);
        assert_eq!(pool_size(i32::MAX, &PoolScalingConfig { increase_by: u32::MAX, ..config }), u32::MAX);
    }

    #[test]
    fn scaling_validation() {
        assert!(PoolScalingConfig::default().validate().is_ok());
        let config = PoolScalingConfig { max_cap: Some(3), ..PoolScalingConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::CapBelowBase { cap: 3, base: 6 })));
        let config = PoolScalingConfig { frequency: 0, ..PoolScalingConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Frequency)));
        let config = PoolScalingConfig { base_count: 0, max_cap: None, ..PoolScalingConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::BaseCount)));
    }

    #[test]
    fn generated_pool_matches_its_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = Config::default();
        for round in 1..=20 {
            let pool = PillPool::generate(round, &config, &mut rng);
            assert_eq!(pool.len() as u32, pool_size(round, &config.pool));
            assert_eq!(pool.type_counts(), &Distribution::tally(pool.pills().iter().map(|pill| pill.kind)));
            assert_eq!(pool.shape_counts(), &Distribution::tally(pool.pills().iter().map(|pill| pill.shape)));
            assert!(pool.pills().iter().all(|pill| !pill.revealed));
            let ids = pool.pills().iter().map(|pill| pill.id).collect::<HashSet<_>>();
            assert_eq!(ids.len(), pool.len());
        }
    }

    #[test]
    fn first_round_pool_has_no_fatal_pills() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = PillPool::generate(1, &Config::default(), &mut rng);
        assert_eq!(pool.type_counts().get(PillType::Fatal), 0);
        assert_eq!(pool.type_counts().get(PillType::Heal), 0);
        assert!(pool.shape_counts().available().all(|shape| shape == PillShape::Capsule || shape == PillShape::Round));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = Config::default();
        let a = PillPool::generate(6, &config, &mut StdRng::seed_from_u64(9));
        let b = PillPool::generate(6, &config, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn locked_config_falls_back() {
        let mut config = Config::default();
        config.pill_types = ProgressionConfig::new(15, PillType::ALL.iter().map(|&kind| (kind, CategoryRule::new(50, 10.0, 10.0))));
        config.shapes = ProgressionConfig::new(15, PillShape::ALL.iter().map(|&shape| (shape, CategoryRule::new(50, 10.0, 10.0))));
        let pool = PillPool::generate(2, &config, &mut StdRng::seed_from_u64(1));
        assert_eq!(pool.len(), 6);
        assert_eq!(pool.type_counts().get(PillType::Safe), 6);
        assert_eq!(pool.shape_counts().get(PillShape::Round), 6);
    }

    #[test]
    fn locked_config_with_no_pills_is_empty() {
        let mut config = Config::default();
        config.pill_types = ProgressionConfig::new(15, PillType::ALL.iter().map(|&kind| (kind, CategoryRule::new(50, 10.0, 10.0))));
        let pool = PillPool::generate_with_count(2, 0, &config, &mut StdRng::seed_from_u64(1));
        assert!(pool.is_empty());
        assert_eq!(pool.type_counts().total(), 0);
    }

    #[test]
    fn pill_stats_follow_their_type() {
        let mut rng = StdRng::seed_from_u64(17);
        let config = Config::default();
        for round in 1..=15 {
            for pill in PillPool::generate(round, &config, &mut rng).pills() {
                match pill.kind {
                    PillType::DmgLow => assert!((config.pills.dmg_low.min..=config.pills.dmg_low.max).contains(&pill.stats.damage)),
                    PillType::DmgHigh => assert!((config.pills.dmg_high.min..=config.pills.dmg_high.max).contains(&pill.stats.damage)),
                    PillType::Fatal => assert!(pill.stats.fatal),
                    PillType::Heal => assert_eq!(pill.stats.heal, config.pills.heal_amount),
                    PillType::Safe | PillType::Life => assert_eq!(pill.stats.damage, 0)
                }
            }
        }
    }

    #[test]
    fn consume_keeps_counts_in_sync() {
        let mut rng = StdRng::seed_from_u64(3);
        let first = pill(&mut rng, PillType::Fatal, PillShape::Skull);
        let second = pill(&mut rng, PillType::Safe, PillShape::Skull);
        let mut pool = PillPool::from_pills(vec![first.clone(), second.clone()]);
        assert_eq!(pool.shape_counts().get(PillShape::Skull), 2);
        assert_eq!(pool.consume(&first.id), Some(first.clone()));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.type_counts().get(PillType::Fatal), 0);
        assert_eq!(pool.shape_counts().get(PillShape::Skull), 1);
        assert_eq!(pool.consume(&first.id), None);
        assert_eq!(pool.len(), 1);
        assert!(pool.consume(&second.id).is_some());
        assert!(pool.is_empty());
        assert_eq!(pool.type_counts().total(), 0);
    }

    #[test]
    fn reveal_marks_known_pills_only() {
        let mut rng = StdRng::seed_from_u64(4);
        let known = pill(&mut rng, PillType::Heal, PillShape::Heart);
        let mut pool = PillPool::from_pills(vec![known.clone()]);
        assert!(pool.reveal(&known.id));
        assert!(pool.get(&known.id).map_or(false, |pill| pill.revealed));
        assert!(!pool.reveal(&PillId::random(&mut rng)));
    }
}

//! What pills do to the players who swallow them.
//!
//! Every pill carries `PillStats`, rolled when its pool is generated. Players have a number of lives and a resistance meter. Damage wears down resistance; once it hits zero the player collapses, loses a life, and gets a full meter back. A player with no lives left is out.

use rand::Rng;
use serde::{
    Deserialize,
    Serialize
};
use crate::{
    config::ConfigError,
    game::PillType
};

/// The damage a FATAL pill reports. FATAL pills take every remaining life regardless of resistance.
pub const FATAL_DAMAGE: u32 = 999;

/// An inclusive range of damage values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    /// Smallest possible damage.
    pub min: u32,
    /// Largest possible damage.
    pub max: u32
}

impl DamageRange {
    /// Creates a range from its bounds.
    pub fn new(min: u32, max: u32) -> DamageRange {
        DamageRange { min, max }
    }

    /// Draws a damage value from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max.max(self.min))
    }
}

/// How strong the damaging and healing pill types are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillConfig {
    /// Damage of a DMG_LOW pill.
    pub dmg_low: DamageRange,
    /// Damage of a DMG_HIGH pill.
    pub dmg_high: DamageRange,
    /// Resistance restored by a HEAL pill.
    pub heal_amount: u32
}

impl PillConfig {
    /// Checks that both damage ranges are ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, range) in [(PillType::DmgLow, self.dmg_low), (PillType::DmgHigh, self.dmg_high)] {
            if range.min > range.max {
                return Err(ConfigError::DamageRange { kind: kind.to_string(), min: range.min, max: range.max });
            }
        }
        Ok(())
    }
}

impl Default for PillConfig {
    fn default() -> PillConfig {
        PillConfig {
            dmg_low: DamageRange::new(1, 2),
            dmg_high: DamageRange::new(3, 4),
            heal_amount: 2
        }
    }
}

/// The effect of a single pill, fixed when the pill is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PillStats {
    /// Resistance lost.
    pub damage: u32,
    /// Whether the pill takes every remaining life.
    pub fatal: bool,
    /// Resistance restored.
    pub heal: u32,
    /// Lives restored.
    pub lives_restore: u32
}

impl PillStats {
    /// Rolls the stats of a pill of the given type.
    pub fn roll<R: Rng + ?Sized>(kind: PillType, config: &PillConfig, rng: &mut R) -> PillStats {
        match kind {
            PillType::Safe => PillStats::default(),
            PillType::DmgLow => PillStats { damage: config.dmg_low.sample(rng), ..PillStats::default() },
            PillType::DmgHigh => PillStats { damage: config.dmg_high.sample(rng), ..PillStats::default() },
            PillType::Fatal => PillStats { damage: FATAL_DAMAGE, fatal: true, ..PillStats::default() },
            PillType::Heal => PillStats { heal: config.heal_amount, ..PillStats::default() },
            PillType::Life => PillStats { lives_restore: 1, ..PillStats::default() }
        }
    }
}

/// Lives and resistance every player starts a match with. These are also the maximums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsConfig {
    /// Starting and maximum lives.
    pub lives: u32,
    /// Starting and maximum resistance.
    pub resistance: u32
}

impl VitalsConfig {
    /// Checks that players start with at least one life and some resistance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lives == 0 || self.resistance == 0 {
            return Err(ConfigError::Vitals { lives: self.lives, resistance: self.resistance });
        }
        Ok(())
    }
}

impl Default for VitalsConfig {
    fn default() -> VitalsConfig {
        VitalsConfig { lives: 3, resistance: 6 }
    }
}

/// A player's remaining lives and resistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    /// Lives left. The player is out at 0.
    pub lives: u32,
    /// Current resistance.
    pub resistance: u32,
    max_lives: u32,
    max_resistance: u32
}

/// What happened when a pill's stats were applied to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectResult {
    /// Resistance actually lost, not counting the refill after a collapse.
    pub damage_dealt: u32,
    /// Resistance actually restored.
    pub heal_received: u32,
    /// Whether the player's resistance ran out, costing them a life.
    pub collapsed: bool,
    /// Whether the player has no lives left.
    pub eliminated: bool
}

impl Vitals {
    /// Full vitals, as at the start of a match.
    pub fn new(config: &VitalsConfig) -> Vitals {
        Vitals {
            lives: config.lives,
            resistance: config.resistance,
            max_lives: config.lives,
            max_resistance: config.resistance
        }
    }

    /// `true` once every life is gone.
    pub fn is_eliminated(&self) -> bool {
        self.lives == 0
    }

    /// Applies a pill's effect.
    pub fn apply(&mut self, stats: &PillStats) -> EffectResult {
        let mut result = EffectResult { damage_dealt: 0, heal_received: 0, collapsed: false, eliminated: false };
        if self.is_eliminated() {
            result.eliminated = true;
            return result;
        }
        if stats.fatal {
            result.damage_dealt = self.resistance;
            self.resistance = 0;
            self.lives = 0;
            result.eliminated = true;
            return result;
        }
        if stats.damage > 0 {
            result.damage_dealt = stats.damage.min(self.resistance);
            self.resistance -= result.damage_dealt;
            if self.resistance == 0 {
                result.collapsed = true;
                self.lives -= 1;
                if self.lives > 0 {
                    self.resistance = self.max_resistance;
                }
            }
        }
        if self.is_eliminated() {
            result.eliminated = true;
            return result;
        }
        let healed = self.resistance.saturating_add(stats.heal).min(self.max_resistance);
        result.heal_received = healed - self.resistance;
        self.resistance = healed;
        self.lives = self.lives.saturating_add(stats.lives_restore).min(self.max_lives);
        result
    }
}

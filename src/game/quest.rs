//! Shape quests: short sequences of shapes a player tries to consume in order.

use std::fmt;
use log::debug;
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
    config::ConfigError,
    game::{
        Category,
        Distribution,
        PillShape
    },
    util::random_uuid
};

/// How long quests are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestConfig {
    /// Length of every quest before `increase_after_round`, and the lower bound after.
    pub min_length: usize,
    /// Upper bound on the quest length.
    pub max_length: usize,
    /// From this round on, quest lengths are drawn from `min_length..=max_length`.
    pub increase_after_round: i32
}

impl QuestConfig {
    /// Checks that the length bounds are positive and ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length == 0 || self.max_length < self.min_length {
            return Err(ConfigError::QuestLength { min: self.min_length, max: self.max_length });
        }
        Ok(())
    }
}

impl Default for QuestConfig {
    fn default() -> QuestConfig {
        QuestConfig {
            min_length: 2,
            max_length: 3,
            increase_after_round: 5
        }
    }
}

/// A sequence of categories to be consumed in order.
///
/// A quest with an empty sequence is no objective at all. It never progresses and never completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest<C: Category> {
    /// Unique per generated quest.
    pub id: Uuid,
    /// The categories to consume, in order.
    pub sequence: Vec<C>,
    /// How many entries of `sequence` have been matched so far.
    pub progress: usize,
    /// `true` iff `progress` has reached the end of a non-empty sequence.
    pub completed: bool
}

/// The quests players get each round.
pub type ShapeQuest = Quest<PillShape>;

/// The result of `Quest::advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestProgress<C: Category> {
    /// The quest after the consumption.
    pub quest: Quest<C>,
    /// This consumption completed the quest.
    pub just_completed: bool,
    /// This consumption was wrong and threw away earlier progress.
    pub was_reset: bool
}

/// Generates a quest from the categories that are still available.
///
/// Before `config.increase_after_round` the quest has `config.min_length` entries, afterwards a length in `min_length..=max_length` is drawn. Either way it is capped at the number of available categories. Entries are distinct and in random order.
pub fn generate<C: Category, R: Rng + ?Sized>(round: i32, available: &Distribution<C>, config: &QuestConfig, rng: &mut R) -> Quest<C> {
    let mut feasible = available.available().collect::<Vec<_>>();
    let length = if round < config.increase_after_round {
        config.min_length
    } else {
        rng.gen_range(config.min_length..=config.max_length.max(config.min_length))
    };
    let length = length.min(feasible.len());
    let (sequence, _) = feasible.partial_shuffle(rng, length);
    let sequence = sequence.to_vec();
    debug!("round {}: quest of length {} out of {} available categories", round, sequence.len(), feasible.len());
    Quest {
        id: random_uuid(rng),
        sequence,
        progress: 0,
        completed: false
    }
}

impl<C: Category> Quest<C> {
    /// `false` for quests with an empty sequence.
    pub fn is_objective(&self) -> bool {
        !self.sequence.is_empty()
    }

    /// The category that would advance this quest, if any.
    pub fn expected(&self) -> Option<C> {
        if self.completed {
            None
        } else {
            self.sequence.get(self.progress).copied()
        }
    }

    /// Computes the quest state after `consumed` has been consumed.
    ///
    /// A matching category advances the quest and may complete it. Any other category sends it back to the start. Completed quests and quests without an objective are returned unchanged.
    pub fn advance(&self, consumed: C) -> QuestProgress<C> {
        let mut quest = self.clone();
        let expected = match self.expected() {
            Some(expected) => expected,
            None => return QuestProgress { quest, just_completed: false, was_reset: false }
        };
        if consumed == expected {
            quest.progress += 1;
            quest.completed = quest.progress == quest.sequence.len();
            QuestProgress { just_completed: quest.completed, quest, was_reset: false }
        } else {
            let was_reset = quest.progress > 0;
            quest.progress = 0;
            QuestProgress { quest, just_completed: false, was_reset }
        }
    }
}

impl<C: Category> fmt::Display for Quest<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_objective() {
            return write!(f, "no quest");
        }
        for (i, category) in self.sequence.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", category)?;
        }
        write!(f, " ({}/{})", self.progress, self.sequence.len())
    }
}

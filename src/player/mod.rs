//! Contains the `Player` trait, which is what the game uses to talk to players, and some implementations.

mod cli;

use crate::game::{
    PillId,
    PillPool,
    ShapeQuest
};
pub use self::cli::CliPlayer;

/// The game uses this trait to talk to players. Implementing types perform all game actions.
pub trait Player {
    /// Returns the name of the player. Must stay the same throughout a game.
    fn name(&self) -> &str;

    /// Called at the start of every round with the player's quest, or `None` if they have none this round.
    fn recv_quest(&self, _: Option<&ShapeQuest>) {}

    /// Called when it is this player's turn. Returns the id of the pill to take.
    fn choose_pill(&self, pool: &PillPool) -> PillId;
}

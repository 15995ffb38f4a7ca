//! Contains the `Handler` trait, which is what the game uses to broadcast public game messages and to apply pill effects, and some implementations.

mod cli;

use crate::{
    game::{
        Pill,
        PillId,
        PillPool,
        state::Consumption
    },
    player::Player
};
pub use self::cli::CliHandler;

/// The game uses this trait to broadcast public game messages.
pub trait Handler<P: Player> {
    /// Called at the start of every round with the freshly generated pool.
    fn announce_round(&mut self, _: i32, _: &PillPool) {}

    /// Called if a player has chosen a pill that is not in the pool.
    ///
    /// A call of this method is followed up by another `choose_pill` call to the same player.
    fn cannot_consume(&mut self, _: &P, _: PillId) {}

    /// Called after a player has taken a pill, before its effect is resolved.
    fn announce_consumption(&mut self, _: &P, _: &Consumption) {}

    /// Applies the effect of a consumed pill.
    ///
    /// Implementations track whatever resources their rules use, such as the `Vitals` of each player, and return the players who are out of the match as a result of this pill.
    fn resolve_consumption(&mut self, player: &P, pill: &Pill) -> Vec<P>;

    /// Called when one or more players have been eliminated.
    fn announce_eliminations(&mut self, _: &[P]) {}

    /// Called once the match is over. `None` means nobody survived.
    fn announce_winner(&mut self, _: Option<&P>) {}
}

//! Turn rotation and win conditions.

use thiserror::Error;

/// The minimum number of players required for a match to go on.
pub const MIN_PLAYERS: usize = 2;

/// The possible errors returned by `next_turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    /// The turn order has no players in it.
    #[error("player order cannot be empty")]
    EmptyPlayerOrder,
    /// Nobody who is alive appears in the turn order.
    #[error("no active players remaining")]
    NoActivePlayers
}

/// Returns the player whose turn comes after `current`.
///
/// Scans `player_order` circularly, starting right after `current`, and returns the first player that is in `alive` (or simply the next player if `alive` is `None`). Eliminated players are skipped. If `current` has been eliminated, the scan still starts at their position. If `current` is the only one left, they get another turn. If `current` is not in `player_order` at all, the scan starts from the beginning.
///
/// # Errors
///
/// Fails if `player_order` is empty, or if `alive` is given but none of its players are in `player_order`.
pub fn next_turn<'a, P: PartialEq>(current: &P, player_order: &'a [P], alive: Option<&[P]>) -> Result<&'a P, TurnError> {
    if player_order.is_empty() {
        return Err(TurnError::EmptyPlayerOrder);
    }
    let start = player_order.iter().position(|player| player == current).map_or(0, |idx| idx + 1);
    player_order.iter()
        .cycle()
        .skip(start)
        .take(player_order.len())
        .find(|player| alive.map_or(true, |alive| alive.contains(player)))
        .ok_or(TurnError::NoActivePlayers)
}

/// The players `current` may target: everyone else who is still alive, in turn order.
pub fn targetable_players<'a, P: PartialEq>(current: &P, all_players: &'a [P], alive: Option<&[P]>) -> Vec<&'a P> {
    all_players.iter()
        .filter(|&player| player != current)
        .filter(|player| alive.map_or(true, |alive| alive.contains(player)))
        .collect()
}

/// `true` if enough players are alive for the match to go on.
pub fn can_continue<P>(alive: &[P], min_players: usize) -> bool {
    alive.len() >= min_players
}

/// The last player standing, if there is exactly one.
pub fn winner<P>(alive: &[P]) -> Option<&P> {
    match alive {
        [sole] => Some(sole),
        _ => None
    }
}

//! Core game logic.

pub mod distribution;
pub mod effect;
pub mod pool;
pub mod progression;
pub mod quest;
pub mod state;
pub mod turn;
mod types;

use std::hash::Hash;
use rand::Rng;
use crate::{
    config::Config,
    handler::Handler,
    player::Player
};
pub use self::{
    distribution::{
        DistributionError,
        distribute
    },
    effect::{
        DamageRange,
        EffectResult,
        PillConfig,
        PillStats,
        Vitals,
        VitalsConfig
    },
    pool::{
        Pill,
        PillId,
        PillPool,
        PoolScalingConfig,
        pool_size
    },
    progression::{
        chances,
        lerp
    },
    quest::{
        Quest,
        QuestConfig,
        QuestProgress,
        ShapeQuest
    },
    turn::{
        MIN_PLAYERS,
        TurnError,
        can_continue,
        next_turn,
        targetable_players,
        winner
    },
    types::*
};

/// Moderate a match of Pill Roulette with the default configuration.
///
/// Returns the winner of the match, or `None` if the last players were eliminated together.
pub fn run<P: Eq + Hash + Clone + Player, H: Handler<P>, R: Rng + ?Sized>(handler: H, lobby: state::Lobby<P>, rng: &mut R) -> Result<Option<P>, state::StartGameError> {
    run_with_config(handler, lobby, Config::default(), rng)
}

/// Moderate a match of Pill Roulette with the given players and configuration.
///
/// Players take turns choosing a pill; the handler decides who is eliminated by it. The match ends once fewer than two players are left.
///
/// Returns the winner of the match, or `None` if the last players were eliminated together.
pub fn run_with_config<P: Eq + Hash + Clone + Player, H: Handler<P>, R: Rng + ?Sized>(mut handler: H, lobby: state::Lobby<P>, config: Config, rng: &mut R) -> Result<Option<P>, state::StartGameError> {
    let mut game_state = lobby.start(config, rng)?;
    let mut announced_round = None;
    Ok(loop {
        game_state = match game_state {
            state::State::Lobby(_) => unreachable!(),
            state::State::Playing(mut playing) => {
                // announce the pool and hand out quests once per round
                if announced_round != Some(playing.round()) {
                    handler.announce_round(playing.round(), playing.pool());
                    for player in playing.alive() {
                        player.recv_quest(playing.quest(player));
                    }
                    announced_round = Some(playing.round());
                }
                let player = playing.current_turn().clone();
                let consumption = loop {
                    let pill_id = player.choose_pill(playing.pool());
                    if let Some(consumption) = playing.take_pill(&pill_id) {
                        break consumption;
                    }
                    handler.cannot_consume(&player, pill_id);
                };
                handler.announce_consumption(&player, &consumption);
                let eliminated = handler.resolve_consumption(&player, &consumption.pill);
                if !eliminated.is_empty() {
                    handler.announce_eliminations(&eliminated);
                }
                playing.end_turn(&eliminated, rng)
            }
            state::State::Complete(state::Complete { winner, .. }) => {
                handler.announce_winner(winner.as_ref());
                break winner;
            }
        };
    })
}

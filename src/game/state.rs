//! Match state representation.

use std::{
    collections::HashMap,
    hash::Hash
};
use log::info;
use rand::{
    Rng,
    seq::SliceRandom
};
use thiserror::Error;
use crate::{
    config::{
        Config,
        ConfigError
    },
    game::{
        MIN_PLAYERS,
        Pill,
        PillId,
        PillPool,
        PillShape,
        QuestProgress,
        ShapeQuest,
        can_continue,
        next_turn,
        quest,
        targetable_players,
        winner
    }
};

/// This enum represents the state of a match. Each variant contains relevant methods to observe or progress the match, refer to their documentation for details.
///
/// The type parameter `P` is used for player identifiers.
#[derive(Debug)]
pub enum State<P: Eq + Hash> {
    /// A match which has not been started. The host may sign up players, or start the match.
    Lobby(Lobby<P>),
    /// A running match, waiting for the current player to take a pill.
    Playing(Playing<P>),
    /// A completed match.
    Complete(Complete<P>)
}

impl<P: Eq + Hash> State<P> {
    /// If the match is ongoing, returns the players who have not been eliminated, in turn order.
    pub fn alive(&self) -> Option<&[P]> {
        match *self {
            State::Lobby(_) => None,
            State::Playing(ref playing) => Some(playing.alive()),
            State::Complete(_) => None
        }
    }

    /// Returns the current round, or `None` if the match has not been started.
    ///
    /// For `Complete`, this is the round in which the match ended.
    pub fn round(&self) -> Option<i32> {
        match *self {
            State::Lobby(_) => None,
            State::Playing(ref playing) => Some(playing.round()),
            State::Complete(ref complete) => Some(complete.rounds)
        }
    }
}

impl<P: Eq + Hash> Default for State<P> {
    fn default() -> State<P> {
        State::Lobby(Lobby::default())
    }
}

/// A match which has not been started. The host may sign up players, or start the match.
#[derive(Debug)]
pub struct Lobby<P: Eq + Hash> {
    players: Vec<P>
}

/// The possible errors returned by `Lobby::start`.
#[derive(Debug, Error)]
pub enum StartGameError {
    /// There are less than the required number of players.
    #[error("failed to start game: not enough players ({required} required, {found} signed up)")]
    NotEnoughPlayers {
        /// This many players are required to start a match.
        required: usize,
        /// But only this many have signed up.
        found: usize
    },
    /// The configuration failed validation.
    #[error("failed to start game: {0}")]
    InvalidConfig(#[from] ConfigError)
}

impl<P: Eq + Hash> Lobby<P> {
    /// Sign up a player. The `player_id` must be unique.
    ///
    /// Returns `true` if the player has been successfully signed up, or `false` if a player with that ID already exists.
    pub fn sign_up(&mut self, player_id: P) -> bool {
        if self.is_signed_up(&player_id) {
            false
        } else {
            self.players.push(player_id);
            true
        }
    }

    /// Returns `true` if the given player is already signed up.
    pub fn is_signed_up(&self, player_id: &P) -> bool {
        self.players.contains(player_id)
    }

    /// Returns the number of players that have been signed up so far.
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Removes a player from the lobby.
    ///
    /// Returns `true` if the player was previously signed up.
    pub fn remove_player(&mut self, player_id: &P) -> bool {
        let len = self.players.len();
        self.players.retain(|player| player != player_id);
        self.players.len() < len
    }
}

impl<P: Eq + Hash + Clone> Lobby<P> {
    /// Start the match.
    ///
    /// The turn order is shuffled, the first round's pool is generated, and every player gets a quest.
    pub fn start<R: Rng + ?Sized>(self, config: Config, rng: &mut R) -> Result<State<P>, StartGameError> {
        let num_players = self.num_players();
        if num_players < MIN_PLAYERS {
            return Err(StartGameError::NotEnoughPlayers { required: MIN_PLAYERS, found: num_players });
        }
        config.validate()?;
        let Lobby { players: mut player_order } = self;
        player_order.shuffle(rng);
        let current_turn = player_order[0].clone();
        info!("starting match with {} players", num_players);
        let mut playing = Playing {
            alive: player_order.clone(),
            pool: PillPool::from_pills(Vec::default()),
            quests: HashMap::default(),
            pill_coins: HashMap::default(),
            round: 0,
            config, player_order, current_turn
        };
        playing.start_round(1, rng);
        Ok(State::Playing(playing))
    }
}

impl<P: Eq + Hash> Default for Lobby<P> {
    fn default() -> Lobby<P> {
        Lobby {
            players: Vec::default()
        }
    }
}

impl<P: Eq + Hash> From<Lobby<P>> for State<P> {
    fn from(state: Lobby<P>) -> State<P> {
        State::Lobby(state)
    }
}

/// What happened when a player took a pill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumption {
    /// The consumed pill, now revealed.
    pub pill: Pill,
    /// How the player's quest reacted, if they have one this round.
    pub quest: Option<QuestProgress<PillShape>>
}

/// A running match, waiting for the current player to take a pill.
#[derive(Debug)]
pub struct Playing<P: Eq + Hash> {
    config: Config,
    round: i32,
    player_order: Vec<P>,
    alive: Vec<P>,
    current_turn: P,
    pool: PillPool,
    quests: HashMap<P, ShapeQuest>,
    pill_coins: HashMap<P, u32>
}

impl<P: Eq + Hash> Playing<P> {
    /// The current round, starting at 1.
    pub fn round(&self) -> i32 {
        self.round
    }

    /// All players, in turn order.
    pub fn player_order(&self) -> &[P] {
        &self.player_order
    }

    /// The players who have not been eliminated, in turn order.
    pub fn alive(&self) -> &[P] {
        &self.alive
    }

    /// The player who has to take a pill.
    pub fn current_turn(&self) -> &P {
        &self.current_turn
    }

    /// The pills left in this round.
    pub fn pool(&self) -> &PillPool {
        &self.pool
    }

    /// The given player's quest this round. `None` if the pool was too poor to give them one.
    pub fn quest(&self, player: &P) -> Option<&ShapeQuest> {
        self.quests.get(player)
    }

    /// The number of quests the given player has completed so far.
    pub fn pill_coins(&self, player: &P) -> u32 {
        self.pill_coins.get(player).copied().unwrap_or(0)
    }

    /// The players the current player could target with an item.
    pub fn targets(&self) -> Vec<&P> {
        targetable_players(&self.current_turn, &self.player_order, Some(&self.alive))
    }
}

impl<P: Eq + Hash + Clone> Playing<P> {
    /// The current player takes the given pill.
    ///
    /// The pill is removed from the pool and revealed, and the current player's quest is advanced. Completing a quest earns a pill coin.
    ///
    /// Returns `None` and changes nothing if there is no such pill in the pool.
    pub fn take_pill(&mut self, pill_id: &PillId) -> Option<Consumption> {
        let mut pill = self.pool.consume(pill_id)?;
        pill.revealed = true;
        let quest = self.quests.get_mut(&self.current_turn).map(|quest| {
            let progress = quest.advance(pill.shape);
            *quest = progress.quest.clone();
            progress
        });
        if quest.as_ref().map_or(false, |progress| progress.just_completed) {
            *self.pill_coins.entry(self.current_turn.clone()).or_insert(0) += 1;
        }
        Some(Consumption { pill, quest })
    }

    /// Ends the current player's turn.
    ///
    /// The `eliminated` players are removed from the match. If fewer than two players remain, the match is over. Otherwise, if the pool has run out, the next round starts with a new pool and new quests, and the turn passes to the next player who is still alive.
    pub fn end_turn<R: Rng + ?Sized>(mut self, eliminated: &[P], rng: &mut R) -> State<P> {
        self.alive.retain(|player| !eliminated.contains(player));
        self.quests.retain(|player, _| !eliminated.contains(player));
        if !can_continue(&self.alive, MIN_PLAYERS) {
            info!("match over after {} rounds", self.round);
            return State::Complete(Complete {
                winner: winner(&self.alive).cloned(),
                rounds: self.round,
                pill_coins: self.pill_coins
            });
        }
        if self.pool.is_empty() {
            self.start_round(self.round + 1, rng);
        }
        // alive is a non-empty subset of player_order here
        self.current_turn = match next_turn(&self.current_turn, &self.player_order, Some(&self.alive)) {
            Ok(next) => next.clone(),
            Err(e) => unreachable!("no next turn with {} players alive: {}", self.alive.len(), e)
        };
        State::Playing(self)
    }

    fn start_round<R: Rng + ?Sized>(&mut self, round: i32, rng: &mut R) {
        self.round = round;
        self.pool = PillPool::generate(round, &self.config, rng);
        self.quests = self.alive.iter()
            .map(|player| (player.clone(), quest::generate(round, self.pool.shape_counts(), &self.config.quest, rng)))
            .filter(|(_, quest)| quest.is_objective())
            .collect();
        info!("round {} begins with {} pills", round, self.pool.len());
    }
}

/// A completed match.
#[derive(Debug)]
pub struct Complete<P: Eq + Hash> {
    /// The last player standing. `None` if the last players were eliminated together.
    pub winner: Option<P>,
    /// The round in which the match ended.
    pub rounds: i32,
    /// Quests completed per player.
    pub pill_coins: HashMap<P, u32>
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use crate::game::PillType;
    use super::*;

    fn lobby(players: &[&'static str]) -> Lobby<&'static str> {
        let mut lobby = Lobby::default();
        for &player in players {
            assert!(lobby.sign_up(player));
        }
        lobby
    }

    fn start(players: &[&'static str], rng: &mut StdRng) -> Playing<&'static str> {
        match lobby(players).start(Config::default(), rng) {
            Ok(State::Playing(playing)) => playing,
            other => panic!("match did not start: {:?}", other)
        }
    }

    fn first_pill(playing: &Playing<&'static str>) -> PillId {
        playing.pool().pills()[0].id
    }

    #[test]
    fn sign_ups_are_unique() {
        let mut lobby = lobby(&["alice", "bob"]);
        assert!(!lobby.sign_up("alice"));
        assert_eq!(lobby.num_players(), 2);
        assert!(lobby.remove_player(&"alice"));
        assert!(!lobby.remove_player(&"alice"));
        assert!(!lobby.is_signed_up(&"alice"));
        assert!(lobby.is_signed_up(&"bob"));
    }

    #[test]
    fn not_enough_players() {
        let mut rng = StdRng::seed_from_u64(0);
        match lobby(&["alice"]).start(Config::default(), &mut rng) {
            Err(StartGameError::NotEnoughPlayers { required: 2, found: 1 }) => {}
            other => panic!("unexpected start result: {:?}", other)
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut config = Config::default();
        config.quest.min_length = 0;
        let result = lobby(&["alice", "bob"]).start(config, &mut rng);
        assert!(matches!(result, Err(StartGameError::InvalidConfig(ConfigError::QuestLength { .. }))));
    }

    #[test]
    fn match_starts_in_round_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let playing = start(&["alice", "bob", "carol"], &mut rng);
        assert_eq!(playing.round(), 1);
        assert_eq!(playing.pool().len(), 6);
        assert_eq!(playing.alive(), playing.player_order());
        assert_eq!(playing.current_turn(), &playing.player_order()[0]);
        assert_eq!(playing.targets().len(), 2);
        for player in playing.alive() {
            assert_eq!(playing.quest(player).map(|quest| quest.sequence.len()), Some(2));
            assert_eq!(playing.pill_coins(player), 0);
        }
    }

    #[test]
    fn taking_a_pill_reveals_and_removes_it() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut playing = start(&["alice", "bob"], &mut rng);
        let id = first_pill(&playing);
        let consumption = playing.take_pill(&id).unwrap();
        assert!(consumption.pill.revealed);
        assert_eq!(consumption.pill.id, id);
        assert!(consumption.quest.is_some());
        assert_eq!(playing.pool().len(), 5);
        assert!(playing.pool().get(&id).is_none());
        assert!(playing.take_pill(&id).is_none());
        assert_eq!(playing.pool().len(), 5);
    }

    #[test]
    fn turns_rotate_and_skip_the_eliminated() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut playing = start(&["alice", "bob", "carol"], &mut rng);
        let order = playing.player_order().to_vec();
        let id = first_pill(&playing);
        playing.take_pill(&id);
        let mut playing = match playing.end_turn(&[], &mut rng) {
            State::Playing(playing) => playing,
            other => panic!("match ended early: {:?}", other)
        };
        assert_eq!(playing.current_turn(), &order[1]);
        let id = first_pill(&playing);
        playing.take_pill(&id);
        let playing = match playing.end_turn(&[order[2]], &mut rng) {
            State::Playing(playing) => playing,
            other => panic!("match ended early: {:?}", other)
        };
        assert_eq!(playing.alive(), &[order[0], order[1]]);
        assert_eq!(playing.current_turn(), &order[0]);
        assert!(playing.quest(&order[2]).is_none());
    }

    #[test]
    fn empty_pool_starts_the_next_round() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut playing = start(&["alice", "bob"], &mut rng);
        for _ in 0..6 {
            assert_eq!(playing.round(), 1);
            let id = first_pill(&playing);
            playing.take_pill(&id);
            playing = match playing.end_turn(&[], &mut rng) {
                State::Playing(playing) => playing,
                other => panic!("match ended early: {:?}", other)
            };
        }
        assert_eq!(playing.round(), 2);
        assert_eq!(playing.pool().len(), 6);
    }

    #[test]
    fn completing_a_quest_earns_a_coin() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut playing = start(&["alice", "bob"], &mut rng);
        let current = *playing.current_turn();
        let sequence = playing.quest(&current).map(|quest| quest.sequence.clone()).unwrap_or_default();
        for shape in sequence {
            let id = playing.pool().pills().iter().find(|pill| pill.shape == shape).map(|pill| pill.id).unwrap();
            let consumption = playing.take_pill(&id).unwrap();
            assert!(consumption.quest.is_some());
        }
        assert!(playing.quest(&current).map_or(false, |quest| quest.completed));
        assert_eq!(playing.pill_coins(&current), 1);
    }

    #[test]
    fn last_player_standing_wins() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut playing = start(&["alice", "bob", "carol"], &mut rng);
        let order = playing.player_order().to_vec();
        let id = first_pill(&playing);
        let kind = playing.take_pill(&id).map(|consumption| consumption.pill.kind);
        assert!(matches!(kind, Some(PillType::Safe) | Some(PillType::DmgLow) | Some(PillType::DmgHigh)));
        match playing.end_turn(&[order[0], order[2]], &mut rng) {
            State::Complete(complete) => {
                assert_eq!(complete.winner, Some(order[1]));
                assert_eq!(complete.rounds, 1);
            }
            other => panic!("match should be over: {:?}", other)
        }
    }

    #[test]
    fn simultaneous_elimination_is_a_draw() {
        let mut rng = StdRng::seed_from_u64(7);
        let playing = start(&["alice", "bob"], &mut rng);
        let state = playing.end_turn(&["alice", "bob"], &mut rng);
        assert_eq!(state.round(), Some(1));
        match state {
            State::Complete(complete) => assert_eq!(complete.winner, None),
            other => panic!("match should be over: {:?}", other)
        }
    }
}

use std::collections::HashMap;
use crate::{
    game::{
        Pill,
        PillId,
        PillPool,
        Vitals,
        VitalsConfig,
        state::Consumption
    },
    handler::Handler,
    player::Player
};

/// A game handler which uses the command line.
///
/// Keeps track of every player's lives and resistance. Damage wears down resistance, a collapse costs a life, and a player with no lives left is out.
#[derive(Debug, Default)]
pub struct CliHandler {
    config: VitalsConfig,
    vitals: HashMap<String, Vitals>
}

impl CliHandler {
    /// Creates a handler where every player starts with the given lives and resistance.
    pub fn new(config: VitalsConfig) -> CliHandler {
        CliHandler { config, vitals: HashMap::default() }
    }

    /// The given player's current lives and resistance.
    pub fn vitals<P: Player>(&self, player: &P) -> Vitals {
        self.vitals.get(player.name()).copied().unwrap_or_else(|| Vitals::new(&self.config))
    }
}

impl<P: Player + Clone> Handler<P> for CliHandler {
    fn announce_round(&mut self, round: i32, pool: &PillPool) {
        println!("[ ** ] round {}: {} pills", round, pool.len());
        for (shape, count) in pool.shape_counts().iter().filter(|&(_, count)| count > 0) {
            println!("[ ** ] {} x{}", shape, count);
        }
    }

    fn cannot_consume(&mut self, _: &P, _: PillId) {
        println!("[ !! ] no such pill");
    }

    fn announce_consumption(&mut self, player: &P, consumption: &Consumption) {
        println!("[ ** ] {} swallowed a {} pill: {}", player.name(), consumption.pill.shape, consumption.pill.kind);
        if let Some(ref progress) = consumption.quest {
            if progress.just_completed {
                println!("[ ** ] {} completed their quest", player.name());
            } else if progress.was_reset {
                println!("[ ** ] {} lost their quest progress", player.name());
            }
        }
    }

    fn resolve_consumption(&mut self, player: &P, pill: &Pill) -> Vec<P> {
        let config = self.config;
        let vitals = self.vitals.entry(player.name().to_owned()).or_insert_with(|| Vitals::new(&config));
        let result = vitals.apply(&pill.stats);
        if result.damage_dealt > 0 {
            println!("[ ** ] {} loses {} resistance", player.name(), result.damage_dealt);
        }
        if result.heal_received > 0 {
            println!("[ ** ] {} regains {} resistance", player.name(), result.heal_received);
        }
        if result.collapsed {
            println!("[ ** ] {} collapses", player.name());
        }
        if result.eliminated {
            vec![player.clone()]
        } else {
            println!("[ ** ] {}: {} lives, {} resistance", player.name(), vitals.lives, vitals.resistance);
            Vec::default()
        }
    }

    fn announce_eliminations(&mut self, eliminated: &[P]) {
        for player in eliminated {
            println!("[ ** ] {} is out", player.name());
        }
    }

    fn announce_winner(&mut self, winner: Option<&P>) {
        match winner {
            Some(player) => println!("[ ** ] {} wins", player.name()),
            None => println!("[ ** ] nobody survived")
        }
    }
}

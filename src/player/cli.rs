use std::fmt;
use crate::{
    game::{
        PillId,
        PillPool,
        ShapeQuest
    },
    player::Player,
    util
};

/// A player who sends game actions via the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CliPlayer {
    name: String
}

impl CliPlayer {
    /// Creates a new CLI player with the given player name.
    pub fn new(name: String) -> CliPlayer {
        CliPlayer { name }
    }

    fn input_secret(&self, msg: &str) -> String {
        util::input(&format!("@{}: {}", self.name, msg))
    }

    fn print_secret(&self, msg: &str) {
        println!("[ __ ] @{}: {}", self.name, msg);
    }
}

impl Player for CliPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn recv_quest(&self, quest: Option<&ShapeQuest>) {
        match quest {
            Some(quest) => self.print_secret(&format!("your quest: {}", quest)),
            None => self.print_secret("no quest this round")
        }
    }

    fn choose_pill(&self, pool: &PillPool) -> PillId {
        for (idx, pill) in pool.pills().iter().enumerate() {
            self.print_secret(&format!("{}: {}", idx, pill.shape));
        }
        loop {
            let result = self.input_secret("pill to swallow");
            match result.trim().parse::<usize>().ok().and_then(|idx| pool.pills().get(idx)) {
                Some(pill) => break pill.id,
                None => self.print_secret("no such pill")
            }
        }
    }
}

impl fmt::Display for CliPlayer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

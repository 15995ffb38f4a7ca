#![warn(trivial_casts)]
#![deny(unused)]
#![forbid(unused_extern_crates, unused_import_braces)]

use std::path::PathBuf;
use anyhow::Context as _;
use clap::{
    Parser,
    Subcommand
};
use rand::{
    SeedableRng,
    rngs::StdRng
};
use pill_roulette::{
    Config,
    game::{
        self,
        PillPool,
        chances,
        pool_size,
        quest,
        state::Lobby
    },
    handler::CliHandler,
    player::CliPlayer,
    util
};

#[derive(Parser)]
#[command(name = "pillr", version, about = "Pill Roulette progression engine")]
struct Args {
    /// Path to a JSON configuration file. Defaults are used if omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random number generator, for reproducible runs.
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command
}

#[derive(Subcommand)]
enum Command {
    /// Print pool sizes, chances, and compositions for a range of rounds
    Simulate {
        /// Number of rounds to simulate
        #[arg(short, long, default_value_t = 15)]
        rounds: i32
    },
    /// Play a match in the terminal
    Play
}

fn simulate(config: &Config, rounds: i32, rng: &mut StdRng) {
    for round in 1..=rounds {
        let size = pool_size(round, &config.pool);
        println!("[ ** ] round {}: {} pills", round, size);
        let types = chances(round, &config.pill_types);
        let pool = PillPool::generate_with_count(round, size, config, rng);
        for (kind, chance) in types.iter().filter(|&(_, chance)| chance > 0.0) {
            println!("[ ** ]   {:<9} {:>6.2}% x{}", kind, chance, pool.type_counts().get(kind));
        }
        let shapes = pool.shape_counts().iter()
            .filter(|&(_, count)| count > 0)
            .map(|(shape, count)| format!("{} x{}", shape, count))
            .collect::<Vec<_>>();
        println!("[ ** ]   shapes: {}", shapes.join(", "));
        println!("[ ** ]   sample quest: {}", quest::generate(round, pool.shape_counts(), &config.quest, rng));
    }
}

fn play(config: Config, rng: &mut StdRng) -> anyhow::Result<()> {
    let mut lobby = Lobby::default();
    loop {
        let name = util::input("player name [leave blank to finish]");
        if name.is_empty() {
            break;
        }
        if !lobby.sign_up(CliPlayer::new(name)) {
            println!("[ !! ] that name is taken");
        }
    }
    let handler = CliHandler::new(config.vitals);
    game::run_with_config(handler, lobby, config, rng)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = match args.config {
        Some(ref path) => Config::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default()
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy()
    };
    match args.command {
        Command::Simulate { rounds } => simulate(&config, rounds, &mut rng),
        Command::Play => play(config, &mut rng)?
    }
    Ok(())
}

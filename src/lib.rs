//! The progression engine of Pill Roulette, a turn-based game in which players take turns swallowing pills of escalating risk.
//!
//! Per round, the engine computes which pill types and shapes are in play and how likely each is (`game::chances`), turns those chances into exact pool compositions (`game::distribute`, `game::pool_size`), hands out shape quests (`game::quest`), and rotates turns among the surviving players (`game::next_turn`). `game::run` ties it all together into a full match.

#![warn(trivial_casts)]
#![deny(missing_docs)]
#![deny(unused_extern_crates, unused_import_braces)]

pub mod config;
pub mod game;
pub mod handler;
pub mod player;
pub mod util;

pub use crate::{
    config::Config,
    game::run
};

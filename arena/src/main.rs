//! Arena - plays one game between two search players
//!
//! Builds both players from their labels, plays the game to the end and
//! prints the result in the fixed format the result aggregation scripts
//! read: `Game over. Winner is N` (0 for a draw).

use anyhow::Result;
use clap::Parser;
use games_breakthrough::Breakthrough;
use games_tictactoe::TicTacToe;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{error, info};

mod config;
mod game;
mod label;

use crate::config::{Args, CENTRAL_CONFIG};
use crate::game::{play_game, GameKind, MatchOptions};
use crate::label::{base_config, parse_label};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    init_tracing(&args.log_level)?;
    info!(log_level = %args.log_level, "Tracing initialized");

    let base = base_config(&CENTRAL_CONFIG.search, args.time_limit);
    let p1 = parse_label(&args.p1, &base)?;
    let p2 = parse_label(&args.p2, &base)?;
    let game = args.game_kind()?;

    println!("Starting game simulation...");
    println!("P1: {p1}");
    println!("P2: {p2}");
    println!();

    info!(
        game = %game,
        seed = args.seed,
        time_limit = args.time_limit,
        "Starting match {} vs {}",
        p1,
        p2
    );

    let options = MatchOptions {
        print_board: args.print_board(),
        max_plies: args.max_plies,
    };
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);

    let result = match game {
        GameKind::TicTacToe => play_game(TicTacToe::new(), &p1, &p2, &options, &mut rng),
        GameKind::Breakthrough => play_game(Breakthrough::new(), &p1, &p2, &options, &mut rng),
    };

    match result {
        Ok(outcome) => {
            info!(plies = outcome.plies, winner = outcome.winner_id(), "Match finished");
            println!("Game over. Winner is {}", outcome.winner_id());
            Ok(())
        }
        Err(e) => {
            error!("Match failed: {:#}", e);
            Err(e)
        }
    }
}

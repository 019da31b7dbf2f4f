//! Plays one game between two search players.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use engine_core::{GameBoard, Player};
use mcts::{create_player, SearchPlayer};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::label::PlayerSpec;

/// Games the arena can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    TicTacToe,
    Breakthrough,
}

impl FromStr for GameKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tictactoe" | "tic-tac-toe" => Ok(GameKind::TicTacToe),
            "breakthrough" => Ok(GameKind::Breakthrough),
            other => Err(anyhow!("unknown game '{other}', expected tictactoe or breakthrough")),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::TicTacToe => f.write_str("tictactoe"),
            GameKind::Breakthrough => f.write_str("breakthrough"),
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Option<Player>,
    pub plies: u32,
}

impl Outcome {
    /// Winner's id, `0` for a draw.
    pub fn winner_id(&self) -> u8 {
        self.winner.map_or(0, Player::id)
    }
}

pub struct MatchOptions {
    pub print_board: bool,
    pub max_plies: u32,
}

/// Play `board` to the end, `p1` moving for player one.
pub fn play_game<B>(
    mut board: B,
    p1: &PlayerSpec,
    p2: &PlayerSpec,
    options: &MatchOptions,
    rng: &mut ChaCha20Rng,
) -> Result<Outcome>
where
    B: GameBoard + fmt::Display + 'static,
{
    let mut players: [Box<dyn SearchPlayer<B>>; 2] = [
        create_player(p1.policy, p1.config.clone()).with_context(|| format!("player 1 ({p1})"))?,
        create_player(p2.policy, p2.config.clone()).with_context(|| format!("player 2 ({p2})"))?,
    ];

    let mut plies = 0;
    while !board.is_terminal() && plies < options.max_plies {
        if options.print_board {
            println!("{board}");
        }

        let side = board.side_to_move();
        let player = &mut players[side.index()];
        let result = player
            .search(&board, rng)
            .with_context(|| format!("search failed for player {side} at ply {plies}"))?;

        info!(
            ply = plies,
            player = %side,
            mv = %result.best_move,
            value = result.value,
            simulations = result.simulations,
            playouts = result.playouts,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "move"
        );
        if let Some(winner) = result.proven_winner {
            debug!(ply = plies, winner = %winner, "position proven");
        }

        board.apply_move(result.best_move, false)?;
        plies += 1;
    }

    if options.print_board {
        println!("{board}");
    }

    Ok(Outcome {
        winner: board.winner(),
        plies,
    })
}

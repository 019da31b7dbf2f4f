//! TicTacToe board for the search engine
//!
//! A small reference implementation of the `GameBoard` contract: full move
//! generation, draw detection, incremental Zobrist fingerprints, a line
//! counting evaluation and a playout heuristic that takes wins and blocks
//! losses.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::GameBoard;
//! use games_tictactoe::{Action, TicTacToe};
//!
//! let mut board = TicTacToe::new();
//! board.apply_move(Action::Place(4), false).unwrap();
//! assert_eq!(board.expand_moves().len(), 8);
//! ```

use std::fmt;

use engine_core::game_utils::{line_winner, score_for};
use engine_core::{GameBoard, IllegalMove, Player, ZobristKeys};
use once_cell::sync::Lazy;

/// Winning lines (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

const ZOBRIST_SEED: u64 = 0x7107_7AC7_0E00_0001;

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| ZobristKeys::new(9, 2, ZOBRIST_SEED));

/// TicTacToe move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Place a piece at the given position (0-8)
    Place(u8),
}

impl Action {
    pub fn position(&self) -> u8 {
        match self {
            Action::Place(pos) => *pos,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position())
    }
}

/// TicTacToe position
///
/// X (player one) moves first. The fingerprint is kept incrementally:
/// one key per (cell, piece) plus the side-to-move key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToe {
    /// 0=empty, 1=X, 2=O
    board: [u8; 9],
    to_move: Player,
    winner: Option<Player>,
    moves_played: u8,
    hash: u64,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [0; 9],
            to_move: Player::One,
            winner: None,
            moves_played: 0,
            hash: KEYS.side(Player::One),
        }
    }

    /// Position after playing `positions` from the empty board.
    pub fn from_moves(positions: &[u8]) -> Result<Self, IllegalMove> {
        let mut board = Self::new();
        for &pos in positions {
            board.apply_move(Action::Place(pos), false)?;
        }
        Ok(board)
    }

    /// Cell contents: 0=empty, 1=X, 2=O
    pub fn cells(&self) -> &[u8; 9] {
        &self.board
    }

    pub fn moves_played(&self) -> u8 {
        self.moves_played
    }

    pub fn is_full(&self) -> bool {
        self.moves_played == 9
    }

    /// Fingerprint recomputed from scratch.
    pub fn full_hash(&self) -> u64 {
        self.board
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell != 0)
            .fold(KEYS.side(self.to_move), |h, (sq, &cell)| {
                h ^ KEYS.piece(sq, cell as usize - 1)
            })
    }

    fn empty_cells(&self) -> impl Iterator<Item = u8> + '_ {
        (0..9u8).filter(move |&pos| self.board[pos as usize] == 0)
    }

    /// Empty cell that completes a line for `player`.
    fn completing_move(&self, player: Player) -> Option<u8> {
        let id = player.id();
        self.empty_cells().find(|&pos| {
            LINES.iter().any(|line| {
                line.contains(&(pos as usize))
                    && line
                        .iter()
                        .filter(|&&sq| sq != pos as usize)
                        .all(|&sq| self.board[sq] == id)
            })
        })
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoard for TicTacToe {
    type Move = Action;

    fn expand_moves(&self) -> Vec<Action> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_cells().map(Action::Place).collect()
    }

    /// With heuristics: take a win if there is one, otherwise block the
    /// opponent's win, otherwise any cell.
    fn playout_moves(&self, use_heuristics: bool) -> Vec<Action> {
        if use_heuristics && !self.is_terminal() {
            if let Some(pos) = self
                .completing_move(self.to_move)
                .or_else(|| self.completing_move(self.to_move.opponent()))
            {
                return vec![Action::Place(pos)];
            }
        }
        self.expand_moves()
    }

    fn apply_move(&mut self, mv: Action, _early_termination: bool) -> Result<(), IllegalMove> {
        let pos = mv.position() as usize;
        if self.is_terminal() || pos >= 9 || self.board[pos] != 0 {
            return Err(IllegalMove::new(mv, self.hash));
        }

        let player = self.to_move;
        self.board[pos] = player.id();
        self.moves_played += 1;
        self.hash ^= KEYS.piece(pos, player.index());
        self.winner = line_winner(&self.board, &LINES);

        self.hash ^= KEYS.side(player) ^ KEYS.side(player.opponent());
        self.to_move = player.opponent();
        Ok(())
    }

    fn fingerprint(&self) -> u64 {
        self.hash
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }

    fn side_to_move(&self) -> Player {
        self.to_move
    }

    /// Lines still open to one side, weighted by how full they are.
    fn evaluate(&self, viewer: Player) -> i32 {
        if let Some(w) = self.winner {
            return score_for(100, w, viewer);
        }
        let (mine, theirs) = (viewer.id(), viewer.opponent().id());
        LINES
            .iter()
            .map(|line| {
                let own = line.iter().filter(|&&sq| self.board[sq] == mine).count() as i32;
                let opp = line.iter().filter(|&&sq| self.board[sq] == theirs).count() as i32;
                match (own, opp) {
                    (0, 0) => 0,
                    (n, 0) => n * n * 5,
                    (0, n) => -n * n * 5,
                    _ => 0,
                }
            })
            .sum()
    }

    /// Centre, then corners, then edges.
    fn prior_win_rate(&self, _viewer: Player, mv: Action) -> f64 {
        match mv.position() {
            4 => 0.6,
            0 | 2 | 6 | 8 => 0.55,
            _ => 0.45,
        }
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let line: String = (0..3)
                .map(|col| match self.board[row * 3 + col] {
                    1 => 'X',
                    2 => 'O',
                    _ => '.',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;

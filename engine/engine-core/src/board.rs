//! Board contract the search engine is written against.
//!
//! Games implement [`GameBoard`] with their own move type. The engine never
//! inspects a move; it only lists, applies, compares and prints them. Positions
//! are identified by their 64-bit fingerprint, so two boards reached through
//! different move orders must fingerprint identically when they are the same
//! position with the same side to move.

use std::fmt;

use crate::player::Player;

/// Raised when a board is asked to play a move that is not legal in the
/// current position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal move {mv} in position {fingerprint:#018x}")]
pub struct IllegalMove {
    pub mv: String,
    pub fingerprint: u64,
}

impl IllegalMove {
    pub fn new(mv: impl fmt::Display, fingerprint: u64) -> Self {
        Self {
            mv: mv.to_string(),
            fingerprint,
        }
    }
}

/// Two-player, zero-sum, perfect-information game position.
///
/// # Terminal positions
///
/// A position is terminal when [`is_terminal`](GameBoard::is_terminal) is true.
/// The default treats a position as terminal exactly when it has a winner;
/// games with draws override it. A terminal position without a winner is a
/// draw. A non-terminal position must always have at least one legal move.
pub trait GameBoard: Clone + fmt::Debug {
    /// Move representation. Small and copyable.
    type Move: Copy + Eq + fmt::Debug + fmt::Display;

    /// Every legal move in the current position, in a stable order.
    fn expand_moves(&self) -> Vec<Self::Move>;

    /// Candidate moves for a random playout.
    ///
    /// With `use_heuristics` the game may return a biased subset or repeat
    /// moves to weight them. Without it this is the same list as
    /// [`expand_moves`](GameBoard::expand_moves).
    fn playout_moves(&self, use_heuristics: bool) -> Vec<Self::Move>;

    /// Play `mv` for the side to move.
    ///
    /// `early_termination` lets games keep the incremental bookkeeping their
    /// [`evaluate`](GameBoard::evaluate) needs; games without such state ignore it.
    fn apply_move(&mut self, mv: Self::Move, early_termination: bool) -> Result<(), IllegalMove>;

    /// 64-bit position identity, including the side to move.
    fn fingerprint(&self) -> u64;

    /// The winner, if the game is decided.
    fn winner(&self) -> Option<Player>;

    /// The player whose turn it is.
    fn side_to_move(&self) -> Player;

    /// Heuristic score of the position from `viewer`'s point of view.
    /// Positive favours `viewer`.
    fn evaluate(&self, viewer: Player) -> i32;

    /// Prior probability in `[0, 1]` that `mv` wins for `viewer`.
    fn prior_win_rate(&self, _viewer: Player, _mv: Self::Move) -> f64 {
        0.5
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }
}

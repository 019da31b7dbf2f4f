//! Random playouts and the tallies they produce.

use engine_core::{GameBoard, Player};
use rand::Rng;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Playout tally passed up the tree during one descent.
///
/// `visits` counts outcomes, `budget_used` counts the playouts actually run.
/// They differ when a proven loss is recorded as an outcome without a
/// playout behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayoutStats {
    pub visits: f64,
    pub wins: [f64; 2],
    pub budget_used: u64,
}

impl PlayoutStats {
    /// Count a playout that ended with `winner`, weighted by `weight`.
    pub fn record_playout(&mut self, winner: Option<Player>, weight: f64) {
        self.record_outcome(winner, weight);
        self.budget_used += 1;
    }

    /// Count `count` playouts that all ended with `winner`.
    pub fn record_playouts(&mut self, winner: Option<Player>, count: u64) {
        self.visits += count as f64;
        if let Some(w) = winner {
            self.wins[w.index()] += count as f64;
        }
        self.budget_used += count;
    }

    /// Count an outcome that consumed no budget.
    pub fn record_outcome(&mut self, winner: Option<Player>, weight: f64) {
        self.visits += 1.0;
        if let Some(w) = winner {
            self.wins[w.index()] += weight;
        }
    }

    pub fn merge(&mut self, other: &PlayoutStats) {
        self.visits += other.visits;
        self.wins[0] += other.wins[0];
        self.wins[1] += other.wins[1];
        self.budget_used += other.budget_used;
    }

    /// Wins minus losses for `viewer`.
    #[inline]
    pub fn score(&self, viewer: Player) -> f64 {
        self.wins[viewer.index()] - self.wins[viewer.opponent().index()]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visits == 0.0
    }
}

/// How a playout ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayoutResult {
    pub winner: Option<Player>,
    /// Cut at the termination depth and scored by evaluation.
    pub interrupted: bool,
    pub plies: u32,
}

/// Play random moves from `board` until the game ends or, with early
/// termination, until `termination_depth` plies have been played.
///
/// An interrupted playout is a win for whichever side the evaluation favours
/// beyond the threshold, otherwise a draw. The evaluation is taken from the
/// point of view of the side to move where the playout started.
pub fn playout<B, R>(
    board: &mut B,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<PlayoutResult, SearchError>
where
    B: GameBoard,
    R: Rng + ?Sized,
{
    let viewer = board.side_to_move();
    let mut plies = 0;

    loop {
        if board.is_terminal() {
            return Ok(PlayoutResult {
                winner: board.winner(),
                interrupted: false,
                plies,
            });
        }

        let moves = board.playout_moves(config.heuristics);
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves {
                fingerprint: board.fingerprint(),
            });
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.apply_move(mv, config.early_termination)?;
        plies += 1;

        if config.early_termination && plies >= config.termination_depth && !board.is_terminal() {
            let eval = board.evaluate(viewer);
            let winner = if eval > config.termination_threshold {
                Some(viewer)
            } else if eval < -config.termination_threshold {
                Some(viewer.opponent())
            } else {
                None
            };
            return Ok(PlayoutResult {
                winner,
                interrupted: true,
                plies,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_playout() {
        let mut stats = PlayoutStats::default();
        stats.record_playout(Some(Player::One), 1.0);
        stats.record_playout(None, 1.0);
        stats.record_playout(Some(Player::Two), 1.3);

        assert_eq!(stats.visits, 3.0);
        assert_eq!(stats.budget_used, 3);
        assert!((stats.score(Player::One) - (1.0 - 1.3)).abs() < 1e-9);
    }

    #[test]
    fn test_outcome_uses_no_budget() {
        let mut stats = PlayoutStats::default();
        stats.record_outcome(Some(Player::Two), 1.0);
        assert_eq!(stats.visits, 1.0);
        assert_eq!(stats.budget_used, 0);
        assert!(!stats.is_empty());
    }

    #[test]
    fn test_merge() {
        let mut a = PlayoutStats::default();
        a.record_playouts(Some(Player::One), 4);
        let mut b = PlayoutStats::default();
        b.record_playouts(None, 2);
        a.merge(&b);

        assert_eq!(a.visits, 6.0);
        assert_eq!(a.wins, [4.0, 0.0]);
        assert_eq!(a.budget_used, 6);
    }
}

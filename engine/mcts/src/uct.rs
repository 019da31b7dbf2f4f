//! UCT with optional solver, node priors and implicit minimax.

use std::time::Instant;

use engine_core::GameBoard;
use rand::Rng;
use tracing::debug;

use crate::budget::Budget;
use crate::error::SearchError;
use crate::node::NodeId;
use crate::playout::PlayoutStats;
use crate::record::INF;
use crate::search::Search;

/// Selection score of an unvisited child. Beats any visited child.
const UNVISITED_SCORE: f64 = 100.0;
/// Scale of the random tie-breaker on visited children.
const TIE_BREAK: f64 = 1e-4;
/// Interval, in descents, between principal-variation logs.
const PV_LOG_INTERVAL: u64 = 5000;

impl<B: GameBoard> Search<'_, B> {
    /// Run descents from the root until `budget` is used up or the root is
    /// proven. Returns the number of descents.
    pub fn run_uct(&mut self, board: &B, budget: Budget) -> Result<u64, SearchError> {
        let start = Instant::now();
        let root = self.tree.root();
        let mut simulations = 0u64;

        loop {
            let done = match budget {
                Budget::Simulations(n) => simulations >= n,
                Budget::Time(limit) => start.elapsed() >= limit,
            };
            if done {
                break;
            }
            simulations += 1;

            let mut tally = PlayoutStats::default();
            let mut scratch = board.clone();
            if self.uct(root, &mut scratch, &mut tally)?.is_infinite() {
                break;
            }
            if self.config.debug && simulations % PV_LOG_INTERVAL == 0 {
                debug!(simulations, pv = %self.principal_variation(), "uct progress");
            }
        }
        Ok(simulations)
    }

    /// One descent from `id`, with `board` positioned at `id`.
    ///
    /// Plays a move on `board` per level. Every record on the path is
    /// updated with the same tally, so `tally` holds the outcome counted
    /// during this descent when it returns. The result is in the frame of
    /// the player who moved into `id`; `+/-INF` when a proof was reached.
    pub(crate) fn uct(
        &mut self,
        id: NodeId,
        board: &mut B,
        tally: &mut PlayoutStats,
    ) -> Result<f64, SearchError> {
        self.check_fingerprint(id, board)?;

        if !self.tree.get(id).expanded && self.expand(id, board)?.is_some() {
            self.solver_check(id, INF)?;
        }
        if self.is_solved(id) {
            return Ok(self.value(id));
        }

        let player = self.tree.get(id).player;

        if self.tree.get(id).is_terminal() {
            let winner = board.winner();
            tally.record_playout(winner, 1.0);
            self.update_stats(id, tally)?;
            return Ok(tally.score(player.opponent()));
        }

        let child = self.select_uct(id)?;
        let r = if self.is_solved(child) {
            self.value(child)
        } else {
            board.apply_move(self.child_move(child)?, self.config.early_termination)?;
            if self.tree.get(child).simulated {
                self.uct(child, board, tally)?
            } else {
                let result = self.playout(board)?;
                let weight = self.playout_weight(&result);
                tally.record_playout(result.winner, weight);
                self.update_stats(child, tally)?;
                self.tree.get_mut(child).simulated = true;
                tally.score(player)
            }
        };

        // the position may have been proven below through a transposition
        if self.is_solved(id) {
            return Ok(self.value(id));
        }

        if r.is_infinite() {
            if self.solver_check(id, r)? {
                return Ok(self.value(id));
            }
            // one proven child: count a single outcome for it
            let winner = if r > 0.0 { player } else { player.opponent() };
            tally.record_outcome(Some(winner), 1.0);
            self.update_stats(id, tally)?;
            return Ok(tally.score(player.opponent()));
        }

        self.update_stats(id, tally)?;
        if self.config.implicit_minimax {
            self.back_up_minimax(id);
        }
        Ok(-r)
    }

    /// Pick the child to descend into.
    ///
    /// Proven wins are taken at once, unvisited children come next, proven
    /// losses last. Everything else competes on
    /// `value + C * sqrt(ln(N) / n)` with a small random tie-breaker.
    pub(crate) fn select_uct(&mut self, id: NodeId) -> Result<NodeId, SearchError> {
        let children = self.tree.get(id).children.clone();
        if children.is_empty() {
            return Err(SearchError::NoSelectableChild {
                fingerprint: self.tree.get(id).fingerprint,
            });
        }

        let parent_visits = if self.config.node_priors {
            children.iter().map(|&c| self.visits(c)).sum::<f64>()
        } else {
            self.visits(id)
        };
        let log_visits = parent_visits.max(1.0).ln();

        let minimax_range = if self.config.implicit_minimax {
            let values = children.iter().filter_map(|&c| self.record(c).aux_value());
            let (lo, hi) = values.fold((i32::MAX, i32::MIN), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            (lo < hi).then_some((lo, hi))
        } else {
            None
        };

        let mut selected = None;
        let mut best = f64::NEG_INFINITY;

        for child in children {
            let value = self.value(child);
            if value == INF {
                return Ok(child);
            }
            let visits = self.visits(child);
            let jitter: f64 = self.rng.gen();

            let score = if value == -INF {
                f64::NEG_INFINITY
            } else if visits <= 0.0 {
                UNVISITED_SCORE + jitter
            } else {
                let mut mean = value;
                let aux = self.record(child).aux_value();
                if let (Some((lo, hi)), Some(aux)) = (minimax_range, aux) {
                    let span = f64::from(hi) - f64::from(lo);
                    let scaled = 2.0 * (f64::from(aux) - f64::from(lo)) / span - 1.0;
                    mean = (1.0 - self.config.im_alpha) * mean + self.config.im_alpha * scaled;
                }
                mean + self.config.exploration * (log_visits / visits).sqrt() + jitter * TIE_BREAK
            };

            if selected.is_none() || score > best {
                selected = Some(child);
                best = score;
            }
        }

        selected.ok_or(SearchError::NoSelectableChild {
            fingerprint: self.tree.get(id).fingerprint,
        })
    }

    /// Refresh the node's minimax score from its children.
    fn back_up_minimax(&mut self, id: NodeId) {
        let best = self
            .tree
            .get(id)
            .children
            .iter()
            .filter_map(|&c| self.record(c).aux_value())
            .max();
        if let Some(best) = best {
            self.record_mut(id).set_aux_value(-best);
        }
    }
}

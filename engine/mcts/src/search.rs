//! Search state shared by the UCT, SHOT and hybrid policies.
//!
//! A [`Search`] owns the tree for one move decision and borrows the
//! player's transposition table, configuration and RNG. The policies are
//! implemented as further `impl` blocks in `uct.rs`, `shot.rs` and
//! `solver.rs`.
//!
//! # Value convention
//!
//! A node's value is the mean of its record from the point of view of the
//! player who moved into it. Descents return values in that same frame, so
//! a parent reads a child's result directly as its own side-to-move's score
//! and hands `-r` to its own parent.

use engine_core::{GameBoard, Player};
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::node::{NodeId, SearchNode};
use crate::playout::{self, PlayoutResult, PlayoutStats};
use crate::record::{Record, INF};
use crate::table::TranspositionTable;
use crate::tree::SearchTree;

pub struct Search<'a, B: GameBoard> {
    pub(crate) tree: SearchTree<B::Move>,
    pub(crate) table: &'a mut TranspositionTable,
    pub(crate) config: &'a SearchConfig,
    pub(crate) rng: &'a mut ChaCha20Rng,
    playouts: u64,
    weighted_playouts: bool,
}

impl<'a, B: GameBoard> Search<'a, B> {
    /// Start a search rooted at `board`. The root's record is created if the
    /// table has not seen the position yet.
    pub fn new(
        board: &B,
        table: &'a mut TranspositionTable,
        config: &'a SearchConfig,
        rng: &'a mut ChaCha20Rng,
    ) -> Self {
        let fingerprint = board.fingerprint();
        let record = table.ensure(fingerprint);
        let root = SearchNode::new_root(board.side_to_move(), fingerprint, record);
        Self {
            tree: SearchTree::new(root),
            table,
            config,
            rng,
            playouts: 0,
            weighted_playouts: false,
        }
    }

    /// Weight real-terminal playouts by `early_term_win_value` when early
    /// termination is on. Only plain UCT uses this.
    pub fn with_weighted_playouts(mut self, enabled: bool) -> Self {
        self.weighted_playouts = enabled;
        self
    }

    #[inline]
    pub fn tree(&self) -> &SearchTree<B::Move> {
        &self.tree
    }

    #[inline]
    pub fn table(&self) -> &TranspositionTable {
        self.table
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        self.config
    }

    /// Playouts run so far.
    #[inline]
    pub fn playouts(&self) -> u64 {
        self.playouts
    }

    #[inline]
    pub fn record(&self, id: NodeId) -> &Record {
        self.table.record(self.tree.get(id).record)
    }

    #[inline]
    pub(crate) fn record_mut(&mut self, id: NodeId) -> &mut Record {
        let record = self.tree.get(id).record;
        self.table.record_mut(record)
    }

    /// Value of `id` for the player who moved into it.
    #[inline]
    pub fn value(&self, id: NodeId) -> f64 {
        self.record(id).mean(self.tree.get(id).mover())
    }

    #[inline]
    pub fn visits(&self, id: NodeId) -> f64 {
        self.record(id).visits()
    }

    #[inline]
    pub fn is_solved(&self, id: NodeId) -> bool {
        self.record(id).is_solved()
    }

    pub fn child_move(&self, id: NodeId) -> Result<B::Move, SearchError> {
        let node = self.tree.get(id);
        node.mv.ok_or(SearchError::NoSelectableChild {
            fingerprint: node.fingerprint,
        })
    }

    pub(crate) fn check_fingerprint(&self, id: NodeId, board: &B) -> Result<(), SearchError> {
        let expected = self.tree.get(id).fingerprint;
        let actual = board.fingerprint();
        if expected != actual {
            return Err(SearchError::FingerprintMismatch { expected, actual });
        }
        Ok(())
    }

    /// Add a tally to the node's record.
    pub(crate) fn update_stats(
        &mut self,
        id: NodeId,
        stats: &PlayoutStats,
    ) -> Result<(), SearchError> {
        self.record_mut(id).update_stats(stats.visits, stats.wins)
    }

    pub(crate) fn set_solved(&mut self, id: NodeId, winner: Player) -> Result<(), SearchError> {
        trace!(
            fingerprint = self.tree.get(id).fingerprint,
            winner = %winner,
            "position proven"
        );
        self.record_mut(id).set_solved(winner)
    }

    /// Run one playout from `board`, counting it.
    pub(crate) fn playout(&mut self, board: &mut B) -> Result<PlayoutResult, SearchError> {
        self.playouts += 1;
        playout::playout(board, self.config, &mut *self.rng)
    }

    /// Weight of a playout's win in UCT statistics.
    pub(crate) fn playout_weight(&self, result: &PlayoutResult) -> f64 {
        if self.weighted_playouts && self.config.early_termination && !result.interrupted {
            self.config.early_term_win_value
        } else {
            1.0
        }
    }

    /// Generate the children of `id`.
    ///
    /// With the solver on, children that are already decided are marked
    /// solved on the spot. Returns a child that is a proven win for the side
    /// to move at `id`, if there is one. A decided position expands to no
    /// children.
    pub(crate) fn expand(&mut self, id: NodeId, board: &B) -> Result<Option<NodeId>, SearchError> {
        self.tree.get_mut(id).expanded = true;
        if board.is_terminal() {
            return Ok(None);
        }

        let moves = board.expand_moves();
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves {
                fingerprint: board.fingerprint(),
            });
        }

        let player = self.tree.get(id).player;
        let mut winning_child = None;
        let mut best_aux: Option<i32> = None;

        for mv in moves {
            let mut next = board.clone();
            next.apply_move(mv, self.config.early_termination)?;
            let fingerprint = next.fingerprint();
            let record = self.table.ensure(fingerprint);
            let child = self.tree.add_child(
                id,
                SearchNode::new_child(player.opponent(), mv, fingerprint, record),
            );

            if self.config.solver && !self.is_solved(child) {
                if let Some(winner) = next.winner() {
                    self.set_solved(child, winner)?;
                }
            }
            if self.record(child).solved_by() == Some(player) && winning_child.is_none() {
                winning_child = Some(child);
            }

            if self.config.node_priors
                && next.winner().is_none()
                && !self.is_solved(child)
                && self.visits(child) == 0.0
            {
                let visits = f64::from(self.config.prior_visits);
                let rate = board.prior_win_rate(player, mv).clamp(0.0, 1.0);
                self.record_mut(child).init_prior(rate * visits, player, visits)?;
            }

            if self.config.implicit_minimax {
                let score = next.evaluate(player);
                self.record_mut(child).set_aux_value(score);
                best_aux = Some(best_aux.map_or(score, |b| b.max(score)));
            }
        }

        if let Some(best) = best_aux {
            self.record_mut(id).set_aux_value(-best);
        }
        Ok(winning_child)
    }

    /// Check the root against `board` and expand it.
    ///
    /// Fails with `NoLegalMoves` when the root is already decided. A root
    /// with an immediately winning move is solved here.
    pub fn prepare_root(&mut self, board: &B) -> Result<(), SearchError> {
        let root = self.tree.root();
        self.check_fingerprint(root, board)?;
        if !self.tree.get(root).expanded {
            if self.expand(root, board)?.is_some() {
                self.solver_check(root, INF)?;
            }
        }
        if self.tree.get(root).is_terminal() {
            return Err(SearchError::NoLegalMoves {
                fingerprint: board.fingerprint(),
            });
        }
        Ok(())
    }

    /// Child with the most visits, proven wins first and proven losses last.
    pub fn most_visited_child(&self, id: NodeId) -> Result<NodeId, SearchError> {
        self.best_child_by(id, |search, child| search.visits(child))
    }

    /// Child with the highest value, proven wins first and proven losses
    /// last (ordered among themselves by visits).
    pub fn highest_value_child(&self, id: NodeId) -> Result<NodeId, SearchError> {
        self.best_child_by(id, |search, child| search.value(child))
    }

    fn best_child_by<F>(&self, id: NodeId, key: F) -> Result<NodeId, SearchError>
    where
        F: Fn(&Self, NodeId) -> f64,
    {
        let node = self.tree.get(id);
        let mut best: Option<(NodeId, (u8, f64))> = None;

        for &child in &node.children {
            let value = self.value(child);
            let rank = if value == INF {
                (2, self.visits(child))
            } else if value == -INF {
                (0, self.visits(child))
            } else {
                (1, key(self, child))
            };
            let better = match best {
                None => true,
                Some((_, current)) => {
                    rank.0 > current.0 || (rank.0 == current.0 && rank.1 > current.1)
                }
            };
            if better {
                best = Some((child, rank));
            }
        }

        best.map(|(child, _)| child)
            .ok_or(SearchError::NoSelectableChild {
                fingerprint: node.fingerprint,
            })
    }

    /// Moves along the most visited line from the root, space separated.
    pub fn principal_variation(&self) -> String {
        let mut line = Vec::new();
        let mut current = self.tree.root();
        while let Ok(child) = self.most_visited_child(current) {
            line.push(self.tree.move_label(child));
            if self.is_solved(child) {
                break;
            }
            current = child;
        }
        line.join(" ")
    }
}

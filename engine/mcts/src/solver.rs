//! Proof propagation.
//!
//! A child result of `+INF` means the side to move has a winning move, so
//! the node is a proven win for it. `-INF` proves the node only when every
//! child is a proven loss for the side to move; otherwise the caller counts
//! a single loss and keeps searching.

use engine_core::GameBoard;

use crate::error::SearchError;
use crate::node::NodeId;
use crate::record::INF;
use crate::search::Search;

impl<B: GameBoard> Search<'_, B> {
    /// Every child of `id` is a proven loss for its side to move.
    pub(crate) fn all_children_lost(&self, id: NodeId) -> bool {
        self.tree
            .get(id)
            .children
            .iter()
            .all(|&child| self.value(child) == -INF)
    }

    /// Try to prove `id` from a child result `r`, given in the frame of the
    /// side to move at `id`. Returns whether `id` is now solved.
    pub(crate) fn solver_check(&mut self, id: NodeId, r: f64) -> Result<bool, SearchError> {
        if !self.config.solver {
            return Ok(false);
        }
        let player = self.tree.get(id).player;
        if r == INF {
            self.set_solved(id, player)?;
            return Ok(true);
        }
        if r == -INF && self.all_children_lost(id) {
            self.set_solved(id, player.opponent())?;
            return Ok(true);
        }
        Ok(false)
    }
}

//! Per-position statistics shared through the transposition table.
//!
//! A record belongs to a position, not to a tree node: every node that
//! reaches the same fingerprint reads and writes the same record.

use engine_core::Player;

use crate::error::SearchError;

/// Value of a proven win. A proven loss is `-INF`.
pub const INF: f64 = f64::INFINITY;

/// Index into the record arena of a [`TranspositionTable`](crate::TranspositionTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub u32);

impl RecordId {
    pub const NONE: RecordId = RecordId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Statistics for one position.
#[derive(Debug, Clone)]
pub struct Record {
    fingerprint: u64,
    visits: f64,
    wins: [f64; 2],
    solved_by: Option<Player>,
    budget_spent: u64,
    aux_value: Option<i32>,
    pub(crate) last_touched_epoch: u32,
    pub(crate) touched: bool,
    pub(crate) next: RecordId,
}

impl Record {
    pub(crate) fn new(fingerprint: u64, epoch: u32) -> Self {
        Self {
            fingerprint,
            visits: 0.0,
            wins: [0.0; 2],
            solved_by: None,
            budget_spent: 0,
            aux_value: None,
            last_touched_epoch: epoch,
            touched: true,
            next: RecordId::NONE,
        }
    }

    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Visit count, including virtual prior visits.
    #[inline]
    pub fn visits(&self) -> f64 {
        self.visits
    }

    #[inline]
    pub fn wins(&self, player: Player) -> f64 {
        self.wins[player.index()]
    }

    #[inline]
    pub fn solved_by(&self) -> Option<Player> {
        self.solved_by
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.solved_by.is_some()
    }

    /// Halving budget spent at this position over its lifetime.
    #[inline]
    pub fn budget_spent(&self) -> u64 {
        self.budget_spent
    }

    /// Implicit-minimax score, from the point of view of the player who
    /// moved into this position.
    #[inline]
    pub fn aux_value(&self) -> Option<i32> {
        self.aux_value
    }

    /// Whether the record was read or written since the last pack.
    #[inline]
    pub fn touched(&self) -> bool {
        self.touched
    }

    /// Add `visits` visits with the given per-player wins.
    ///
    /// Draws contribute a visit and no wins, so the mean moves toward zero.
    pub fn update_stats(&mut self, visits: f64, wins: [f64; 2]) -> Result<(), SearchError> {
        if self.solved_by.is_some() {
            return Err(SearchError::UpdateOnSolved {
                fingerprint: self.fingerprint,
            });
        }
        self.visits += visits;
        self.wins[0] += wins[0];
        self.wins[1] += wins[1];
        Ok(())
    }

    /// Mean value from `viewer`'s point of view.
    ///
    /// `+INF` / `-INF` once proven, `0` before the first visit. The means for
    /// the two players always sum to zero.
    pub fn mean(&self, viewer: Player) -> f64 {
        match self.solved_by {
            Some(winner) if winner == viewer => INF,
            Some(_) => -INF,
            None if self.visits <= 0.0 => 0.0,
            None => {
                (self.wins[viewer.index()] - self.wins[viewer.opponent().index()]) / self.visits
            }
        }
    }

    /// Mark the position as a proven win for `winner`. Idempotent for the
    /// same winner.
    pub fn set_solved(&mut self, winner: Player) -> Result<(), SearchError> {
        match self.solved_by {
            Some(previous) if previous != winner => Err(SearchError::ConflictingProof {
                fingerprint: self.fingerprint,
                previous,
                attempted: winner,
            }),
            _ => {
                self.solved_by = Some(winner);
                Ok(())
            }
        }
    }

    /// Seed an unvisited record with `visits` virtual visits of which
    /// `wins` went to `player` and the rest to the opponent.
    pub fn init_prior(
        &mut self,
        wins: f64,
        player: Player,
        visits: f64,
    ) -> Result<(), SearchError> {
        if self.visits > 0.0 {
            return Err(SearchError::PriorOnVisited {
                fingerprint: self.fingerprint,
            });
        }
        self.visits = visits;
        self.wins[player.index()] = wins;
        self.wins[player.opponent().index()] = visits - wins;
        Ok(())
    }

    #[inline]
    pub fn add_budget_spent(&mut self, budget: u64) {
        self.budget_spent += budget;
    }

    #[inline]
    pub fn set_aux_value(&mut self, value: i32) {
        self.aux_value = Some(value);
    }
}

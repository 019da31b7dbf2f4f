//! SHOT: sequential halving applied to trees, and the hybrid variant that
//! hands small budgets to UCT.
//!
//! A call gets a playout budget for one node. The node's arms (children not
//! yet proven) share it over rounds; after each round the arms are sorted
//! by value and the worse half dropped, until one arm remains or the budget
//! is gone. A call never uses more playouts than it was given.

use engine_core::GameBoard;

use crate::error::SearchError;
use crate::node::NodeId;
use crate::playout::PlayoutStats;
use crate::record::INF;
use crate::search::Search;

/// Which halving policy drives a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalvingMode {
    Shot,
    /// Switch a non-root node to UCT when its per-arm budget falls below
    /// `threshold`.
    Hybrid { threshold: u64 },
}

/// Per-arm budget for a round with `arms` arms at a node that started the
/// call with `initial_arms` arms:
/// `max(1, floor((spent + budget) / (arms * ceil(log2(initial_arms)))))`.
pub fn round_budget(spent: u64, budget: u64, arms: usize, initial_arms: usize) -> u64 {
    let rounds = (initial_arms.max(1) as f64).log2().ceil().max(1.0);
    let per_arm = ((spent + budget) as f64 / (arms.max(1) as f64 * rounds)).floor() as u64;
    per_arm.max(1)
}

impl<B: GameBoard> Search<'_, B> {
    /// Run a halving pass at `id` with `budget` playouts.
    ///
    /// `board` is positioned at `id` and left untouched. The playouts used
    /// are added to `stats` and to the node's spent budget. The result is
    /// `+/-INF` when the node was proven, `0` otherwise.
    pub(crate) fn shot(
        &mut self,
        id: NodeId,
        board: &B,
        depth: u32,
        budget: u64,
        mode: HalvingMode,
        stats: &mut PlayoutStats,
    ) -> Result<f64, SearchError> {
        if budget == 0 {
            return Err(SearchError::InvalidBudget {
                fingerprint: self.tree.get(id).fingerprint,
                budget,
            });
        }
        self.check_fingerprint(id, board)?;

        if !self.tree.get(id).expanded
            && self.expand(id, board)?.is_some()
            && self.solver_check(id, INF)?
        {
            return Ok(self.value(id));
        }
        if self.is_solved(id) {
            return Ok(self.value(id));
        }

        let mut local = PlayoutStats::default();
        let result = if self.tree.get(id).is_terminal() {
            local.record_playouts(board.winner(), budget);
            self.update_stats(id, &local)?;
            0.0
        } else {
            self.halve(id, board, depth, budget, mode, &mut local)?
        };

        self.record_mut(id).add_budget_spent(local.budget_used);
        stats.merge(&local);
        Ok(result)
    }

    fn halve(
        &mut self,
        id: NodeId,
        board: &B,
        depth: u32,
        budget: u64,
        mode: HalvingMode,
        local: &mut PlayoutStats,
    ) -> Result<f64, SearchError> {
        if budget == 1 {
            let mut scratch = board.clone();
            let result = self.playout(&mut scratch)?;
            local.record_playout(result.winner, 1.0);
            self.update_stats(id, local)?;
            self.tree.get_mut(id).simulated = true;
            return Ok(0.0);
        }

        let initial_arms = self.tree.get(id).arms.len();
        if initial_arms == 0 {
            return Err(SearchError::NoSelectableChild {
                fingerprint: self.tree.get(id).fingerprint,
            });
        }
        let spent = self.record(id).budget_spent();

        if let HalvingMode::Hybrid { threshold } = mode {
            if depth > 0 && round_budget(spent, budget, initial_arms, initial_arms) < threshold {
                return self.hand_to_uct(id, board, budget, local);
            }
        }

        if spent <= initial_arms as u64 {
            self.cold_start(id, board, budget, local)?;
            if local.budget_used >= budget {
                return Ok(0.0);
            }
        }

        if initial_arms == 1 {
            return self.single_arm(id, board, depth, budget, mode, local);
        }

        if self.visits(id) > initial_arms as f64 {
            self.sort_arms(id, initial_arms);
        }

        let mut arm_count = initial_arms;
        let mut per_arm = round_budget(spent, budget, arm_count, initial_arms);

        loop {
            let mut skipped = 0u64;

            for n in 0..arm_count {
                let arms = &self.tree.get(id).arms;
                let Some(&child) = arms.get(n) else { break };
                let second = arms.get(1).copied();

                let mut r = 0.0;
                let mut assigned = 0u64;
                let mut child_stats = PlayoutStats::default();

                if !self.is_solved(child) {
                    let remaining = budget.saturating_sub(local.budget_used) as i64;
                    let mut target = per_arm as i64 - self.visits(child) as i64;
                    // with two arms left the first takes what the second will not use
                    if arm_count == 2 && n == 0 {
                        if let Some(other) = second {
                            let other_need = per_arm as i64 - self.visits(other) as i64;
                            target = target.max(remaining - other_need);
                        }
                    }
                    let give = target.min(remaining);
                    if give <= 0 {
                        continue;
                    }
                    assigned = give as u64;

                    let mut next = board.clone();
                    next.apply_move(self.child_move(child)?, self.config.early_termination)?;
                    r = self.shot(child, &next, depth + 1, assigned, mode, &mut child_stats)?;
                    local.merge(&child_stats);
                    // a repeated position below may have proven this one
                    if self.is_solved(id) {
                        return Ok(self.value(id));
                    }
                    if !child_stats.is_empty() {
                        self.update_stats(id, &child_stats)?;
                    }
                }

                if self.is_solved(child) {
                    r = self.value(child);
                }
                if r.is_infinite() {
                    if self.solver_check(id, r)? {
                        if r > 0.0 {
                            self.tree.get_mut(id).best_arm = Some(child);
                        }
                        return Ok(self.value(id));
                    }
                    skipped += assigned.saturating_sub(child_stats.budget_used);
                }
                if local.budget_used >= budget {
                    break;
                }
            }

            if self.config.solver {
                self.drop_solved_arms(id);
            }
            let live = self.tree.get(id).arms.len();
            if live > 0 {
                self.sort_arms(id, arm_count.min(live));
            }

            arm_count -= arm_count / 2;
            arm_count = arm_count.min(live);

            if arm_count == 1 {
                per_arm += budget.saturating_sub(local.budget_used);
            } else if arm_count > 1 {
                per_arm += round_budget(spent, budget, arm_count, initial_arms)
                    + skipped.div_ceil(arm_count as u64);
            }

            if arm_count <= 1 || local.budget_used >= budget {
                break;
            }
        }

        let first = self.tree.get(id).arms.first().copied();
        if first.is_some() {
            self.tree.get_mut(id).best_arm = first;
        }
        Ok(0.0)
    }

    /// Give every arm without a playout its first one, while budget lasts.
    fn cold_start(
        &mut self,
        id: NodeId,
        board: &B,
        budget: u64,
        local: &mut PlayoutStats,
    ) -> Result<(), SearchError> {
        let arms = self.tree.get(id).arms.clone();
        for child in arms {
            if local.budget_used >= budget {
                break;
            }
            if self.tree.get(child).simulated || self.is_solved(child) {
                continue;
            }
            let mut next = board.clone();
            next.apply_move(self.child_move(child)?, self.config.early_termination)?;
            let result = self.playout(&mut next)?;

            let mut single = PlayoutStats::default();
            single.record_playout(result.winner, 1.0);
            self.update_stats(child, &single)?;
            self.record_mut(child).add_budget_spent(1);
            self.tree.get_mut(child).simulated = true;

            self.update_stats(id, &single)?;
            local.merge(&single);
        }
        Ok(())
    }

    /// Only one arm left: it gets the whole remaining budget.
    fn single_arm(
        &mut self,
        id: NodeId,
        board: &B,
        depth: u32,
        budget: u64,
        mode: HalvingMode,
        local: &mut PlayoutStats,
    ) -> Result<f64, SearchError> {
        let child = self.tree.get(id).arms[0];
        self.tree.get_mut(id).best_arm = Some(child);

        let remaining = budget.saturating_sub(local.budget_used);
        let mut r = 0.0;
        if !self.is_solved(child) && remaining > 0 {
            let mut next = board.clone();
            next.apply_move(self.child_move(child)?, self.config.early_termination)?;
            let mut child_stats = PlayoutStats::default();
            r = self.shot(child, &next, depth + 1, remaining, mode, &mut child_stats)?;
            local.merge(&child_stats);
            if self.is_solved(id) {
                return Ok(self.value(id));
            }
            if !child_stats.is_empty() {
                self.update_stats(id, &child_stats)?;
            }
        }
        if self.is_solved(child) {
            r = self.value(child);
        }
        if r.is_infinite() && self.solver_check(id, r)? {
            return Ok(self.value(id));
        }
        Ok(0.0)
    }

    /// Spend `budget` UCT descents from `id`.
    fn hand_to_uct(
        &mut self,
        id: NodeId,
        board: &B,
        budget: u64,
        local: &mut PlayoutStats,
    ) -> Result<f64, SearchError> {
        for _ in 0..budget {
            let mut tally = PlayoutStats::default();
            let mut scratch = board.clone();
            let r = self.uct(id, &mut scratch, &mut tally)?;
            local.merge(&tally);
            if r.is_infinite() {
                return Ok(r);
            }
        }
        Ok(0.0)
    }

    /// Sort the first `k` arms by value, best first.
    fn sort_arms(&mut self, id: NodeId, k: usize) {
        let mut arms = std::mem::take(&mut self.tree.get_mut(id).arms);
        let k = k.min(arms.len());
        let mut keyed: Vec<(NodeId, f64)> = arms[..k]
            .iter()
            .map(|&c| (c, self.value(c)))
            .collect();
        keyed.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (slot, (child, _)) in arms.iter_mut().zip(keyed) {
            *slot = child;
        }
        self.tree.get_mut(id).arms = arms;
    }

    fn drop_solved_arms(&mut self, id: NodeId) {
        let arms = std::mem::take(&mut self.tree.get_mut(id).arms);
        let live: Vec<NodeId> = arms
            .into_iter()
            .filter(|&c| !self.is_solved(c))
            .collect();
        self.tree.get_mut(id).arms = live;
    }

    /// Run halving passes from the root until `budget` playouts are used or
    /// the root is proven.
    pub fn run_halving(
        &mut self,
        board: &B,
        budget: u64,
        mode: HalvingMode,
    ) -> Result<PlayoutStats, SearchError> {
        let root = self.tree.root();
        if budget == 0 {
            return Err(SearchError::InvalidBudget {
                fingerprint: self.tree.get(root).fingerprint,
                budget,
            });
        }
        let mut stats = PlayoutStats::default();
        while stats.budget_used < budget {
            let before = stats.budget_used;
            let r = self.shot(root, board, 0, budget - stats.budget_used, mode, &mut stats)?;
            if r.is_infinite() || stats.budget_used == before {
                break;
            }
        }
        Ok(stats)
    }

    /// SHOT's final move choice: the best arm of the last pass, unless a
    /// proven win exists or the best arm is a proven loss.
    pub fn halving_choice(&self, id: NodeId) -> Result<NodeId, SearchError> {
        let fallback = self.highest_value_child(id)?;
        match self.tree.get(id).best_arm {
            Some(arm) if self.value(fallback) != INF && self.value(arm) != -INF => Ok(arm),
            _ => Ok(fallback),
        }
    }
}

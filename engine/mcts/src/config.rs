//! Search configuration parameters.

use crate::error::SearchError;

/// Configuration shared by the UCT, SHOT and hybrid policies.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Exploration constant C in the UCB formula.
    pub exploration: f64,

    /// Per-move limit: milliseconds, or simulations when `fixed_simulations` is set.
    pub limit: u64,

    /// Interpret `limit` as a simulation count instead of a time limit.
    pub fixed_simulations: bool,

    /// Let the board bias playout move choice.
    pub heuristics: bool,

    /// Cut playouts at `termination_depth` plies and score them with the
    /// board evaluation.
    pub early_termination: bool,
    pub termination_depth: u32,
    /// Evaluation beyond +/- this value counts as a decided playout.
    pub termination_threshold: i32,
    /// UCT weight of a playout that reached a real terminal position while
    /// early termination is enabled.
    pub early_term_win_value: f64,

    /// Propagate proven wins and losses.
    pub solver: bool,

    /// Seed fresh records with the board's prior win rate.
    pub node_priors: bool,
    /// Virtual visits behind a node prior.
    pub prior_visits: u32,

    /// Blend a minimax-backed evaluation into UCT selection.
    pub implicit_minimax: bool,
    /// Weight of the minimax term in `[0, 1]`.
    pub im_alpha: f64,

    /// Hybrid: switch a non-root node to UCT when its per-arm budget falls
    /// below this value.
    pub shot_threshold: u64,

    /// Transposition table has `2^table_bits` slots.
    pub table_bits: u32,
    /// Simulations used to calibrate SHOT and hybrid in time mode.
    pub calibration_simulations: u64,
    /// Records untouched for this many decisions are pruned.
    pub pack_offset: u32,

    /// Log a principal variation and per-child statistics while searching.
    pub debug: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: 0.4,
            limit: 10_000,
            fixed_simulations: false,
            heuristics: false,
            early_termination: false,
            termination_depth: 4,
            termination_threshold: 50,
            early_term_win_value: 1.3,
            solver: false,
            node_priors: false,
            prior_visits: 100,
            implicit_minimax: false,
            im_alpha: 0.1,
            shot_threshold: 20,
            table_bits: 22,
            calibration_simulations: 100_000,
            pack_offset: 1,
            debug: false,
        }
    }
}

impl SearchConfig {
    /// Small, deterministic config for tests: fixed simulations, solver on,
    /// a table of 4096 slots.
    pub fn for_testing() -> Self {
        Self {
            limit: 200,
            fixed_simulations: true,
            solver: true,
            table_bits: 12,
            calibration_simulations: 500,
            ..Self::default()
        }
    }

    /// Builder pattern: fixed number of simulations per move.
    pub fn with_simulations(mut self, n: u64) -> Self {
        self.limit = n;
        self.fixed_simulations = true;
        self
    }

    /// Builder pattern: time limit per move in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.limit = ms;
        self.fixed_simulations = false;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_solver(mut self, enabled: bool) -> Self {
        self.solver = enabled;
        self
    }

    pub fn with_heuristics(mut self, enabled: bool) -> Self {
        self.heuristics = enabled;
        self
    }

    /// Builder pattern: enable early termination at `depth` plies.
    pub fn with_early_termination(mut self, depth: u32) -> Self {
        self.early_termination = true;
        self.termination_depth = depth;
        self
    }

    pub fn with_node_priors(mut self, visits: u32) -> Self {
        self.node_priors = true;
        self.prior_visits = visits;
        self
    }

    pub fn with_implicit_minimax(mut self, alpha: f64) -> Self {
        self.implicit_minimax = true;
        self.im_alpha = alpha;
        self
    }

    pub fn with_shot_threshold(mut self, threshold: u64) -> Self {
        self.shot_threshold = threshold;
        self
    }

    pub fn with_table_bits(mut self, bits: u32) -> Self {
        self.table_bits = bits;
        self
    }

    /// Check the configuration before a player accepts it.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            )));
        }
        if self.limit == 0 {
            return Err(SearchError::InvalidConfig(
                "move limit must be positive".to_string(),
            ));
        }
        if self.early_termination && self.termination_depth == 0 {
            return Err(SearchError::InvalidConfig(
                "termination depth must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.im_alpha) {
            return Err(SearchError::InvalidConfig(format!(
                "implicit minimax alpha must be in [0, 1], got {}",
                self.im_alpha
            )));
        }
        if self.node_priors && self.prior_visits == 0 {
            return Err(SearchError::InvalidConfig(
                "node priors need at least one prior visit".to_string(),
            ));
        }
        if !(1..=30).contains(&self.table_bits) {
            return Err(SearchError::InvalidConfig(format!(
                "table bits must be in 1..=30, got {}",
                self.table_bits
            )));
        }
        if self.calibration_simulations == 0 {
            return Err(SearchError::InvalidConfig(
                "calibration needs at least one simulation".to_string(),
            ));
        }
        Ok(())
    }
}

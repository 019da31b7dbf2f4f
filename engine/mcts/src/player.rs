//! Move-choosing players built on the search policies.
//!
//! Each player owns a transposition table that lives for the whole game.
//! After every decision the table is packed, so positions the game has
//! moved away from are dropped while transpositions into the next search
//! keep their statistics.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use engine_core::{GameBoard, Player};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::budget::{halving_simulations, Budget};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::node::NodeId;
use crate::search::Search;
use crate::shot::HalvingMode;
use crate::table::TranspositionTable;

/// The three search policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Uct,
    Shot,
    Hybrid,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Uct => "uct",
            PolicyKind::Shot => "shot",
            PolicyKind::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

impl FromStr for PolicyKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uct" | "mcts" => Ok(PolicyKind::Uct),
            "shot" => Ok(PolicyKind::Shot),
            "hybrid" | "hshot" => Ok(PolicyKind::Hybrid),
            other => Err(SearchError::InvalidConfig(format!("unknown policy '{other}'"))),
        }
    }
}

/// Outcome of one move decision.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub best_move: M,
    /// Value of the chosen move for the side to move at the root.
    pub value: f64,
    /// Set when the root position was proven.
    pub proven_winner: Option<Player>,
    /// UCT descents, or halving budget spent.
    pub simulations: u64,
    pub playouts: u64,
    pub elapsed: Duration,
    /// Records dropped by the pack after this decision.
    pub removed_records: usize,
}

/// A player that picks moves by searching.
pub trait SearchPlayer<B: GameBoard> {
    fn kind(&self) -> PolicyKind;

    fn config(&self) -> &SearchConfig;

    /// Replace the configuration. A new table size starts a fresh table.
    fn configure(&mut self, config: SearchConfig) -> Result<(), SearchError>;

    /// Search `board` and return the decision with its statistics.
    fn search(
        &mut self,
        board: &B,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<B::Move>, SearchError>;

    fn choose_move(&mut self, board: &B, rng: &mut ChaCha20Rng) -> Result<B::Move, SearchError> {
        self.search(board, rng).map(|result| result.best_move)
    }

    fn last_chosen_move(&self) -> Option<B::Move>;

    fn table(&self) -> &TranspositionTable;
}

/// Build the player for `kind`.
pub fn create_player<B: GameBoard + 'static>(
    kind: PolicyKind,
    config: SearchConfig,
) -> Result<Box<dyn SearchPlayer<B>>, SearchError> {
    Ok(match kind {
        PolicyKind::Uct => Box::new(UctPlayer::new(config)?),
        PolicyKind::Shot => Box::new(ShotPlayer::new(config)?),
        PolicyKind::Hybrid => Box::new(HybridPlayer::new(config)?),
    })
}

/// Rebuild `table` when the configured size changed.
fn reconfigure(
    current: &mut SearchConfig,
    table: &mut TranspositionTable,
    config: SearchConfig,
) -> Result<(), SearchError> {
    config.validate()?;
    if config.table_bits != current.table_bits {
        *table = TranspositionTable::new(config.table_bits);
    }
    *current = config;
    Ok(())
}

/// Log the root's children after a decision.
fn log_children<B: GameBoard>(search: &Search<'_, B>, root: NodeId, verbose: bool) {
    for &child in &search.tree().get(root).children {
        let record = search.record(child);
        if verbose {
            debug!(
                mv = %search.tree().move_label(child),
                visits = record.visits(),
                value = search.value(child),
                solved = ?record.solved_by(),
                budget = record.budget_spent(),
                "child"
            );
        } else {
            trace!(
                mv = %search.tree().move_label(child),
                visits = record.visits(),
                value = search.value(child),
                "child"
            );
        }
    }
}

/// UCT player.
#[derive(Debug)]
pub struct UctPlayer<B: GameBoard> {
    config: SearchConfig,
    table: TranspositionTable,
    last_move: Option<B::Move>,
}

impl<B: GameBoard> UctPlayer<B> {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            table: TranspositionTable::new(config.table_bits),
            config,
            last_move: None,
        })
    }
}

impl<B: GameBoard> SearchPlayer<B> for UctPlayer<B> {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Uct
    }

    fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn configure(&mut self, config: SearchConfig) -> Result<(), SearchError> {
        reconfigure(&mut self.config, &mut self.table, config)
    }

    fn search(
        &mut self,
        board: &B,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<B::Move>, SearchError> {
        let start = Instant::now();
        let budget = Budget::from_config(&self.config);

        let mut search =
            Search::new(board, &mut self.table, &self.config, rng).with_weighted_playouts(true);
        search.prepare_root(board)?;
        let root = search.tree().root();
        let simulations = search.run_uct(board, budget)?;

        let best = search.most_visited_child(root)?;
        let best_move = search.child_move(best)?;
        let result = SearchResult {
            best_move,
            value: search.value(best),
            proven_winner: search.record(root).solved_by(),
            simulations,
            playouts: search.playouts(),
            elapsed: start.elapsed(),
            removed_records: 0,
        };

        debug!(
            policy = "uct",
            mv = %best_move,
            value = result.value,
            simulations,
            playouts = result.playouts,
            nodes = search.tree().len(),
            pv = %search.principal_variation(),
            "decision"
        );
        log_children(&search, root, self.config.debug);
        drop(search);

        let removed_records = self.table.pack(self.config.pack_offset);
        self.last_move = Some(best_move);
        Ok(SearchResult {
            removed_records,
            ..result
        })
    }

    fn last_chosen_move(&self) -> Option<B::Move> {
        self.last_move
    }

    fn table(&self) -> &TranspositionTable {
        &self.table
    }
}

/// Shared body of the SHOT and hybrid players.
fn halving_search<B: GameBoard>(
    board: &B,
    table: &mut TranspositionTable,
    config: &SearchConfig,
    mode: HalvingMode,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<B::Move>, SearchError> {
    let start = Instant::now();
    let budget = halving_simulations(board, config, mode, rng)?;

    let mut search = Search::new(board, table, config, rng);
    search.prepare_root(board)?;
    let root = search.tree().root();

    let stats = search.run_halving(board, budget, mode)?;
    let best = search.halving_choice(root)?;
    let best_move = search.child_move(best)?;

    let result = SearchResult {
        best_move,
        value: search.value(best),
        proven_winner: search.record(root).solved_by(),
        simulations: stats.budget_used,
        playouts: search.playouts(),
        elapsed: start.elapsed(),
        removed_records: 0,
    };

    debug!(
        policy = ?mode,
        mv = %best_move,
        value = result.value,
        budget,
        spent = stats.budget_used,
        playouts = result.playouts,
        nodes = search.tree().len(),
        "decision"
    );
    log_children(&search, root, config.debug);
    Ok(result)
}

/// SHOT player.
#[derive(Debug)]
pub struct ShotPlayer<B: GameBoard> {
    config: SearchConfig,
    table: TranspositionTable,
    last_move: Option<B::Move>,
}

impl<B: GameBoard> ShotPlayer<B> {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            table: TranspositionTable::new(config.table_bits),
            config,
            last_move: None,
        })
    }
}

impl<B: GameBoard> SearchPlayer<B> for ShotPlayer<B> {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Shot
    }

    fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn configure(&mut self, config: SearchConfig) -> Result<(), SearchError> {
        reconfigure(&mut self.config, &mut self.table, config)
    }

    fn search(
        &mut self,
        board: &B,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<B::Move>, SearchError> {
        let result = halving_search(board, &mut self.table, &self.config, HalvingMode::Shot, rng)?;
        let removed_records = self.table.pack(self.config.pack_offset);
        self.last_move = Some(result.best_move);
        Ok(SearchResult {
            removed_records,
            ..result
        })
    }

    fn last_chosen_move(&self) -> Option<B::Move> {
        self.last_move
    }

    fn table(&self) -> &TranspositionTable {
        &self.table
    }
}

/// SHOT at the top of the tree, UCT below the budget threshold.
#[derive(Debug)]
pub struct HybridPlayer<B: GameBoard> {
    config: SearchConfig,
    table: TranspositionTable,
    last_move: Option<B::Move>,
}

impl<B: GameBoard> HybridPlayer<B> {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            table: TranspositionTable::new(config.table_bits),
            config,
            last_move: None,
        })
    }

    fn mode(&self) -> HalvingMode {
        HalvingMode::Hybrid {
            threshold: self.config.shot_threshold,
        }
    }
}

impl<B: GameBoard> SearchPlayer<B> for HybridPlayer<B> {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Hybrid
    }

    fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn configure(&mut self, config: SearchConfig) -> Result<(), SearchError> {
        reconfigure(&mut self.config, &mut self.table, config)
    }

    fn search(
        &mut self,
        board: &B,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<B::Move>, SearchError> {
        let mode = self.mode();
        let result = halving_search(board, &mut self.table, &self.config, mode, rng)?;
        let removed_records = self.table.pack(self.config.pack_offset);
        self.last_move = Some(result.best_move);
        Ok(SearchResult {
            removed_records,
            ..result
        })
    }

    fn last_chosen_move(&self) -> Option<B::Move> {
        self.last_move
    }

    fn table(&self) -> &TranspositionTable {
        &self.table
    }
}

//! Monte Carlo game-tree search with a shared transposition table.
//!
//! This crate chooses moves for two-player, perfect-information games that
//! implement the `engine-core` [`GameBoard`](engine_core::GameBoard) trait.
//!
//! # Overview
//!
//! Three interchangeable policies run over the same statistics:
//!
//! 1. **UCT**: one root-to-leaf descent per simulation, children picked by
//!    the UCB1 bound, one random playout at the frontier
//! 2. **SHOT**: sequential halving applied to trees; a node's budget is
//!    split over its children in rounds and the worse half is dropped after
//!    each round
//! 3. **Hybrid**: SHOT near the root, nested UCT once a node's per-arm
//!    budget falls below a threshold
//!
//! All three share a solver that proves forced wins and losses. A proven
//! record is frozen and never simulated again.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{SearchConfig, SearchPlayer, ShotPlayer};
//! use games_tictactoe::TicTacToe;
//! use rand_chacha::ChaCha20Rng;
//! use rand::SeedableRng;
//!
//! let config = SearchConfig::default().with_simulations(2000).with_solver(true);
//! let mut player = ShotPlayer::new(config).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let board = TicTacToe::new();
//! let result = player.search(&board, &mut rng).unwrap();
//! println!("best move: {} (value {:.3})", result.best_move, result.value);
//! ```
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |               SearchPlayer (Uct / Shot / Hybrid)            |
//! +-------------------------------------------------------------+
//! |  Budget controller: fixed simulations, or calibrated time   |
//! |                             |                               |
//! |                             v                               |
//! |  Search: SearchTree (per decision)  -->  TranspositionTable |
//! |          uct / shot / solver           (records, per game)  |
//! +-------------------------------------------------------------+
//! ```

pub mod budget;
pub mod config;
pub mod error;
pub mod node;
pub mod player;
pub mod playout;
pub mod record;
pub mod search;
pub mod shot;
mod solver;
pub mod table;
pub mod tree;
mod uct;

// Re-export main types
pub use budget::{calibrate, Budget, Calibration};
pub use config::SearchConfig;
pub use error::SearchError;
pub use node::{NodeId, SearchNode};
pub use player::{
    create_player, HybridPlayer, PolicyKind, SearchPlayer, SearchResult, ShotPlayer, UctPlayer,
};
pub use playout::{playout, PlayoutResult, PlayoutStats};
pub use record::{Record, RecordId, INF};
pub use search::Search;
pub use shot::{round_budget, HalvingMode};
pub use table::{TableStats, TranspositionTable};
pub use tree::{SearchTree, TreeStats};

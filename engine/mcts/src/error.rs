//! Errors raised by the search core.
//!
//! Every variant is an internal-consistency violation or a collaborator
//! contract violation. None of them is recoverable mid-search.

use engine_core::{IllegalMove, Player};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("fingerprint mismatch: node expects {expected:#018x}, board has {actual:#018x}")]
    FingerprintMismatch { expected: u64, actual: u64 },

    #[error("budget must be positive, got {budget} at {fingerprint:#018x}")]
    InvalidBudget { fingerprint: u64, budget: u64 },

    #[error("statistics update on solved position {fingerprint:#018x}")]
    UpdateOnSolved { fingerprint: u64 },

    #[error("position {fingerprint:#018x} proven for {previous}, cannot prove for {attempted}")]
    ConflictingProof {
        fingerprint: u64,
        previous: Player,
        attempted: Player,
    },

    #[error("prior initialisation on visited position {fingerprint:#018x}")]
    PriorOnVisited { fingerprint: u64 },

    #[error("no selectable child at {fingerprint:#018x}")]
    NoSelectableChild { fingerprint: u64 },

    #[error("no legal moves in non-terminal position {fingerprint:#018x}")]
    NoLegalMoves { fingerprint: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("board error: {0}")]
    Board(#[from] IllegalMove),
}

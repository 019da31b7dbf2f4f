//! Per-move budget: a fixed simulation count or a time limit.
//!
//! UCT can poll a deadline between descents. SHOT and hybrid cannot stop
//! mid-pass, so in time mode they first measure their own playout rate on a
//! scratch table and turn the time limit into a simulation count.

use std::time::{Duration, Instant};

use engine_core::GameBoard;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::search::Search;
use crate::shot::HalvingMode;
use crate::table::TranspositionTable;

/// Largest scratch table used for calibration.
const CALIBRATION_TABLE_BITS: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Simulations(u64),
    Time(Duration),
}

impl Budget {
    pub fn from_config(config: &SearchConfig) -> Self {
        if config.fixed_simulations {
            Budget::Simulations(config.limit)
        } else {
            Budget::Time(Duration::from_millis(config.limit))
        }
    }
}

/// Outcome of a calibration run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub playouts: u64,
    pub elapsed: Duration,
}

impl Calibration {
    /// Simulations that fit into `limit` at the measured rate, at least one.
    pub fn simulations_for(&self, limit: Duration) -> u64 {
        let elapsed = self.elapsed.as_secs_f64().max(1e-6);
        let rate = self.playouts as f64 / elapsed;
        ((rate * limit.as_secs_f64()) as u64).max(1)
    }
}

/// Time `config.calibration_simulations` halving playouts from `board` on a
/// scratch table.
pub fn calibrate<B: GameBoard>(
    board: &B,
    config: &SearchConfig,
    mode: HalvingMode,
    rng: &mut ChaCha20Rng,
) -> Result<Calibration, SearchError> {
    let mut table = TranspositionTable::new(config.table_bits.min(CALIBRATION_TABLE_BITS));
    let mut search = Search::new(board, &mut table, config, rng);
    search.prepare_root(board)?;

    let start = Instant::now();
    search.run_halving(board, config.calibration_simulations, mode)?;
    let calibration = Calibration {
        playouts: search.playouts(),
        elapsed: start.elapsed(),
    };

    debug!(
        playouts = calibration.playouts,
        elapsed_ms = calibration.elapsed.as_millis() as u64,
        "calibrated halving search"
    );
    Ok(calibration)
}

/// Simulation count for a halving search under `config`.
pub fn halving_simulations<B: GameBoard>(
    board: &B,
    config: &SearchConfig,
    mode: HalvingMode,
    rng: &mut ChaCha20Rng,
) -> Result<u64, SearchError> {
    match Budget::from_config(config) {
        Budget::Simulations(n) => Ok(n),
        Budget::Time(limit) => Ok(calibrate(board, config, mode, rng)?.simulations_for(limit)),
    }
}

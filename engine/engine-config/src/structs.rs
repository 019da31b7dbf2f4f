//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_game() -> String {
    defaults::game().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_time_limit() -> u64 {
    defaults::time_limit_ms()
}
fn d_fixed_sims() -> bool {
    defaults::fixed_simulations()
}
fn d_heuristics() -> bool {
    defaults::heuristics()
}
fn d_early_term() -> bool {
    defaults::early_termination()
}
fn d_term_depth() -> u32 {
    defaults::termination_depth()
}
fn d_term_threshold() -> i32 {
    defaults::termination_threshold()
}
fn d_early_term_win() -> f64 {
    defaults::early_term_win_value()
}
fn d_solver() -> bool {
    defaults::solver()
}
fn d_node_priors() -> bool {
    defaults::node_priors()
}
fn d_prior_visits() -> u32 {
    defaults::prior_visits()
}
fn d_implicit_minimax() -> bool {
    defaults::implicit_minimax()
}
fn d_im_alpha() -> f64 {
    defaults::im_alpha()
}
fn d_shot_threshold() -> u64 {
    defaults::shot_threshold()
}
fn d_table_bits() -> u32 {
    defaults::table_bits()
}
fn d_calibration() -> u64 {
    defaults::calibration_simulations()
}
fn d_pack_offset() -> u32 {
    defaults::pack_offset()
}
fn d_debug() -> bool {
    defaults::debug()
}
fn d_p1() -> String {
    defaults::p1().into()
}
fn d_p2() -> String {
    defaults::p2().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_print_board() -> bool {
    defaults::print_board()
}
fn d_max_plies() -> u32 {
    defaults::max_plies()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Settings shared by every binary
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Game to play: `tictactoe` or `breakthrough`
    #[serde(default = "d_game")]
    pub game: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            game: defaults::game().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Base search options applied to every player before its label tags
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchSettings {
    /// UCT exploration constant
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// Per-move time limit in milliseconds, or simulations when
    /// `fixed_simulations` is set
    #[serde(default = "d_time_limit")]
    pub time_limit_ms: u64,
    #[serde(default = "d_fixed_sims")]
    pub fixed_simulations: bool,
    #[serde(default = "d_heuristics")]
    pub heuristics: bool,
    #[serde(default = "d_early_term")]
    pub early_termination: bool,
    #[serde(default = "d_term_depth")]
    pub termination_depth: u32,
    #[serde(default = "d_term_threshold")]
    pub termination_threshold: i32,
    #[serde(default = "d_early_term_win")]
    pub early_term_win_value: f64,
    #[serde(default = "d_solver")]
    pub solver: bool,
    #[serde(default = "d_node_priors")]
    pub node_priors: bool,
    #[serde(default = "d_prior_visits")]
    pub prior_visits: u32,
    #[serde(default = "d_implicit_minimax")]
    pub implicit_minimax: bool,
    #[serde(default = "d_im_alpha")]
    pub im_alpha: f64,
    /// Hybrid: per-arm budget below which a node switches to UCT
    #[serde(default = "d_shot_threshold")]
    pub shot_threshold: u64,
    /// Transposition table size as a power of two
    #[serde(default = "d_table_bits")]
    pub table_bits: u32,
    #[serde(default = "d_calibration")]
    pub calibration_simulations: u64,
    #[serde(default = "d_pack_offset")]
    pub pack_offset: u32,
    #[serde(default = "d_debug")]
    pub debug: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            exploration: defaults::exploration(),
            time_limit_ms: defaults::time_limit_ms(),
            fixed_simulations: defaults::fixed_simulations(),
            heuristics: defaults::heuristics(),
            early_termination: defaults::early_termination(),
            termination_depth: defaults::termination_depth(),
            termination_threshold: defaults::termination_threshold(),
            early_term_win_value: defaults::early_term_win_value(),
            solver: defaults::solver(),
            node_priors: defaults::node_priors(),
            prior_visits: defaults::prior_visits(),
            implicit_minimax: defaults::implicit_minimax(),
            im_alpha: defaults::im_alpha(),
            shot_threshold: defaults::shot_threshold(),
            table_bits: defaults::table_bits(),
            calibration_simulations: defaults::calibration_simulations(),
            pack_offset: defaults::pack_offset(),
            debug: defaults::debug(),
        }
    }
}

/// Arena (match runner) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    /// Player one label, e.g. `hybrid_s_h_b20`
    #[serde(default = "d_p1")]
    pub p1: String,
    #[serde(default = "d_p2")]
    pub p2: String,
    #[serde(default = "d_seed")]
    pub seed: u64,
    #[serde(default = "d_print_board")]
    pub print_board: bool,
    /// Game is abandoned as a draw after this many plies
    #[serde(default = "d_max_plies")]
    pub max_plies: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            p1: defaults::p1().into(),
            p2: defaults::p2().into(),
            seed: defaults::seed(),
            print_board: defaults::print_board(),
            max_plies: defaults::max_plies(),
        }
    }
}

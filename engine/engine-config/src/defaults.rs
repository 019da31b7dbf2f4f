//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time, so a binary built from
//! this workspace always agrees with the checked-in defaults.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    game: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    exploration: f64,
    time_limit_ms: u64,
    fixed_simulations: bool,
    heuristics: bool,
    early_termination: bool,
    termination_depth: u32,
    termination_threshold: i32,
    early_term_win_value: f64,
    solver: bool,
    node_priors: bool,
    prior_visits: u32,
    implicit_minimax: bool,
    im_alpha: f64,
    shot_threshold: u64,
    table_bits: u32,
    calibration_simulations: u64,
    pack_offset: u32,
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    p1: String,
    p2: String,
    seed: u64,
    print_board: bool,
    max_plies: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn game() -> &'static str {
    &DEFAULTS.common.game
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Search
pub fn exploration() -> f64 {
    DEFAULTS.search.exploration
}
pub fn time_limit_ms() -> u64 {
    DEFAULTS.search.time_limit_ms
}
pub fn fixed_simulations() -> bool {
    DEFAULTS.search.fixed_simulations
}
pub fn heuristics() -> bool {
    DEFAULTS.search.heuristics
}
pub fn early_termination() -> bool {
    DEFAULTS.search.early_termination
}
pub fn termination_depth() -> u32 {
    DEFAULTS.search.termination_depth
}
pub fn termination_threshold() -> i32 {
    DEFAULTS.search.termination_threshold
}
pub fn early_term_win_value() -> f64 {
    DEFAULTS.search.early_term_win_value
}
pub fn solver() -> bool {
    DEFAULTS.search.solver
}
pub fn node_priors() -> bool {
    DEFAULTS.search.node_priors
}
pub fn prior_visits() -> u32 {
    DEFAULTS.search.prior_visits
}
pub fn implicit_minimax() -> bool {
    DEFAULTS.search.implicit_minimax
}
pub fn im_alpha() -> f64 {
    DEFAULTS.search.im_alpha
}
pub fn shot_threshold() -> u64 {
    DEFAULTS.search.shot_threshold
}
pub fn table_bits() -> u32 {
    DEFAULTS.search.table_bits
}
pub fn calibration_simulations() -> u64 {
    DEFAULTS.search.calibration_simulations
}
pub fn pack_offset() -> u32 {
    DEFAULTS.search.pack_offset
}
pub fn debug() -> bool {
    DEFAULTS.search.debug
}

// Arena
pub fn p1() -> &'static str {
    &DEFAULTS.arena.p1
}
pub fn p2() -> &'static str {
    &DEFAULTS.arena.p2
}
pub fn seed() -> u64 {
    DEFAULTS.arena.seed
}
pub fn print_board() -> bool {
    DEFAULTS.arena.print_board
}
pub fn max_plies() -> u32 {
    DEFAULTS.arena.max_plies
}

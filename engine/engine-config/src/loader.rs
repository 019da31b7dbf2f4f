//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by HSHOT_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("HSHOT_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from HSHOT_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "HSHOT_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, i32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: HSHOT_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.game, "HSHOT_COMMON_GAME");
    env_override!(config, common.log_level, "HSHOT_COMMON_LOG_LEVEL");

    // Search
    env_override!(config, search.exploration, "HSHOT_SEARCH_EXPLORATION", parse);
    env_override!(config, search.time_limit_ms, "HSHOT_SEARCH_TIME_LIMIT_MS", parse);
    env_override!(
        config,
        search.fixed_simulations,
        "HSHOT_SEARCH_FIXED_SIMULATIONS",
        parse
    );
    env_override!(config, search.heuristics, "HSHOT_SEARCH_HEURISTICS", parse);
    env_override!(
        config,
        search.early_termination,
        "HSHOT_SEARCH_EARLY_TERMINATION",
        parse
    );
    env_override!(
        config,
        search.termination_depth,
        "HSHOT_SEARCH_TERMINATION_DEPTH",
        parse
    );
    env_override!(
        config,
        search.termination_threshold,
        "HSHOT_SEARCH_TERMINATION_THRESHOLD",
        parse
    );
    env_override!(config, search.solver, "HSHOT_SEARCH_SOLVER", parse);
    env_override!(config, search.node_priors, "HSHOT_SEARCH_NODE_PRIORS", parse);
    env_override!(config, search.prior_visits, "HSHOT_SEARCH_PRIOR_VISITS", parse);
    env_override!(
        config,
        search.implicit_minimax,
        "HSHOT_SEARCH_IMPLICIT_MINIMAX",
        parse
    );
    env_override!(config, search.im_alpha, "HSHOT_SEARCH_IM_ALPHA", parse);
    env_override!(
        config,
        search.shot_threshold,
        "HSHOT_SEARCH_SHOT_THRESHOLD",
        parse
    );
    env_override!(config, search.table_bits, "HSHOT_SEARCH_TABLE_BITS", parse);
    env_override!(config, search.debug, "HSHOT_SEARCH_DEBUG", parse);

    // Arena
    env_override!(config, arena.p1, "HSHOT_ARENA_P1");
    env_override!(config, arena.p2, "HSHOT_ARENA_P2");
    env_override!(config, arena.seed, "HSHOT_ARENA_SEED", parse);
    env_override!(config, arena.print_board, "HSHOT_ARENA_PRINT_BOARD", parse);
    env_override!(config, arena.max_plies, "HSHOT_ARENA_MAX_PLIES", parse);

    config
}

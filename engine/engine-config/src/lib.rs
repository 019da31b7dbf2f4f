//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the arena binary. Search options here are plain data; the arena turns
//! them into a search configuration per player.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`HSHOT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! HSHOT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     HSHOT_COMMON_GAME=tictactoe
//!     HSHOT_SEARCH_SOLVER=true
//!     HSHOT_SEARCH_TIME_LIMIT_MS=500
//!     HSHOT_ARENA_P1=hybrid_s_h_b20
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

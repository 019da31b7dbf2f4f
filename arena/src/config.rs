//! Command-line configuration for the arena.
//!
//! Defaults come from config.toml (with `HSHOT_*` environment overrides);
//! command-line arguments take priority over both.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

use crate::game::GameKind;

// Load central config once at startup
pub static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_p1() -> String {
    CENTRAL_CONFIG.arena.p1.clone()
}

fn default_p2() -> String {
    CENTRAL_CONFIG.arena.p2.clone()
}

fn default_time_limit() -> u64 {
    CENTRAL_CONFIG.search.time_limit_ms
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.arena.seed
}

fn default_game() -> String {
    CENTRAL_CONFIG.common.game.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_max_plies() -> u32 {
    CENTRAL_CONFIG.arena.max_plies
}

#[derive(Parser, Debug, Clone)]
#[command(name = "arena")]
#[command(about = "Play one game between two search players")]
#[command(
    long_about = "Plays a single game between two search players and prints the winner.

Players are given as labels: a policy (uct, shot, hybrid) followed by
underscore-separated tags, e.g. hybrid_s_h_b20 or uct_s_et4_c0.8.

Tags: s solver, h heuristics, f fixed simulations, etN early termination
depth, ertN early termination threshold, cX exploration, bN hybrid budget
threshold, np[N] node priors, im[X] implicit minimax, d verbose debug.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Args {
    /// Label of the first player (moves first)
    #[arg(long, default_value_t = default_p1())]
    pub p1: String,

    /// Label of the second player
    #[arg(long, default_value_t = default_p2())]
    pub p2: String,

    /// Per-move time limit in milliseconds (simulations with the `f` tag)
    #[arg(long = "time-limit", alias = "timelimit", default_value_t = default_time_limit())]
    pub time_limit: u64,

    /// Seed for the players' random number generator
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Game to play (tictactoe, breakthrough)
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// Print the board before every move
    #[arg(long = "print-board", alias = "printboard")]
    pub print_board: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Abandon the game as a draw after this many plies
    #[arg(long, default_value_t = default_max_plies())]
    pub max_plies: u32,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if self.time_limit == 0 {
            return Err(anyhow!("time limit must be greater than 0"));
        }

        if self.max_plies == 0 {
            return Err(anyhow!("max_plies must be greater than 0"));
        }

        self.game_kind()?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn game_kind(&self) -> Result<GameKind> {
        self.game.parse()
    }

    /// Board printing is on when asked for here or in config.toml.
    pub fn print_board(&self) -> bool {
        self.print_board || CENTRAL_CONFIG.arena.print_board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            p1: "hybrid_s".into(),
            p2: "uct_s".into(),
            time_limit: 100,
            seed: 1,
            game: "tictactoe".into(),
            print_board: false,
            log_level: "info".into(),
            max_plies: 100,
        }
    }

    #[test]
    fn test_validate_accepts_base_args() {
        assert!(base_args().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_time_limit() {
        let mut args = base_args();
        args.time_limit = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_game() {
        let mut args = base_args();
        args.game = "chess".into();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut args = base_args();
        args.log_level = "loud".into();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_command_line() {
        let args = Args::try_parse_from([
            "arena",
            "--p1",
            "shot_s_h",
            "--p2",
            "uct_c0.8",
            "--time-limit",
            "250",
            "--seed",
            "7",
            "--game",
            "breakthrough",
            "--print-board",
        ])
        .unwrap();
        assert_eq!(args.p1, "shot_s_h");
        assert_eq!(args.p2, "uct_c0.8");
        assert_eq!(args.time_limit, 250);
        assert_eq!(args.seed, 7);
        assert_eq!(args.game, "breakthrough");
        assert!(args.print_board);
    }
}

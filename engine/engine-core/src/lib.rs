//! Core types for the game-tree search engine
//!
//! This crate defines what the search needs from a game:
//! - `Player`: the two sides of a zero-sum game
//! - `GameBoard`: the position contract (moves, fingerprint, winner, evaluation)
//! - `ZobristKeys`: seeded hashing keys for position fingerprints

pub mod board;
pub mod game_utils;
pub mod player;
pub mod zobrist;

pub use board::{GameBoard, IllegalMove};
pub use player::Player;
pub use zobrist::ZobristKeys;

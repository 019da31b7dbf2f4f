//! Zobrist hashing keys.
//!
//! Keys are drawn from a seeded ChaCha stream so fingerprints are stable
//! across runs and machines.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::player::Player;

/// Random keys for `(square, piece kind)` pairs plus one key per side to move.
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    pieces: Vec<u64>,
    kinds: usize,
    side: [u64; 2],
}

impl ZobristKeys {
    pub fn new(squares: usize, kinds: usize, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let pieces = (0..squares * kinds).map(|_| rng.gen::<u64>()).collect();
        let side = [rng.gen::<u64>(), rng.gen::<u64>()];
        Self {
            pieces,
            kinds,
            side,
        }
    }

    #[inline]
    pub fn piece(&self, square: usize, kind: usize) -> u64 {
        self.pieces[square * self.kinds + kind]
    }

    #[inline]
    pub fn side(&self, player: Player) -> u64 {
        self.side[player.index()]
    }

    pub fn squares(&self) -> usize {
        self.pieces.len() / self.kinds.max(1)
    }
}

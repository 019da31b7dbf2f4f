//! Breakthrough on an 8x8 board
//!
//! White (player one) starts on the two bottom rows and moves north; black
//! (player two) starts on the two top rows and moves south. A piece steps
//! one square straight ahead onto an empty square, or diagonally ahead onto
//! an empty or enemy square, capturing diagonally only. Reaching the far
//! row or capturing every enemy piece wins; a side left without a legal
//! move loses. There are no draws.
//!
//! Squares are numbered row-major from the top-left (`a8` is 0, `h1` is 63).

use std::fmt;

use engine_core::game_utils::score_for;
use engine_core::{GameBoard, IllegalMove, Player, ZobristKeys};
use once_cell::sync::Lazy;

pub const SIZE: usize = 8;
const SQUARES: usize = SIZE * SIZE;
/// Starting material per side.
pub const PIECES_PER_SIDE: u8 = 2 * SIZE as u8;

const ZOBRIST_SEED: u64 = 0xB7EA_C7B0_0000_0008;

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| ZobristKeys::new(SQUARES, 2, ZOBRIST_SEED));

/// Evaluation weight of one piece of material.
const PIECE_VALUE: i32 = 10;
/// Evaluation weight of one row of advancement.
const ROW_VALUE: i32 = 1;

/// A step from one square to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
}

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }

    /// Parse coordinate notation such as `b2b3`.
    pub fn parse(s: &str) -> Option<Move> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            return None;
        }
        let square = |file: u8, rank: u8| -> Option<u8> {
            let col = file.checked_sub(b'a')?;
            let row_from_bottom = rank.checked_sub(b'1')?;
            if col as usize >= SIZE || row_from_bottom as usize >= SIZE {
                return None;
            }
            Some((SIZE as u8 - 1 - row_from_bottom) * SIZE as u8 + col)
        };
        Some(Move::new(square(bytes[0], bytes[1])?, square(bytes[2], bytes[3])?))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |sq: u8| {
            let (row, col) = (sq as usize / SIZE, sq as usize % SIZE);
            format!("{}{}", (b'a' + col as u8) as char, SIZE - row)
        };
        write!(f, "{}{}", name(self.from), name(self.to))
    }
}

#[derive(Debug, Clone)]
pub struct Breakthrough {
    cells: [Option<Player>; SQUARES],
    to_move: Player,
    pieces: [u8; 2],
    winner: Option<Player>,
    plies: u32,
    hash: u64,
    /// Material plus advancement per side. Kept up to date while moves are
    /// applied with early termination on; `None` once it went stale.
    score: Option<[i32; 2]>,
}

// The cached score is bookkeeping, not part of the position.
impl PartialEq for Breakthrough {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.to_move == other.to_move
            && self.winner == other.winner
            && self.plies == other.plies
    }
}

impl Eq for Breakthrough {}

impl Breakthrough {
    /// Standard starting position.
    pub fn new() -> Self {
        let mut cells = [None; SQUARES];
        for (sq, cell) in cells.iter_mut().enumerate() {
            *cell = match sq / SIZE {
                0 | 1 => Some(Player::Two),
                6 | 7 => Some(Player::One),
                _ => None,
            };
        }
        Self::from_cells(cells, Player::One)
    }

    /// Position from eight rows of `w`, `b` and `.`, top row first.
    pub fn from_rows(rows: &[&str; SIZE], to_move: Player) -> Option<Self> {
        let mut cells = [None; SQUARES];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != SIZE {
                return None;
            }
            for (c, ch) in row.chars().enumerate() {
                cells[r * SIZE + c] = match ch {
                    'w' => Some(Player::One),
                    'b' => Some(Player::Two),
                    '.' => None,
                    _ => return None,
                };
            }
        }
        Some(Self::from_cells(cells, to_move))
    }

    fn from_cells(cells: [Option<Player>; SQUARES], to_move: Player) -> Self {
        let mut pieces = [0u8; 2];
        for p in cells.iter().flatten() {
            pieces[p.index()] += 1;
        }
        let mut board = Self {
            cells,
            to_move,
            pieces,
            winner: None,
            plies: 0,
            hash: 0,
            score: None,
        };
        board.winner = board.static_winner();
        board.hash = board.full_hash();
        board.score = Some(board.full_score());
        board
    }

    /// Winner of a set-up position: a piece on its goal row or a side
    /// with no pieces left.
    fn static_winner(&self) -> Option<Player> {
        Player::ALL.into_iter().find(|&p| {
            self.pieces[p.opponent().index()] == 0
                || (0..SIZE).any(|c| self.cells[goal_row(p) * SIZE + c] == Some(p))
        })
    }

    pub fn full_hash(&self) -> u64 {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(sq, cell)| cell.map(|p| KEYS.piece(sq, p.index())))
            .fold(KEYS.side(self.to_move), |h, k| h ^ k)
    }

    /// Material and advancement of both sides, from a full scan.
    pub fn full_score(&self) -> [i32; 2] {
        let mut score = [0i32; 2];
        for (sq, cell) in self.cells.iter().enumerate() {
            if let Some(p) = cell {
                score[p.index()] += piece_score(sq, *p);
            }
        }
        score
    }

    pub fn piece_at(&self, square: usize) -> Option<Player> {
        self.cells[square]
    }

    pub fn pieces(&self, player: Player) -> u8 {
        self.pieces[player.index()]
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    /// Squares the piece on `from` can step to.
    fn targets(&self, from: usize, player: Player) -> impl Iterator<Item = usize> + '_ {
        let (r, c) = ((from / SIZE) as isize, (from % SIZE) as isize);
        let nr = r + forward(player);
        [-1isize, 0, 1].into_iter().filter_map(move |dc| {
            let nc = c + dc;
            if !(0..SIZE as isize).contains(&nr) || !(0..SIZE as isize).contains(&nc) {
                return None;
            }
            let to = (nr * SIZE as isize + nc) as usize;
            let legal = match self.cells[to] {
                None => true,
                Some(p) => dc != 0 && p != player,
            };
            legal.then_some(to)
        })
    }

    fn moves_for(&self, player: Player) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for from in 0..SQUARES {
            if self.cells[from] == Some(player) {
                moves.extend(
                    self.targets(from, player)
                        .map(|to| Move::new(from as u8, to as u8)),
                );
            }
        }
        moves
    }

    fn can_move(&self, player: Player) -> bool {
        (0..SQUARES).any(|from| {
            self.cells[from] == Some(player) && self.targets(from, player).next().is_some()
        })
    }

    fn is_legal(&self, mv: Move) -> bool {
        let (from, to) = (mv.from as usize, mv.to as usize);
        from < SQUARES
            && self.cells[from] == Some(self.to_move)
            && self.targets(from, self.to_move).any(|t| t == to)
    }

    fn is_capture(&self, mv: Move) -> bool {
        self.cells[mv.to as usize].is_some()
    }

    fn wins_immediately(&self, mv: Move) -> bool {
        let to = mv.to as usize;
        to / SIZE == goal_row(self.to_move)
            || (self.is_capture(mv) && self.pieces[self.to_move.opponent().index()] == 1)
    }

    /// Enemy pieces one step from their goal row.
    fn threatening_pieces(&self) -> Vec<usize> {
        let enemy = self.to_move.opponent();
        let row = (goal_row(enemy) as isize - forward(enemy)) as usize;
        (row * SIZE..row * SIZE + SIZE)
            .filter(|&sq| self.cells[sq] == Some(enemy))
            .collect()
    }
}

impl Default for Breakthrough {
    fn default() -> Self {
        Self::new()
    }
}

/// Row a player must reach to win.
fn goal_row(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => SIZE - 1,
    }
}

/// Evaluation weight of a piece of `player` standing on `square`.
fn piece_score(square: usize, player: Player) -> i32 {
    let row = square / SIZE;
    let advanced = match player {
        Player::One => SIZE - 1 - row,
        Player::Two => row,
    };
    PIECE_VALUE + ROW_VALUE * advanced as i32
}

/// Row delta of a forward step.
fn forward(player: Player) -> isize {
    match player {
        Player::One => -1,
        Player::Two => 1,
    }
}

impl GameBoard for Breakthrough {
    type Move = Move;

    fn expand_moves(&self) -> Vec<Move> {
        if self.winner.is_some() {
            return Vec::new();
        }
        self.moves_for(self.to_move)
    }

    /// With heuristics: a winning move if one exists, otherwise a capture of
    /// an enemy piece about to break through, otherwise every move with
    /// captures counted twice.
    fn playout_moves(&self, use_heuristics: bool) -> Vec<Move> {
        let moves = self.expand_moves();
        if !use_heuristics || moves.is_empty() {
            return moves;
        }

        let decisive: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|&m| self.wins_immediately(m))
            .collect();
        if !decisive.is_empty() {
            return decisive;
        }

        let threats = self.threatening_pieces();
        if !threats.is_empty() {
            let defending: Vec<Move> = moves
                .iter()
                .copied()
                .filter(|m| threats.contains(&(m.to as usize)))
                .collect();
            if !defending.is_empty() {
                return defending;
            }
        }

        let captures: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|&m| self.is_capture(m))
            .collect();
        let mut weighted = moves;
        weighted.extend(captures);
        weighted
    }

    /// With `early_termination` the evaluation score is updated in place;
    /// without it the score goes stale and `evaluate` rescans the board.
    fn apply_move(&mut self, mv: Move, early_termination: bool) -> Result<(), IllegalMove> {
        if self.winner.is_some() || !self.is_legal(mv) {
            return Err(IllegalMove::new(mv, self.hash));
        }

        let player = self.to_move;
        let enemy = player.opponent();
        let (from, to) = (mv.from as usize, mv.to as usize);
        let captured = self.cells[to] == Some(enemy);

        if captured {
            self.pieces[enemy.index()] -= 1;
            self.hash ^= KEYS.piece(to, enemy.index());
        }
        self.cells[from] = None;
        self.cells[to] = Some(player);
        self.hash ^= KEYS.piece(from, player.index()) ^ KEYS.piece(to, player.index());

        self.score = match self.score {
            Some(mut score) if early_termination => {
                if captured {
                    score[enemy.index()] -= piece_score(to, enemy);
                }
                // every step advances one row
                score[player.index()] += ROW_VALUE;
                Some(score)
            }
            _ => None,
        };

        if to / SIZE == goal_row(player)
            || self.pieces[enemy.index()] == 0
            || !self.can_move(enemy)
        {
            self.winner = Some(player);
        }

        self.hash ^= KEYS.side(player) ^ KEYS.side(enemy);
        self.to_move = enemy;
        self.plies += 1;
        Ok(())
    }

    fn fingerprint(&self) -> u64 {
        self.hash
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }

    fn side_to_move(&self) -> Player {
        self.to_move
    }

    /// Material plus advancement.
    fn evaluate(&self, viewer: Player) -> i32 {
        let score = self.score.unwrap_or_else(|| self.full_score());
        score_for(score[0] - score[1], Player::One, viewer)
    }

    fn prior_win_rate(&self, viewer: Player, mv: Move) -> f64 {
        if self.to_move != viewer {
            return 0.5;
        }
        if self.wins_immediately(mv) {
            return 1.0;
        }
        let row = mv.to as usize / SIZE;
        let in_enemy_half = match viewer {
            Player::One => row < SIZE / 2,
            Player::Two => row >= SIZE / 2,
        };
        match (self.is_capture(mv), in_enemy_half) {
            (true, true) => 0.7,
            (true, false) => 0.6,
            (false, true) => 0.55,
            (false, false) => 0.5,
        }
    }
}

impl fmt::Display for Breakthrough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..SIZE {
            write!(f, "{}", SIZE - r)?;
            for c in 0..SIZE {
                let ch = match self.cells[r * SIZE + c] {
                    Some(Player::One) => 'w',
                    Some(Player::Two) => 'b',
                    None => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, " abcdefgh")?;
        writeln!(
            f,
            "Pieces: ({}, {}) plies: {}",
            self.pieces[0], self.pieces[1], self.plies
        )
    }
}

#[cfg(test)]
mod tests;

//! Explicit game trees for search tests.
//!
//! A [`TreeGame`] walks a hand-built tree whose positions carry fixed
//! fingerprints, winners and evaluations. Leaves without a winner are draws.

#![allow(dead_code)]

use std::rc::Rc;

use engine_core::{GameBoard, IllegalMove, Player};

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub fingerprint: u64,
    pub to_move: Player,
    pub winner: Option<Player>,
    pub moves: Vec<(char, usize)>,
    /// Static evaluation for player one.
    pub eval: i32,
}

#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<TreeNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, to_move: Player, winner: Option<Player>, moves: &[(char, usize)]) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            fingerprint: 0x1000 + id as u64,
            to_move,
            winner,
            moves: moves.to_vec(),
            eval: 0,
        });
        id
    }

    /// Position with `to_move` to play and the given moves.
    pub fn inner(&mut self, to_move: Player, moves: &[(char, usize)]) -> usize {
        self.push(to_move, None, moves)
    }

    /// Decided position won by `winner`.
    pub fn win(&mut self, to_move: Player, winner: Player) -> usize {
        self.push(to_move, Some(winner), &[])
    }

    pub fn draw(&mut self, to_move: Player) -> usize {
        self.push(to_move, None, &[])
    }

    pub fn eval(&mut self, id: usize, eval: i32) -> &mut Self {
        self.nodes[id].eval = eval;
        self
    }

    /// Add move `label` from `from` to an already built position, which may
    /// lie above `from`.
    pub fn link(&mut self, from: usize, label: char, to: usize) -> &mut Self {
        self.nodes[from].moves.push((label, to));
        self
    }

    /// Give `id` the fingerprint of `other`, making them one position.
    pub fn transpose(&mut self, id: usize, other: usize) -> &mut Self {
        self.nodes[id].fingerprint = self.nodes[other].fingerprint;
        self
    }

    pub fn build(self, root: usize) -> TreeGame {
        TreeGame {
            nodes: Rc::new(self.nodes),
            at: root,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeGame {
    nodes: Rc<Vec<TreeNode>>,
    at: usize,
}

impl TreeGame {
    fn node(&self) -> &TreeNode {
        &self.nodes[self.at]
    }

    /// The board after playing `labels` in order.
    pub fn after(&self, labels: &str) -> TreeGame {
        let mut board = self.clone();
        for label in labels.chars() {
            board.apply_move(label, false).unwrap();
        }
        board
    }
}

impl GameBoard for TreeGame {
    type Move = char;

    fn expand_moves(&self) -> Vec<char> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.node().moves.iter().map(|&(label, _)| label).collect()
    }

    fn playout_moves(&self, _use_heuristics: bool) -> Vec<char> {
        self.expand_moves()
    }

    fn apply_move(&mut self, mv: char, _early_termination: bool) -> Result<(), IllegalMove> {
        let next = self
            .node()
            .moves
            .iter()
            .find(|&&(label, _)| label == mv)
            .map(|&(_, child)| child);
        match next {
            Some(child) if !self.is_terminal() => {
                self.at = child;
                Ok(())
            }
            _ => Err(IllegalMove::new(mv, self.fingerprint())),
        }
    }

    fn fingerprint(&self) -> u64 {
        self.node().fingerprint
    }

    fn winner(&self) -> Option<Player> {
        self.node().winner
    }

    fn side_to_move(&self) -> Player {
        self.node().to_move
    }

    fn evaluate(&self, viewer: Player) -> i32 {
        match viewer {
            Player::One => self.node().eval,
            Player::Two => -self.node().eval,
        }
    }

    fn is_terminal(&self) -> bool {
        self.node().winner.is_some() || self.node().moves.is_empty()
    }
}

/// Player one to move and win in three plies with `a`:
///
/// ```text
/// root -a-> A -x-> AX -w-> one wins
///             |        -z-> draw
///             -y-> AY -w-> one wins
///                      -z-> draw
/// root -b-> B -m-> two wins
///             -n-> draw
///             -o-> draw
/// ```
pub fn forced_win() -> TreeGame {
    use Player::{One, Two};

    let mut t = TreeBuilder::new();
    let ax_w = t.win(Two, One);
    let ax_z = t.draw(Two);
    let ay_w = t.win(Two, One);
    let ay_z = t.draw(Two);
    let ax = t.inner(One, &[('w', ax_w), ('z', ax_z)]);
    let ay = t.inner(One, &[('w', ay_w), ('z', ay_z)]);
    let a = t.inner(Two, &[('x', ax), ('y', ay)]);

    let b_m = t.win(One, Two);
    let b_n = t.draw(One);
    let b_o = t.draw(One);
    let b = t.inner(Two, &[('m', b_m), ('n', b_n), ('o', b_o)]);

    let root = t.inner(One, &[('a', a), ('b', b)]);
    t.build(root)
}

/// Player one to move; both moves let player two win at once.
pub fn forced_loss() -> TreeGame {
    use Player::{One, Two};

    let mut t = TreeBuilder::new();
    let x_k = t.win(One, Two);
    let x_l = t.draw(One);
    let y_k = t.win(One, Two);
    let x = t.inner(Two, &[('k', x_k), ('l', x_l)]);
    let y = t.inner(Two, &[('k', y_k)]);
    let root = t.inner(One, &[('a', x), ('b', y)]);
    t.build(root)
}

/// Player one wins with `c`; after `a` player two can steer back to the
/// root, so the root repeats below itself.
///
/// ```text
/// root -a-> A -y-> draw
///             -x-> root
/// root -c-> C -k-> one wins
/// ```
pub fn repeating_win() -> TreeGame {
    use Player::{One, Two};

    let mut t = TreeBuilder::new();
    let c_k = t.win(One, One);
    let c = t.inner(Two, &[('k', c_k)]);
    let y = t.draw(One);
    let a = t.inner(Two, &[('y', y)]);
    let root = t.inner(One, &[('a', a), ('c', c)]);
    t.link(a, 'x', root);
    t.build(root)
}

/// Two plies of three-way choices over decided leaves: every line after
/// `a` can end in a win for player one, every line after `b` in a win for
/// player two, the rest are draws.
pub fn two_level_tree() -> TreeGame {
    use Player::{One, Two};

    fn branch(t: &mut TreeBuilder, winner: Player) -> usize {
        let mut moves = Vec::new();
        for label in ['p', 'q', 'r'] {
            let win = t.win(Two, winner);
            let draw = t.draw(Two);
            moves.push((label, t.inner(One, &[('w', win), ('d', draw)])));
        }
        t.inner(Two, &moves)
    }

    let mut t = TreeBuilder::new();
    let a = branch(&mut t, One);
    let b = branch(&mut t, Two);
    let root = t.inner(One, &[('a', a), ('b', b)]);
    t.build(root)
}

//! Search tree node representation.
//!
//! A node is one path-specific occurrence of a position. Its statistics live
//! in the transposition table record it points at, so the node itself only
//! carries structure: who moves, how we got here, and which children exist.

use engine_core::Player;

use crate::record::RecordId;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode<M> {
    /// Side to move at this node.
    pub player: Player,

    /// Move that led here from the parent (None for root).
    pub mv: Option<M>,

    /// Fingerprint of the position this node stands for.
    pub fingerprint: u64,

    /// Shared statistics for the position.
    pub record: RecordId,

    /// Every child, in move generation order. Empty until expanded.
    pub children: Vec<NodeId>,

    /// Children still competing in sequential halving.
    pub arms: Vec<NodeId>,

    /// Arm preferred by the last halving pass.
    pub best_arm: Option<NodeId>,

    /// Children have been generated.
    pub expanded: bool,

    /// The node has had its first playout.
    pub simulated: bool,
}

impl<M> SearchNode<M> {
    /// Create a new root node.
    pub fn new_root(player: Player, fingerprint: u64, record: RecordId) -> Self {
        Self::with_move(player, None, fingerprint, record)
    }

    /// Create a new child node.
    pub fn new_child(player: Player, mv: M, fingerprint: u64, record: RecordId) -> Self {
        Self::with_move(player, Some(mv), fingerprint, record)
    }

    fn with_move(player: Player, mv: Option<M>, fingerprint: u64, record: RecordId) -> Self {
        Self {
            player,
            mv,
            fingerprint,
            record,
            children: Vec::new(),
            arms: Vec::new(),
            best_arm: None,
            expanded: false,
            simulated: false,
        }
    }

    /// The player who made the move into this node.
    #[inline]
    pub fn mover(&self) -> Player {
        self.player.opponent()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.expanded
    }

    /// Expanded without children: the position is decided.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.expanded && self.children.is_empty()
    }
}

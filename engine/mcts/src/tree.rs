//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! The tree lives for one move decision; anything worth keeping across
//! decisions is in the transposition table.

use std::fmt;

use crate::node::{NodeId, SearchNode};

#[derive(Debug)]
pub struct SearchTree<M> {
    /// Arena storing all nodes
    nodes: Vec<SearchNode<M>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<M: Copy + fmt::Display> SearchTree<M> {
    pub fn new(root: SearchNode<M>) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<M> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<M> {
        &mut self.nodes[id.0 as usize]
    }

    pub fn allocate(&mut self, node: SearchNode<M>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child to a parent node. The child also joins the parent's arms.
    pub fn add_child(&mut self, parent: NodeId, child: SearchNode<M>) -> NodeId {
        let id = self.allocate(child);
        let node = self.get_mut(parent);
        node.children.push(id);
        node.arms.push(id);
        id
    }

    /// Move that led to `id`, formatted; `-` for the root.
    pub fn move_label(&self, id: NodeId) -> String {
        match self.get(id).mv {
            Some(mv) => mv.to_string(),
            None => "-".to_string(),
        }
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_nodes: self.nodes.len(),
            expanded_nodes: self.nodes.iter().filter(|n| n.expanded).count(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        self.get(node_id)
            .children
            .iter()
            .map(|&id| self.compute_max_depth(id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub expanded_nodes: usize,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;
    use engine_core::Player;

    #[test]
    fn test_new_tree() {
        let tree: SearchTree<u8> =
            SearchTree::new(SearchNode::new_root(Player::One, 1, RecordId(0)));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert_eq!(tree.move_label(tree.root()), "-");
    }

    #[test]
    fn test_add_child() {
        let mut tree = SearchTree::new(SearchNode::new_root(Player::One, 1, RecordId(0)));
        let root = tree.root();
        let child = tree.add_child(root, SearchNode::new_child(Player::Two, 4u8, 2, RecordId(1)));

        assert_eq!(child, NodeId(1));
        assert_eq!(tree.get(root).children, vec![child]);
        assert_eq!(tree.get(root).arms, vec![child]);
        assert_eq!(tree.move_label(child), "4");
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = SearchTree::new(SearchNode::new_root(Player::One, 1, RecordId(0)));
        let root = tree.root();
        tree.get_mut(root).expanded = true;
        let a = tree.add_child(root, SearchNode::new_child(Player::Two, 0u8, 2, RecordId(1)));
        tree.add_child(a, SearchNode::new_child(Player::One, 1u8, 3, RecordId(2)));

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.expanded_nodes, 1);
        assert_eq!(stats.max_depth, 2);
    }
}

//! Arena-based MCTS tree.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::core::Side;

/// Flat node arena. The root is always node 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
}

impl MCTSTree {
    #[must_use]
    pub fn new(root_side: Side) -> Self {
        Self::with_capacity(root_side, 1024)
    }

    #[must_use]
    pub fn with_capacity(root_side: Side, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(MCTSNode::root(root_side));
        Self { nodes }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node and start over from a fresh root.
    pub fn reset(&mut self, root_side: Side) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::root(root_side));
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root())
    }

    /// Shape summary.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            terminal_count: self.nodes.iter().filter(|n| n.is_terminal()).count(),
            total_edges: self.nodes.iter().map(|n| n.edges.len()).sum(),
        }
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    pub total_edges: usize,
}

impl TreeStats {
    /// Average edges per node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.node_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, Coord, SideMap};
    use crate::mcts::node::Edge;

    #[test]
    fn test_tree_alloc_and_reset() {
        let mut tree = MCTSTree::new(Side::Blue);
        let child = tree.alloc(MCTSNode::new(tree.root(), Side::Red, 1));

        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(child).to_move, Side::Red);

        tree.reset(Side::Red);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_node().to_move, Side::Red);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MCTSTree::new(Side::Blue);
        let root = tree.root();
        tree.get_mut(root).edges.push(Edge::new(Action::Build { cell: Coord::new(0, 0) }));
        tree.get_mut(root).edges.push(Edge::new(Action::Build { cell: Coord::new(0, 1) }));

        let child = tree.alloc(MCTSNode::new(root, Side::Red, 1));
        tree.get_mut(root).edges[0].child = child;
        tree.get_mut(child).terminal_reward = Some(SideMap::from_values(1.0, 0.0));

        let stats = tree.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.total_edges, 2);
        assert_eq!(stats.branching_factor(), 1.0);
    }
}

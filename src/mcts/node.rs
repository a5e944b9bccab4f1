//! MCTS node and edge structures.
//!
//! Nodes live in an arena and refer to each other by `NodeId`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, Side, SideMap};

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An action out of a node, with its statistics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub action: Action,

    /// Child node (NONE until expanded).
    pub child: NodeId,

    pub visits: u32,

    /// Reward accumulated through this edge, per side.
    pub total_reward: SideMap<f64>,
}

impl Edge {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            child: NodeId::NONE,
            visits: 0,
            total_reward: SideMap::with_value(0.0),
        }
    }

    /// Mean reward for a side (0 before the first visit).
    #[must_use]
    pub fn mean_reward(&self, side: Side) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward[side] / f64::from(self.visits)
        }
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.child.is_none()
    }
}

/// A position in the search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Side to act here. Meaningless once terminal.
    pub to_move: Side,

    /// Depth in tree (root = 0).
    pub depth: u16,

    pub visits: u32,

    /// Rewards of a finished game, if this node is one.
    pub terminal_reward: Option<SideMap<f64>>,

    /// Every legal action, in engine order. Moves have at most 16, builds 8.
    pub edges: SmallVec<[Edge; 8]>,
}

impl MCTSNode {
    #[must_use]
    pub fn new(parent: NodeId, to_move: Side, depth: u16) -> Self {
        Self {
            parent,
            to_move,
            depth,
            visits: 0,
            terminal_reward: None,
            edges: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn root(to_move: Side) -> Self {
        Self::new(NodeId::NONE, to_move, 0)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal_reward.is_some()
    }

    /// Indices of edges without a child yet.
    pub fn unexpanded_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_expanded())
            .map(|(i, _)| i)
    }

    #[must_use]
    pub fn has_unexpanded(&self) -> bool {
        self.edges.iter().any(|e| !e.is_expanded())
    }

    /// The most visited edge; the earliest wins ties.
    #[must_use]
    pub fn best_edge_by_visits(&self) -> Option<&Edge> {
        self.edges
            .iter()
            .fold(None, |best: Option<&Edge>, e| match best {
                Some(b) if b.visits >= e.visits => Some(b),
                _ => Some(e),
            })
    }
}

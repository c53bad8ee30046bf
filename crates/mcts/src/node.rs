//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices for cache locality and simpler memory management.

use std::fmt;
use subset_core::{SamplingPolicy, SearchNode};

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Parent links are plain handles too, so they never own anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of this node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Statistics for a single MCTS node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    /// Number of simulations that passed through this node.
    pub visit_count: u32,

    /// Sum of rewards from all simulations through this node.
    pub reward_sum: f64,
}

impl NodeStats {
    /// Mean reward for this node.
    ///
    /// Returns 0.0 if the node has never been visited.
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.reward_sum / self.visit_count as f64
        }
    }
}

impl fmt::Display for NodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reward = {}, n_v = {}", self.reward_sum, self.visit_count)
    }
}

/// A node in the MCTS tree.
///
/// Each node stores a search state, its statistics, one child slot per
/// action, and a non-owning handle to its parent.
#[derive(Clone, Debug)]
pub struct Node<S: SearchNode> {
    /// Action that led to this node (None for the initial root).
    pub action: Option<usize>,

    /// Search state at this node.
    pub state: S,

    /// Node statistics (visits, accumulated reward).
    pub stats: NodeStats,

    /// Parent handle, None for the current root.
    pub parent: Option<NodeId>,

    /// Child slots indexed by action id.
    pub children: Vec<Option<NodeId>>,

    /// Number of occupied child slots.
    pub expanded_children: usize,

    /// Distribution used to pick random or unexpanded children.
    pub sampling: SamplingPolicy,
}

impl<S: SearchNode> Node<S> {
    /// Create a new unexpanded node.
    pub fn new(
        action: Option<usize>,
        state: S,
        parent: Option<NodeId>,
        sampling: SamplingPolicy,
    ) -> Self {
        let num_actions = state.num_actions();
        Self {
            action,
            state,
            stats: NodeStats::default(),
            parent,
            children: vec![None; num_actions],
            expanded_children: 0,
            sampling,
        }
    }

    /// Create a root node for the given state.
    pub fn root(state: S, sampling: SamplingPolicy) -> Self {
        Self::new(None, state, None, sampling)
    }

    /// Child handle stored for `action`, if materialized.
    pub fn child(&self, action: usize) -> Option<NodeId> {
        self.children.get(action).copied().flatten()
    }

    /// Iterate over materialized children in action order.
    pub fn materialized(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(action, slot)| slot.map(|id| (action, id)))
    }

    /// Whether every allowed action has a materialized child.
    pub fn is_fully_explored(&self) -> bool {
        self.state.is_fully_explored(self.expanded_children)
    }
}

impl<S: SearchNode + fmt::Display> fmt::Display for Node<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, n_c = {}, {}",
            self.stats, self.expanded_children, self.state
        )
    }
}

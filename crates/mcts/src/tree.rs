//! Arena-allocated MCTS tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>. Children are
//! handles in per-action slots; parents are handles too, used only to
//! walk back up during backup.

use crate::node::{Node, NodeId};
use crate::rollout::sample_action;
use rand::Rng;
use std::collections::VecDeque;
use subset_core::{CoreError, SamplingPolicy, SearchNode};
use thiserror::Error;

/// Misuse of the tree that the search loop never triggers on its own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("cannot expand fully explored node at depth {depth}")]
    FullyExplored { depth: usize },

    #[error("node at depth {depth} has no visits to score children against")]
    UnvisitedNode { depth: usize },

    #[error("child for action {action} has never been visited")]
    UnvisitedChild { action: usize },

    #[error("non-leaf node at depth {depth} has no children")]
    NoChildren { depth: usize },

    #[error("non-leaf state at depth {depth} has no allowed actions")]
    NoAllowedActions { depth: usize },

    #[error(transparent)]
    State(#[from] CoreError),
}

/// Arena-allocated MCTS tree.
///
/// Nodes are stored in a contiguous vector and referenced by index.
/// The root always lives at [`NodeId::ROOT`].
#[derive(Debug)]
pub struct Tree<S: SearchNode> {
    nodes: Vec<Node<S>>,
}

impl<S: SearchNode> Tree<S> {
    /// Create a tree holding only a root for `state`.
    pub fn new(state: S, sampling: SamplingPolicy) -> Self {
        Self {
            nodes: vec![Node::root(state, sampling)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true, the root always exists).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S> {
        self.get(NodeId::ROOT)
    }

    /// Get a mutable reference to the root node.
    pub fn root_mut(&mut self) -> &mut Node<S> {
        self.get_mut(NodeId::ROOT)
    }

    /// Whether every allowed action of `id` has a materialized child.
    pub fn is_fully_explored(&self, id: NodeId) -> bool {
        self.get(id).is_fully_explored()
    }

    /// Overwrite the sampling distribution of a node.
    pub fn set_sampling_distribution(&mut self, id: NodeId, sampling: SamplingPolicy) {
        self.get_mut(id).sampling = sampling;
    }

    /// Sample an allowed action of `id` according to its sampling weights.
    ///
    /// Returns None if the state has no allowed actions.
    pub fn random_action<R: Rng>(&self, id: NodeId, rng: &mut R) -> Option<usize> {
        let node = self.get(id);
        sample_action(&node.sampling, &node.state.allowed_actions(), rng)
    }

    /// Materialize one randomly sampled, not-yet-expanded child of `id`.
    ///
    /// The child inherits the parent's sampling distribution.
    ///
    /// # Errors
    /// Returns `TreeError::FullyExplored` if every allowed action already
    /// has a child.
    pub fn expand<R: Rng>(&mut self, id: NodeId, rng: &mut R) -> Result<NodeId, TreeError> {
        let node = self.get(id);
        let candidates: Vec<usize> = node
            .state
            .allowed_actions()
            .into_iter()
            .filter(|&a| node.child(a).is_none())
            .collect();

        let action = sample_action(&node.sampling, &candidates, rng).ok_or(
            TreeError::FullyExplored {
                depth: node.state.depth(),
            },
        )?;

        let child = Node::new(
            Some(action),
            node.state.next_state(action)?,
            Some(id),
            node.sampling.clone(),
        );

        let child_id = NodeId(self.nodes.len());
        self.nodes.push(child);

        let parent = self.get_mut(id);
        parent.children[action] = Some(child_id);
        parent.expanded_children += 1;

        Ok(child_id)
    }

    /// Select the child of `id` with the largest UCB score.
    ///
    /// score = Q(a) + c * w(a) * sqrt(2 * ln(N_parent) / N_child)
    ///
    /// where Q is the child's mean reward and w the parent's sampling
    /// weight for the action. Ties keep the lowest action. With `c = 0`
    /// this is pure exploitation. Returns None if no child exists.
    ///
    /// # Errors
    /// Returns an error if the node or any scored child has zero visits.
    pub fn best_child(&self, id: NodeId, exploration: f64) -> Result<Option<NodeId>, TreeError> {
        Ok(self.best_edge(id, exploration)?.map(|(_, child)| child))
    }

    /// Like [`Tree::best_child`], also returning the action leading to it.
    pub fn best_edge(
        &self,
        id: NodeId,
        exploration: f64,
    ) -> Result<Option<(usize, NodeId)>, TreeError> {
        let node = self.get(id);
        let parent_visits = node.stats.visit_count;
        if parent_visits == 0 {
            return Err(TreeError::UnvisitedNode {
                depth: node.state.depth(),
            });
        }
        let log_parent = (parent_visits as f64).ln();

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;

        for (action, child_id) in node.materialized() {
            let child = self.get(child_id);
            let n = child.stats.visit_count;
            if n == 0 {
                return Err(TreeError::UnvisitedChild { action });
            }

            let bonus = (2.0 * log_parent / n as f64).sqrt();
            let score =
                child.stats.mean_reward() + exploration * node.sampling.get_or_zero(action) * bonus;

            if best.is_none() || score > best_score {
                best_score = score;
                best = Some((action, child_id));
            }
        }

        Ok(best)
    }

    /// Add one visit and `reward` to `from` and every ancestor up to the root.
    pub fn backup(&mut self, from: NodeId, reward: f64) {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.stats.visit_count += 1;
            node.stats.reward_sum += reward;
            current = node.parent;
        }
    }

    /// Make `new_root` the root, dropping every node outside its subtree.
    ///
    /// The kept subtree is compacted breadth-first, so the new root lands
    /// at [`NodeId::ROOT`] with no parent. Handles obtained before the call
    /// are invalidated.
    pub fn reroot(&mut self, new_root: NodeId) {
        if new_root == NodeId::ROOT {
            return;
        }

        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([new_root]);

        while let Some(id) = queue.pop_front() {
            remap[id.0] = Some(NodeId(order.len()));
            order.push(id);
            queue.extend(self.get(id).children.iter().flatten().copied());
        }

        let mut old: Vec<Option<Node<S>>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();

        for id in order {
            if let Some(mut node) = old[id.0].take() {
                node.parent = node.parent.and_then(|p| remap[p.0]);
                for slot in node.children.iter_mut() {
                    *slot = slot.and_then(|c| remap[c.0]);
                }
                self.nodes.push(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::SubsetSelection;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn subset_tree(pool: usize) -> Tree<SubsetSelection> {
        Tree::new(
            SubsetSelection::empty(pool),
            SamplingPolicy::uniform(pool).unwrap(),
        )
    }

    #[test]
    fn test_tree_creation() {
        let tree = subset_tree(3);
        assert_eq!(tree.len(), 1); // Root node
        assert!(!tree.is_empty());
        assert_eq!(tree.root().action, None);
    }

    #[test]
    fn test_expand_until_fully_explored() {
        let mut tree = subset_tree(4);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut actions = Vec::new();
        for expanded in 1..=4 {
            let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
            assert_eq!(tree.get(child).parent, Some(NodeId::ROOT));
            actions.push(tree.get(child).action.unwrap());
            assert_eq!(tree.root().expanded_children, expanded);
            assert_eq!(tree.root().materialized().count(), expanded);
        }

        assert!(tree.is_fully_explored(NodeId::ROOT));
        actions.sort_unstable();
        assert_eq!(actions, vec![0, 1, 2, 3]);

        assert_eq!(
            tree.expand(NodeId::ROOT, &mut rng),
            Err(TreeError::FullyExplored { depth: 0 })
        );
    }

    #[test]
    fn test_expand_skips_selected_actions() {
        let mut tree = subset_tree(4);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let taken = tree.get(child).action.unwrap();

        for _ in 0..3 {
            let grandchild = tree.expand(child, &mut rng).unwrap();
            assert_ne!(tree.get(grandchild).action, Some(taken));
        }
        assert!(tree.is_fully_explored(child));
        assert_eq!(tree.get(child).children[taken], None);
    }

    #[test]
    fn test_expand_follows_sampling_weights() {
        let mut tree = subset_tree(3);
        tree.set_sampling_distribution(
            NodeId::ROOT,
            SamplingPolicy::new(vec![0.0, 0.0, 1.0]).unwrap(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let first = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        assert_eq!(tree.get(first).action, Some(2));
        assert_eq!(tree.get(first).sampling, tree.root().sampling);
    }

    #[test]
    fn test_random_action_is_allowed() {
        let mut tree = subset_tree(3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let taken = tree.get(child).action.unwrap();

        for _ in 0..30 {
            let action = tree.random_action(child, &mut rng).unwrap();
            assert_ne!(action, taken);
        }
    }

    #[test]
    fn test_backup_updates_whole_path() {
        let mut tree = subset_tree(3);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        tree.root_mut().stats.visit_count = 1;

        let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let grandchild = tree.expand(child, &mut rng).unwrap();
        tree.backup(grandchild, 2.5);

        for id in [NodeId::ROOT, child, grandchild] {
            assert!((tree.get(id).stats.reward_sum - 2.5).abs() < 1e-12);
        }
        assert_eq!(tree.root().stats.visit_count, 2);
        assert_eq!(tree.get(child).stats.visit_count, 1);
        assert_eq!(tree.get(grandchild).stats.visit_count, 1);
    }

    #[test]
    fn test_best_child_exploitation_and_ties() {
        let mut tree = subset_tree(3);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        tree.root_mut().stats.visit_count = 1;

        for _ in 0..3 {
            let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
            let reward = match tree.get(child).action {
                Some(0) => 1.0,
                _ => 2.0,
            };
            tree.backup(child, reward);
        }

        // Actions 1 and 2 tie; the lower action wins.
        let best = tree.best_child(NodeId::ROOT, 0.0).unwrap().unwrap();
        assert_eq!(tree.get(best).action, Some(1));
    }

    #[test]
    fn test_best_child_exploration_bonus() {
        let mut tree = subset_tree(2);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        tree.root_mut().stats.visit_count = 1;

        let a = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let b = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let (low, high) = if tree.get(a).action == Some(0) { (a, b) } else { (b, a) };

        // Action 1 is slightly better but heavily visited.
        tree.backup(low, 1.0);
        for _ in 0..50 {
            tree.backup(high, 1.1);
        }

        assert_eq!(tree.best_child(NodeId::ROOT, 0.0).unwrap(), Some(high));
        assert_eq!(tree.best_child(NodeId::ROOT, 10.0).unwrap(), Some(low));
    }

    #[test]
    fn test_best_child_empty() {
        let mut tree = subset_tree(2);
        tree.root_mut().stats.visit_count = 1;
        assert_eq!(tree.best_child(NodeId::ROOT, 1.0).unwrap(), None);
    }

    #[test]
    fn test_best_child_guards_zero_visits() {
        let mut tree = subset_tree(2);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        assert_eq!(
            tree.best_child(NodeId::ROOT, 1.0),
            Err(TreeError::UnvisitedNode { depth: 0 })
        );

        tree.root_mut().stats.visit_count = 1;
        let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let action = tree.get(child).action.unwrap();
        assert_eq!(
            tree.best_child(NodeId::ROOT, 1.0),
            Err(TreeError::UnvisitedChild { action })
        );
    }

    #[test]
    fn test_reroot_prunes_siblings() {
        let mut tree = subset_tree(3);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let kept = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let dropped = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        tree.expand(dropped, &mut rng).unwrap();
        let grandchild = tree.expand(kept, &mut rng).unwrap();
        tree.backup(grandchild, 1.0);

        let kept_action = tree.get(kept).action;
        let grandchild_state = tree.get(grandchild).state.clone();

        tree.reroot(kept);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().action, kept_action);
        assert_eq!(tree.root().parent, None);
        assert_eq!(tree.root().stats.visit_count, 1);

        let (_, new_grandchild) = tree.root().materialized().next().unwrap();
        assert_eq!(tree.get(new_grandchild).parent, Some(NodeId::ROOT));
        assert_eq!(tree.get(new_grandchild).state, grandchild_state);
    }
}

//! Monte Carlo Tree Search implementation.
//!
//! The search runs in epochs. Each epoch spends the simulation budget on
//! the tree under the current root, then commits to the child with the
//! best mean reward and prunes everything else. Every simulation has four
//! phases:
//!
//! 1. tree policy: descend by UCB until a node can be expanded or a leaf is hit
//! 2. the configured sampling policy is applied to the node reached
//! 3. default policy: random play-out to a leaf, scored by the objective
//! 4. backup: the reward is added to every node from there up to the root

use crate::{
    config::MctsConfig,
    domains::SubsetSelection,
    error::SearchError,
    node::NodeId,
    rollout::rollout,
    tree::{Tree, TreeError},
};
use log::{debug, trace};
use rand::Rng;
use subset_core::{SamplingPolicy, SearchNode};

/// What one epoch committed to.
#[derive(Clone, Debug, PartialEq)]
pub struct EpochSummary {
    /// Zero-based epoch index.
    pub epoch: usize,

    /// Action committed at the end of the epoch.
    pub action: usize,

    /// Root visit count just before the commit.
    pub root_visits: u32,

    /// Visit count of the committed child.
    pub child_visits: u32,

    /// Mean reward of the committed child.
    pub child_mean_reward: f64,

    /// Nodes in the arena before pruning.
    pub tree_size: usize,
}

/// Result of an MCTS subset search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<T> {
    /// Selected items, in selection order.
    pub selected: Vec<T>,

    /// Pool indices of the selected items, in selection order.
    pub indices: Vec<usize>,

    /// Objective value of the final selection.
    pub reward: f64,

    /// Total simulations run across all epochs.
    pub simulations: usize,

    /// One summary per committed item.
    pub epochs: Vec<EpochSummary>,
}

impl<T> SearchResult<T> {
    /// Pool indices in ascending order, for set comparisons.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices = self.indices.clone();
        indices.sort_unstable();
        indices
    }
}

/// Monte Carlo Tree Search with UCB selection and random play-outs.
///
/// Generic over the random number generator `R`; every random draw
/// (expansion order and play-outs) comes from it, so a seeded generator
/// makes the search reproducible.
pub struct Mcts<R: Rng> {
    config: MctsConfig,
    rng: R,
}

impl<R: Rng> Mcts<R> {
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// The configuration this instance searches with.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Select `target` items out of `pool` without replacement.
    ///
    /// `objective` scores an ordered selection; `params` is handed to it
    /// unexamined on every call. The objective runs once per simulation
    /// plus once on the final selection. With `target == 0` no simulation
    /// runs and the objective scores the empty selection.
    ///
    /// # Errors
    /// Fails if `target` exceeds the pool, the configuration or sampling
    /// policy is invalid, or the objective fails. An objective error aborts
    /// the search and is returned as-is in [`SearchError::Objective`].
    pub fn search<T, P, F, E>(
        &mut self,
        pool: &[T],
        target: usize,
        mut objective: F,
        params: &P,
    ) -> Result<SearchResult<T>, SearchError<E>>
    where
        T: Clone,
        P: ?Sized,
        F: FnMut(&[T], &P) -> Result<f64, E>,
    {
        if target > pool.len() {
            return Err(SearchError::TargetExceedsPool {
                target,
                pool: pool.len(),
            });
        }

        let mut reward_fn =
            |state: &SubsetSelection| objective(state.selected_items(pool).as_slice(), params);

        let (leaf, epochs) =
            self.search_from(SubsetSelection::empty(pool.len()), target, &mut reward_fn)?;
        let reward = reward_fn(&leaf).map_err(SearchError::Objective)?;

        Ok(SearchResult {
            selected: leaf.selected_items(pool),
            indices: leaf.selected().to_vec(),
            reward,
            simulations: epochs.len() * self.config.simulations_per_epoch,
            epochs,
        })
    }

    /// Run the epoch loop from any search state down to `target_depth`.
    ///
    /// `reward_fn` scores leaf states reached by play-outs. Returns the
    /// committed leaf and one summary per epoch.
    pub fn search_from<S, F, E>(
        &mut self,
        root: S,
        target_depth: usize,
        mut reward_fn: F,
    ) -> Result<(S, Vec<EpochSummary>), SearchError<E>>
    where
        S: SearchNode,
        F: FnMut(&S) -> Result<f64, E>,
    {
        self.config.validate().map_err(SearchError::InvalidConfig)?;

        if root.is_leaf(target_depth) {
            return Ok((root, Vec::new()));
        }

        let sampling = self.sampling_policy::<E>(root.num_actions())?;
        let mut tree = Tree::new(root, sampling.clone());
        tree.root_mut().stats.visit_count = 1;

        let mut epochs = Vec::new();
        let mut epoch = 0;
        while !tree.root().state.is_leaf(target_depth) {
            for _ in 0..self.config.simulations_per_epoch {
                self.simulate(&mut tree, target_depth, &sampling, &mut reward_fn)?;
            }
            epochs.push(commit(&mut tree, epoch)?);
            epoch += 1;
        }

        Ok((tree.root().state.clone(), epochs))
    }

    /// The configured sampling policy, or uniform when none is set.
    fn sampling_policy<E>(&self, num_actions: usize) -> Result<SamplingPolicy, SearchError<E>> {
        match &self.config.sampling_policy {
            Some(policy) if policy.len() != num_actions => {
                Err(SearchError::PolicyLengthMismatch {
                    expected: num_actions,
                    actual: policy.len(),
                })
            }
            Some(policy) => Ok(policy.clone()),
            None => Ok(SamplingPolicy::uniform(num_actions)?),
        }
    }

    /// Run a single simulation: select/expand -> play out -> backup.
    fn simulate<S, F, E>(
        &mut self,
        tree: &mut Tree<S>,
        target_depth: usize,
        sampling: &SamplingPolicy,
        reward_fn: &mut F,
    ) -> Result<(), SearchError<E>>
    where
        S: SearchNode,
        F: FnMut(&S) -> Result<f64, E>,
    {
        let node_id = self.tree_policy(tree, target_depth)?;
        tree.set_sampling_distribution(node_id, sampling.clone());

        let node = tree.get(node_id);
        let leaf = rollout(&node.state, target_depth, &node.sampling, &mut self.rng)?;
        let reward = reward_fn(&leaf).map_err(SearchError::Objective)?;
        trace!("simulation from depth {} scored {}", node.state.depth(), reward);

        tree.backup(node_id, reward);
        Ok(())
    }

    /// Descend from the root, expanding the first node that is not fully
    /// explored. Stops at a leaf otherwise.
    fn tree_policy<S: SearchNode>(
        &mut self,
        tree: &mut Tree<S>,
        target_depth: usize,
    ) -> Result<NodeId, TreeError> {
        let mut current = NodeId::ROOT;

        while !tree.get(current).state.is_leaf(target_depth) {
            if !tree.is_fully_explored(current) {
                return tree.expand(current, &mut self.rng);
            }
            current = tree
                .best_child(current, self.config.exploration)?
                .ok_or_else(|| TreeError::NoChildren {
                    depth: tree.get(current).state.depth(),
                })?;
        }

        Ok(current)
    }
}

/// Commit to the best child of the root by mean reward and prune the rest.
fn commit<S: SearchNode>(tree: &mut Tree<S>, epoch: usize) -> Result<EpochSummary, TreeError> {
    let (action, best) = tree
        .best_edge(NodeId::ROOT, 0.0)?
        .ok_or_else(|| TreeError::NoChildren {
            depth: tree.root().state.depth(),
        })?;

    let child = tree.get(best);
    let summary = EpochSummary {
        epoch,
        action,
        root_visits: tree.root().stats.visit_count,
        child_visits: child.stats.visit_count,
        child_mean_reward: child.stats.mean_reward(),
        tree_size: tree.len(),
    };

    debug!(
        "epoch {}: committed action {} (visits {}/{}, mean reward {:.4}, tree size {})",
        summary.epoch,
        summary.action,
        summary.child_visits,
        summary.root_visits,
        summary.child_mean_reward,
        summary.tree_size
    );

    tree.reroot(best);
    Ok(summary)
}

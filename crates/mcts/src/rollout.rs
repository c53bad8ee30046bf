//! Random sampling and the default policy.
//!
//! The default policy finishes a simulation with uninformed random
//! choices: starting from the node reached by the tree policy it applies
//! sampled actions to throwaway states until a leaf is reached. Those
//! states are never stored in the tree.

use crate::tree::TreeError;
use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};
use subset_core::{SamplingPolicy, SearchNode};

/// Sample one of `candidates` with probability proportional to its weight
/// in `policy`.
///
/// Falls back to a uniform choice when every candidate has zero weight.
/// Returns None only when `candidates` is empty.
pub fn sample_action<R: Rng>(
    policy: &SamplingPolicy,
    candidates: &[usize],
    rng: &mut R,
) -> Option<usize> {
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        len => {
            let weights = candidates.iter().map(|&a| policy.get_or_zero(a));
            match WeightedIndex::new(weights) {
                Ok(dist) => Some(candidates[dist.sample(rng)]),
                Err(_) => Some(candidates[rng.gen_range(0..len)]),
            }
        }
    }
}

/// Play random actions from `start` until a leaf at `target_depth`.
///
/// Returns the terminal state reached. The start state is not modified.
pub fn rollout<S: SearchNode, R: Rng>(
    start: &S,
    target_depth: usize,
    policy: &SamplingPolicy,
    rng: &mut R,
) -> Result<S, TreeError> {
    let mut state = start.clone();

    while !state.is_leaf(target_depth) {
        let allowed = state.allowed_actions();
        let action = sample_action(policy, &allowed, rng).ok_or(TreeError::NoAllowedActions {
            depth: state.depth(),
        })?;
        state = state.next_state(action)?;
    }

    Ok(state)
}

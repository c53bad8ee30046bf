//! Selection of `n` items out of a pool of `n_a` without replacement.
//!
//! A state is the ordered sequence of pool indices chosen so far. Action
//! `i` appends pool index `i`; it is only allowed while `i` is unselected.

use std::fmt;
use subset_core::{CoreError, SearchNode};

/// Partial selection over a pool of `pool_size` items.
///
/// Invariant: `mask[i]` is true iff `i` appears in `selected`, and no
/// index appears twice.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubsetSelection {
    selected: Vec<usize>,
    mask: Vec<bool>,
}

impl SubsetSelection {
    /// The empty selection over a pool of the given size.
    pub fn empty(pool_size: usize) -> Self {
        Self {
            selected: Vec::new(),
            mask: vec![false; pool_size],
        }
    }

    /// Build a selection from an ordered sequence of indices.
    ///
    /// # Errors
    /// Returns an error if an index is out of range or repeated.
    pub fn from_indices(pool_size: usize, indices: &[usize]) -> subset_core::Result<Self> {
        indices
            .iter()
            .try_fold(Self::empty(pool_size), |state, &i| state.next_state(i))
    }

    /// Pool indices chosen so far, in selection order.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Membership flags over the pool.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Size of the pool.
    pub fn pool_size(&self) -> usize {
        self.mask.len()
    }

    /// Whether pool index `i` has been chosen.
    pub fn contains(&self, i: usize) -> bool {
        self.mask.get(i).copied().unwrap_or(false)
    }

    /// Map the selection into `pool`, preserving selection order.
    ///
    /// # Panics
    /// Panics if `pool` is shorter than the pool this selection was built for.
    pub fn selected_items<T: Clone>(&self, pool: &[T]) -> Vec<T> {
        self.selected.iter().map(|&i| pool[i].clone()).collect()
    }
}

impl SearchNode for SubsetSelection {
    fn num_actions(&self) -> usize {
        self.mask.len()
    }

    fn depth(&self) -> usize {
        self.selected.len()
    }

    fn next_state(&self, action: usize) -> subset_core::Result<Self> {
        match self.mask.get(action) {
            None => Err(CoreError::ActionOutOfRange {
                action,
                num_actions: self.mask.len(),
            }),
            Some(true) => Err(CoreError::ActionAlreadyTaken(action)),
            Some(false) => {
                let mut next = self.clone();
                next.selected.push(action);
                next.mask[action] = true;
                Ok(next)
            }
        }
    }

    fn allowed_actions(&self) -> Vec<usize> {
        self.mask
            .iter()
            .enumerate()
            .filter(|&(_, &taken)| !taken)
            .map(|(i, _)| i)
            .collect()
    }

    fn is_allowed(&self, action: usize) -> bool {
        self.mask.get(action) == Some(&false)
    }

    fn is_leaf(&self, target_depth: usize) -> bool {
        self.selected.len() == target_depth
    }

    fn is_fully_explored(&self, expanded_children: usize) -> bool {
        expanded_children == self.mask.len() - self.selected.len()
    }
}

impl fmt::Display for SubsetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selected: {:?}", self.selected)
    }
}

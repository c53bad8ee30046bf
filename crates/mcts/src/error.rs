use crate::tree::TreeError;
use subset_core::CoreError;
use thiserror::Error;

/// Errors returned by [`Mcts::search`](crate::Mcts::search).
///
/// `E` is the objective's own error type; it is passed through untouched
/// in [`SearchError::Objective`].
#[derive(Error, Debug)]
pub enum SearchError<E> {
    #[error("cannot select {target} items from a pool of {pool}")]
    TargetExceedsPool { target: usize, pool: usize },

    #[error("sampling policy covers {actual} actions but the pool has {expected}")]
    PolicyLengthMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid sampling policy")]
    Policy(#[from] CoreError),

    #[error("search tree contract violated")]
    Tree(#[from] TreeError),

    #[error("objective failed: {0}")]
    Objective(E),
}

impl<E> SearchError<E> {
    /// The objective's error, if that is what stopped the search.
    pub fn into_objective(self) -> Option<E> {
        match self {
            SearchError::Objective(e) => Some(e),
            _ => None,
        }
    }
}

//! Subset Core - search-state abstractions and common types
//!
//! This crate provides the `SearchNode` trait that defines the interface
//! any combinatorial state must implement to be searched by the
//! `subset_mcts` tree search.
//!
//! # Types
//!
//! - [`SearchNode`] - Trait for search states
//! - [`SamplingPolicy`] - Probability distribution over actions (sums to 1.0)

mod error;
mod node;
mod types;

pub use error::{CoreError, Result};
pub use node::SearchNode;
pub use types::SamplingPolicy;

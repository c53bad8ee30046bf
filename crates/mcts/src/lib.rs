//! Monte Carlo Tree Search for subset selection.
//!
//! This crate chooses `n` items out of a pool of `n_a` without replacement.
//! A caller supplies an objective scoring any ordered selection; the search
//! commits to one item per epoch, guided by random play-outs and
//! backed-up reward statistics.
//!
//! # Features
//!
//! - **Generic core**: tree policy, default policy and backup only depend on
//!   the `subset_core::SearchNode` trait
//! - **UCB Selection**: mean reward plus a sampling-weighted exploration bonus
//! - **Arena Tree**: index handles for children and parents, compacted on
//!   every re-root
//! - **Sampling Policy**: optional non-uniform weights for expansion and
//!   play-outs
//!
//! # Example
//!
//! ```
//! use subset_mcts::{Mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::convert::Infallible;
//!
//! let pool: Vec<u32> = (0..5).collect();
//! let objective = |items: &[u32], _: &()| Ok::<_, Infallible>(items.iter().sum::<u32>() as f64);
//!
//! let config = MctsConfig::with_simulations(200).with_exploration(1.0);
//! let mut mcts = Mcts::new(config, ChaCha8Rng::seed_from_u64(42));
//!
//! let result = mcts.search(&pool, 2, objective, &()).unwrap();
//! assert_eq!(result.selected.len(), 2);
//! println!("Selected: {:?} (reward {})", result.selected, result.reward);
//! ```

pub mod config;
pub mod domains;
mod error;
mod node;
pub mod rollout;
pub mod search;
mod tree;

pub use config::MctsConfig;
pub use domains::SubsetSelection;
pub use error::SearchError;
pub use node::{Node, NodeId, NodeStats};
pub use search::{EpochSummary, Mcts, SearchResult};
pub use tree::{Tree, TreeError};

//! Search domains implementing the `SearchNode` trait.

mod subset;

pub use subset::SubsetSelection;

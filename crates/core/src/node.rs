/// A state in a combinatorial search tree.
///
/// This trait carries the domain half of a search node: what actions exist,
/// what applying one produces, and when the tree bottoms out. Visit and
/// reward statistics, child slots and parent links belong to the tree that
/// stores the states, so any implementation can be searched by the same
/// tree policy, default policy and backup code.
///
/// Actions are flat indices in `0..num_actions()`.
pub trait SearchNode: Clone {
    /// Size of the action space (`n_a`), fixed for the whole tree.
    fn num_actions(&self) -> usize;

    /// Number of actions applied to reach this state from the root.
    fn depth(&self) -> usize;

    /// Applies an action, returning the child state (immutable operation).
    ///
    /// # Errors
    /// Returns an error if the action is outside the action space or is
    /// not allowed from this state.
    fn next_state(&self, action: usize) -> crate::Result<Self>;

    /// Returns every action that may still be taken from this state,
    /// in ascending order.
    fn allowed_actions(&self) -> Vec<usize>;

    /// Returns true if `action` may be taken from this state.
    fn is_allowed(&self, action: usize) -> bool {
        self.allowed_actions().contains(&action)
    }

    /// Returns true if this state is terminal for a tree of the given height.
    fn is_leaf(&self, target_depth: usize) -> bool;

    /// Returns true once `expanded_children` covers every allowed action.
    fn is_fully_explored(&self, expanded_children: usize) -> bool {
        expanded_children == self.allowed_actions().len()
    }
}

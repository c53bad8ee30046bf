//! Sampling policy with enforced invariants.
//!
//! A `SamplingPolicy` is the probability vector a search node uses to pick
//! random or not-yet-expanded children. The type guarantees the vector is
//! non-empty, finite, non-negative and sums to 1.0.

use crate::{CoreError, Result};

/// Tolerance for policy sum validation.
const POLICY_SUM_TOLERANCE: f64 = 1e-9;

/// A probability distribution over actions.
///
/// Invariant: All values are finite, non-negative and sum to 1.0 (±1e-9).
///
/// # Example
/// ```
/// use subset_core::SamplingPolicy;
///
/// let policy = SamplingPolicy::from_unnormalized(vec![1.0, 3.0]).unwrap();
/// assert!((policy[1] - 0.75).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingPolicy(Vec<f64>);

impl SamplingPolicy {
    /// Create a new policy from a probability distribution.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidPolicy` if:
    /// - Vector is empty
    /// - Any value is negative or not finite
    /// - Values don't sum to 1.0 (±1e-9)
    pub fn new(probs: Vec<f64>) -> Result<Self> {
        check_entries(&probs)?;

        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > POLICY_SUM_TOLERANCE {
            return Err(CoreError::InvalidPolicy(format!(
                "policy sum {} is not 1.0 (tolerance {})",
                sum, POLICY_SUM_TOLERANCE
            )));
        }

        Ok(Self(probs))
    }

    /// Create a policy from raw weights, normalizing them to sum to 1.0.
    ///
    /// # Errors
    /// Returns error if the vector is empty, any weight is negative or not
    /// finite, or all weights are zero.
    pub fn from_unnormalized(weights: Vec<f64>) -> Result<Self> {
        check_entries(&weights)?;

        let sum: f64 = weights.iter().sum();
        if sum == 0.0 {
            return Err(CoreError::InvalidPolicy(
                "cannot normalize: all weights are zero".to_string(),
            ));
        }

        Ok(Self(weights.into_iter().map(|w| w / sum).collect()))
    }

    /// Create a uniform policy over the given number of actions.
    ///
    /// # Errors
    /// Returns error if num_actions is zero.
    pub fn uniform(num_actions: usize) -> Result<Self> {
        if num_actions == 0 {
            return Err(CoreError::InvalidPolicy(
                "cannot create uniform policy with 0 actions".to_string(),
            ));
        }

        let prob = 1.0 / num_actions as f64;
        Ok(Self(vec![prob; num_actions]))
    }

    /// Get the probability at the given index.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Get the probability at the given index, returning 0 if out of bounds.
    pub fn get_or_zero(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    /// Get the number of actions in this policy.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the policy is empty (never true for a constructed policy).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the sum of all probabilities (should be ~1.0).
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Get the index of the maximum probability (first one on ties).
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &p) in self.0.iter().enumerate() {
            if p > self.0[best] {
                best = i;
            }
        }
        best
    }

    /// Get the underlying vector (consumes self).
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Get a reference to the underlying slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterate over the probabilities.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }
}

fn check_entries(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(CoreError::InvalidPolicy(
            "policy cannot be empty".to_string(),
        ));
    }

    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(CoreError::InvalidPolicy(format!(
            "policy contains non-finite value {}",
            bad
        )));
    }

    if values.iter().any(|&v| v < 0.0) {
        return Err(CoreError::InvalidPolicy(
            "policy contains negative values".to_string(),
        ));
    }

    Ok(())
}

impl std::ops::Index<usize> for SamplingPolicy {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for SamplingPolicy {
    type Item = f64;
    type IntoIter = std::vec::IntoIter<f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl TryFrom<Vec<f64>> for SamplingPolicy {
    type Error = CoreError;

    /// Renormalizes on conversion, like every policy assignment.
    fn try_from(weights: Vec<f64>) -> Result<Self> {
        Self::from_unnormalized(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_new_valid() {
        let policy = SamplingPolicy::new(vec![0.3, 0.5, 0.2]).unwrap();
        assert_eq!(policy.len(), 3);
        assert!((policy.sum() - 1.0).abs() < POLICY_SUM_TOLERANCE);
    }

    #[test]
    fn test_policy_new_invalid_sum() {
        let result = SamplingPolicy::new(vec![0.3, 0.3, 0.3]);
        assert!(matches!(result, Err(CoreError::InvalidPolicy(_))));
    }

    #[test]
    fn test_policy_new_negative() {
        assert!(SamplingPolicy::new(vec![0.5, -0.2, 0.7]).is_err());
    }

    #[test]
    fn test_policy_new_empty() {
        assert!(SamplingPolicy::new(vec![]).is_err());
    }

    #[test]
    fn test_policy_rejects_nan() {
        assert!(SamplingPolicy::from_unnormalized(vec![1.0, f64::NAN]).is_err());
        assert!(SamplingPolicy::from_unnormalized(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_policy_from_unnormalized() {
        let policy = SamplingPolicy::from_unnormalized(vec![1.0, 2.0, 1.0]).unwrap();
        assert!((policy[0] - 0.25).abs() < 1e-12);
        assert!((policy[1] - 0.50).abs() < 1e-12);
        assert!((policy[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_policy_from_unnormalized_all_zero() {
        assert!(SamplingPolicy::from_unnormalized(vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn test_policy_try_from_renormalizes() {
        let policy = SamplingPolicy::try_from(vec![2.0, 2.0]).unwrap();
        assert_eq!(policy.as_slice(), &[0.5, 0.5]);
    }

    #[test]
    fn test_policy_uniform() {
        let policy = SamplingPolicy::uniform(4).unwrap();
        assert_eq!(policy.len(), 4);
        for p in policy.iter() {
            assert!((p - 0.25).abs() < 1e-12);
        }
        assert!(SamplingPolicy::uniform(0).is_err());
    }

    #[test]
    fn test_policy_argmax_first_on_ties() {
        let policy = SamplingPolicy::new(vec![0.1, 0.45, 0.45]).unwrap();
        assert_eq!(policy.argmax(), 1);
    }

    #[test]
    fn test_policy_get_or_zero() {
        let policy = SamplingPolicy::uniform(2).unwrap();
        assert_eq!(policy.get(5), None);
        assert_eq!(policy.get_or_zero(5), 0.0);
        assert_eq!(policy.get(1), Some(0.5));
    }
}

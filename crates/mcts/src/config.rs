//! MCTS configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo Tree Search algorithm.

use subset_core::SamplingPolicy;

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations per epoch (one epoch commits one item).
    pub simulations_per_epoch: usize,

    /// UCB exploration coefficient used by the tree policy.
    /// 0 = pure exploitation. Commits always use 0.
    pub exploration: f64,

    /// Sampling policy over the pool for random and unexpanded children.
    /// None means uniform. Length must equal the pool size.
    pub sampling_policy: Option<SamplingPolicy>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            simulations_per_epoch: 200,
            exploration: 1.0,
            sampling_policy: None,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of simulations per epoch.
    pub fn with_simulations(simulations_per_epoch: usize) -> Self {
        Self {
            simulations_per_epoch,
            ..Default::default()
        }
    }

    /// Create a config whose tree policy never explores.
    pub fn greedy(simulations_per_epoch: usize) -> Self {
        Self {
            simulations_per_epoch,
            exploration: 0.0,
            ..Default::default()
        }
    }

    /// Replace the exploration coefficient.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Replace the sampling policy.
    pub fn with_sampling_policy(mut self, policy: SamplingPolicy) -> Self {
        self.sampling_policy = Some(policy);
        self
    }

    /// Check the parameters, describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.simulations_per_epoch == 0 {
            return Err("simulations per epoch must be positive".to_string());
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(format!(
                "exploration coefficient {} must be finite and non-negative",
                self.exploration
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.simulations_per_epoch, 200);
        assert!((config.exploration - 1.0).abs() < 1e-12);
        assert!(config.sampling_policy.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_simulations() {
        let config = MctsConfig::with_simulations(100);
        assert_eq!(config.simulations_per_epoch, 100);
        // Other values should be default
        assert!((config.exploration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_greedy() {
        let config = MctsConfig::greedy(50);
        assert_eq!(config.simulations_per_epoch, 50);
        assert_eq!(config.exploration, 0.0);
    }

    #[test]
    fn test_builders() {
        let policy = SamplingPolicy::uniform(3).unwrap();
        let config = MctsConfig::with_simulations(10)
            .with_exploration(2.0)
            .with_sampling_policy(policy.clone());
        assert_eq!(config.exploration, 2.0);
        assert_eq!(config.sampling_policy, Some(policy));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(MctsConfig::with_simulations(0).validate().is_err());
        assert!(MctsConfig::default().with_exploration(-0.5).validate().is_err());
        assert!(MctsConfig::default()
            .with_exploration(f64::NAN)
            .validate()
            .is_err());
    }
}

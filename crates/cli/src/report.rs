//! Serializable search reports.

use crate::objective::ObjectiveKind;
use serde::Serialize;
use std::collections::BTreeMap;
use subset_mcts::{EpochSummary, SearchResult};

/// One committed epoch.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub action: usize,
    pub root_visits: u32,
    pub child_visits: u32,
    pub child_mean_reward: f64,
    pub tree_size: usize,
}

impl From<&EpochSummary> for EpochReport {
    fn from(summary: &EpochSummary) -> Self {
        Self {
            epoch: summary.epoch,
            action: summary.action,
            root_visits: summary.root_visits,
            child_visits: summary.child_visits,
            child_mean_reward: summary.child_mean_reward,
            tree_size: summary.tree_size,
        }
    }
}

/// Outcome of one seeded search.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrialReport {
    pub seed: u64,
    pub indices: Vec<usize>,
    pub selected: Vec<f64>,
    pub reward: f64,
    pub simulations: usize,
    pub epochs: Vec<EpochReport>,
}

impl TrialReport {
    pub fn new(seed: u64, result: &SearchResult<f64>) -> Self {
        Self {
            seed,
            indices: result.indices.clone(),
            selected: result.selected.clone(),
            reward: result.reward,
            simulations: result.simulations,
            epochs: result.epochs.iter().map(EpochReport::from).collect(),
        }
    }
}

/// How often a selection (as a set) came out of the trials.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SelectionCount {
    pub indices: Vec<usize>,
    pub count: usize,
}

/// Aggregate over all trials.
#[derive(Serialize, Debug, Clone)]
pub struct Report {
    pub objective: ObjectiveKind,
    pub pool_size: usize,
    pub target: usize,
    pub best_reward: Option<f64>,
    pub frequencies: Vec<SelectionCount>,
    pub trials: Vec<TrialReport>,
}

impl Report {
    pub fn new(
        objective: ObjectiveKind,
        pool_size: usize,
        target: usize,
        trials: Vec<TrialReport>,
    ) -> Self {
        let best_reward = trials.iter().map(|t| t.reward).reduce(f64::max);

        let mut counts: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
        for trial in &trials {
            let mut key = trial.indices.clone();
            key.sort_unstable();
            *counts.entry(key).or_default() += 1;
        }

        let mut frequencies: Vec<SelectionCount> = counts
            .into_iter()
            .map(|(indices, count)| SelectionCount { indices, count })
            .collect();
        // Stable sort keeps ties in index order.
        frequencies.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            objective,
            pool_size,
            target,
            best_reward,
            frequencies,
            trials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(seed: u64, indices: Vec<usize>, reward: f64) -> TrialReport {
        TrialReport {
            seed,
            selected: indices.iter().map(|&i| i as f64).collect(),
            indices,
            reward,
            simulations: 10,
            epochs: Vec::new(),
        }
    }

    #[test]
    fn test_report_counts_sets() {
        let report = Report::new(
            ObjectiveKind::Sum,
            5,
            2,
            vec![
                trial(0, vec![4, 3], 7.0),
                trial(1, vec![3, 4], 7.0),
                trial(2, vec![2, 4], 6.0),
            ],
        );

        assert_eq!(report.best_reward, Some(7.0));
        assert_eq!(
            report.frequencies[0],
            SelectionCount {
                indices: vec![3, 4],
                count: 2
            }
        );
        assert_eq!(report.frequencies.len(), 2);
    }

    #[test]
    fn test_report_serializes() {
        let report = Report::new(ObjectiveKind::CappedSum, 3, 1, vec![trial(9, vec![1], 1.0)]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["objective"], "capped-sum");
        assert_eq!(json["trials"][0]["seed"], 9);
        assert_eq!(json["frequencies"][0]["count"], 1);
    }
}

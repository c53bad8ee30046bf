//! Built-in objectives for numeric item pools.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Objective used to score a selection of item values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveKind {
    /// Sum of selected values.
    Sum,
    /// Always 0; every selection is equally good.
    Zero,
    /// Smallest selected value (max-min selection).
    Min,
    /// Sum of selected values, penalized past `--cap` by the overshoot.
    CappedSum,
}

/// Parameters passed through the search to the objective untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ObjectiveParams {
    /// Budget for `capped-sum`.
    pub cap: Option<f64>,
}

impl ObjectiveKind {
    /// Fail early if `params` cannot serve this objective.
    pub fn check(self, params: &ObjectiveParams) -> Result<()> {
        if self == ObjectiveKind::CappedSum && params.cap.is_none() {
            bail!("the capped-sum objective needs --cap");
        }
        Ok(())
    }

    /// Score a selection.
    pub fn evaluate(self, items: &[f64], params: &ObjectiveParams) -> Result<f64> {
        let score = match self {
            ObjectiveKind::Sum => items.iter().sum(),
            ObjectiveKind::Zero => 0.0,
            ObjectiveKind::Min => items.iter().copied().reduce(f64::min).unwrap_or(0.0),
            ObjectiveKind::CappedSum => {
                let cap = params.cap.context("capped-sum called without a cap")?;
                let sum: f64 = items.iter().sum();
                if sum <= cap {
                    sum
                } else {
                    cap - (sum - cap)
                }
            }
        };

        if !score.is_finite() {
            bail!("objective produced non-finite score {} for {:?}", score, items);
        }
        Ok(score)
    }
}

//! Subset selection by Monte Carlo Tree Search.
//!
//! Picks `--target` items out of a numeric pool, scoring candidate
//! selections with one of the built-in objectives. Several seeded trials
//! can run in parallel; results are printed as text or JSON.

mod objective;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use objective::{ObjectiveKind, ObjectiveParams};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use report::{Report, TrialReport};
use std::time::Instant;
use subset_core::SamplingPolicy;
use subset_mcts::{Mcts, MctsConfig, SearchError};

/// MCTS subset selection tool.
#[derive(Parser, Debug)]
#[command(name = "subset-select")]
#[command(about = "Select n of n_a items without replacement using Monte Carlo Tree Search")]
struct Cli {
    /// Item values forming the pool (comma separated).
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    items: Option<Vec<f64>>,

    /// Use the values 0..N as the pool instead of --items.
    #[arg(short, long, conflicts_with = "items")]
    pool_size: Option<usize>,

    /// Number of items to select.
    #[arg(short = 'n', long)]
    target: usize,

    /// Number of MCTS simulations per epoch.
    #[arg(short, long, default_value = "200")]
    simulations: usize,

    /// UCB exploration coefficient.
    #[arg(short = 'c', long, default_value = "1.0")]
    exploration: f64,

    /// Sampling weights over the pool (comma separated, renormalized).
    #[arg(short, long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,

    /// Objective used to score selections.
    #[arg(short, long, value_enum, default_value_t = ObjectiveKind::Sum)]
    objective: ObjectiveKind,

    /// Budget for the capped-sum objective.
    #[arg(long, allow_negative_numbers = true)]
    cap: Option<f64>,

    /// Random seed for reproducibility; trial i uses seed + i.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Number of independent trials.
    #[arg(short, long, default_value = "1")]
    trials: usize,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

/// Everything a trial needs, shared read-only across threads.
struct Setup {
    pool: Vec<f64>,
    target: usize,
    config: MctsConfig,
    objective: ObjectiveKind,
    params: ObjectiveParams,
}

impl Setup {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let pool = match (&cli.items, cli.pool_size) {
            (Some(items), _) => items.clone(),
            (None, Some(n)) => (0..n).map(|i| i as f64).collect(),
            (None, None) => bail!("either --items or --pool-size is required"),
        };

        if cli.target > pool.len() {
            bail!(
                "cannot select {} items from a pool of {}",
                cli.target,
                pool.len()
            );
        }

        let mut config =
            MctsConfig::with_simulations(cli.simulations).with_exploration(cli.exploration);
        if let Some(weights) = &cli.weights {
            if weights.len() != pool.len() {
                bail!(
                    "--weights has {} entries but the pool has {}",
                    weights.len(),
                    pool.len()
                );
            }
            let policy = SamplingPolicy::from_unnormalized(weights.clone())
                .context("invalid --weights")?;
            config = config.with_sampling_policy(policy);
        }
        config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid search parameters")?;

        let params = ObjectiveParams { cap: cli.cap };
        cli.objective.check(&params)?;

        Ok(Self {
            pool,
            target: cli.target,
            config,
            objective: cli.objective,
            params,
        })
    }

    /// Run one seeded search.
    fn run_trial(&self, seed: u64) -> Result<TrialReport> {
        let mut mcts = Mcts::new(self.config.clone(), ChaCha8Rng::seed_from_u64(seed));
        let objective = self.objective;

        let result = mcts
            .search(
                &self.pool,
                self.target,
                |items: &[f64], params: &ObjectiveParams| objective.evaluate(items, params),
                &self.params,
            )
            .map_err(|err| match err {
                SearchError::Objective(inner) => inner,
                other => anyhow::Error::new(other),
            })
            .with_context(|| format!("search with seed {} failed", seed))?;

        Ok(TrialReport::new(seed, &result))
    }
}

fn print_text(report: &Report) {
    println!(
        "Objective: {:?}, selecting {} of {}",
        report.objective, report.target, report.pool_size
    );
    println!("================================================");
    for trial in &report.trials {
        println!(
            "seed {:>6}: indices {:?} -> {:?} (reward {:.4})",
            trial.seed, trial.indices, trial.selected, trial.reward
        );
    }
    if report.trials.len() > 1 {
        println!("------------------------------------------------");
        if let Some(best) = report.best_reward {
            println!("Best reward: {:.4}", best);
        }
        for freq in &report.frequencies {
            println!("  {:?}: {} trial(s)", freq.indices, freq.count);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let setup = Setup::from_cli(&cli)?;

    if setup.target == 0 {
        warn!("target is 0; only the empty selection will be scored");
    }
    info!(
        "Selecting {} of {} items with {} simulations per epoch, {} trial(s)",
        setup.target,
        setup.pool.len(),
        setup.config.simulations_per_epoch,
        cli.trials
    );

    let start = Instant::now();
    let trials: Vec<TrialReport> = (0..cli.trials as u64)
        .into_par_iter()
        .map(|i| setup.run_trial(cli.seed.wrapping_add(i)))
        .collect::<Result<_>>()?;
    info!("Completed in {:.2}s", start.elapsed().as_secs_f64());

    let report = Report::new(setup.objective, setup.pool.len(), setup.target, trials);

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{}", json);
    } else {
        print_text(&report);
    }

    Ok(())
}

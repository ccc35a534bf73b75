//! Monte Carlo runner
//!
//! Runs many independent copies of a template scenario and summarizes their
//! terminal values. Every trial owns its scenario copy and its own seeded
//! RNG, so trials run in parallel (with the `parallel` feature) and the
//! collected values depend only on the seed and the trial index.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MonteCarloError, ScenarioError};
use crate::scenario::ScenarioKind;
use crate::stats;

/// Which history a trial's terminal value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerminalValue {
    /// Final value in today's money
    #[default]
    InflationCorrected,
    Nominal,
}

impl TerminalValue {
    fn of(self, scenario: &ScenarioKind) -> f64 {
        match self {
            TerminalValue::InflationCorrected => scenario.final_value(),
            TerminalValue::Nominal => scenario.final_nominal_value(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Base seed for all trials; a random seed is drawn when `None`
    pub seed: Option<u64>,
    pub terminal_value: TerminalValue,
}

impl MonteCarloConfig {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Probability of ending above a savings goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalOutcome {
    pub goal: f64,
    /// Fraction (0-1) of all trials, outliers included, ending strictly above `goal`
    pub probability: f64,
}

/// Summary of terminal values across trials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloStats {
    pub scenario_name: String,
    pub num_runs: usize,
    pub outliers_removed: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Low median
    pub median: f64,
    pub mad: f64,
    pub min: f64,
    pub max: f64,
    pub p10: f64,
    pub p90: f64,
    pub goal: Option<GoalOutcome>,
}

/// Runs are produced by [`MonteCarlo::run`] only, so the runner can be
/// serialized for export but not loaded back.
#[derive(Debug, Clone, Serialize)]
pub struct MonteCarlo {
    scenario: ScenarioKind,
    seed: u64,
    terminal_value: TerminalValue,
    runs: Vec<ScenarioKind>,
    raw_values: Vec<f64>,
}

/// Spread trial indices across the seed space
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

fn trial_rng(seed: u64, trial: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ (trial as u64).wrapping_mul(SEED_STRIDE))
}

impl MonteCarlo {
    /// Copy and reset `template`; the caller's scenario is never touched
    pub fn new(template: impl Into<ScenarioKind>, config: MonteCarloConfig) -> Self {
        let mut scenario = template.into();
        scenario.reset();

        Self {
            scenario,
            seed: config.seed.unwrap_or_else(rand::random),
            terminal_value: config.terminal_value,
            runs: Vec::new(),
            raw_values: Vec::new(),
        }
    }

    /// The reset template every trial is copied from
    #[must_use]
    pub fn scenario(&self) -> &ScenarioKind {
        &self.scenario
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Every completed trial, in trial order
    #[must_use]
    pub fn runs(&self) -> &[ScenarioKind] {
        &self.runs
    }

    /// Terminal value of every trial, in trial order
    #[must_use]
    pub fn raw_values(&self) -> &[f64] {
        &self.raw_values
    }

    /// Run `n` more trials.
    ///
    /// If any trial fails nothing from this batch is kept.
    pub fn run(&mut self, n: usize) -> Result<(), MonteCarloError> {
        let first = self.runs.len();
        info!(
            scenario = self.scenario.name(),
            runs = n,
            seed = self.seed,
            "Starting Monte Carlo simulation"
        );

        let trials = self.simulate_trials(first..first + n)?;

        self.raw_values
            .extend(trials.iter().map(|s| self.terminal_value.of(s)));
        self.runs.extend(trials);

        info!(
            scenario = self.scenario.name(),
            total_runs = self.runs.len(),
            "Monte Carlo simulation complete"
        );
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn simulate_trials(
        &self,
        trials: std::ops::Range<usize>,
    ) -> Result<Vec<ScenarioKind>, ScenarioError> {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        trials
            .into_par_iter()
            .map(|trial| self.simulate_trial(trial))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn simulate_trials(
        &self,
        trials: std::ops::Range<usize>,
    ) -> Result<Vec<ScenarioKind>, ScenarioError> {
        trials.map(|trial| self.simulate_trial(trial)).collect()
    }

    fn simulate_trial(&self, trial: usize) -> Result<ScenarioKind, ScenarioError> {
        let mut scenario = self.scenario.clone();
        let mut rng = trial_rng(self.seed, trial);
        scenario.run(&mut rng)?;
        Ok(scenario)
    }

    /// Terminal values, optionally with high outliers trimmed
    #[must_use]
    pub fn values(&self, remove_outliers: bool) -> Vec<f64> {
        if remove_outliers {
            stats::remove_outliers(&self.raw_values)
        } else {
            self.raw_values.clone()
        }
    }

    /// Fraction of all trials ending strictly above `goal`
    #[must_use]
    pub fn goal_probability(&self, goal: f64) -> Option<f64> {
        if self.raw_values.is_empty() {
            return None;
        }
        let successes = self.raw_values.iter().filter(|v| **v > goal).count();
        Some(successes as f64 / self.raw_values.len() as f64)
    }

    pub fn results(
        &self,
        goal: Option<f64>,
        remove_outliers: bool,
    ) -> Result<MonteCarloStats, MonteCarloError> {
        let values = self.values(remove_outliers);
        let not_enough = MonteCarloError::NotEnoughRuns {
            runs: values.len(),
        };

        let (Some(mean), Some(std_dev)) = (stats::mean(&values), stats::sample_std_dev(&values))
        else {
            return Err(not_enough);
        };
        let (Some(median), Some(mad), Some(p10), Some(p90)) = (
            stats::median_low(&values),
            stats::median_absolute_deviation(&values),
            stats::percentile_nearest(&values, 10.0),
            stats::percentile_nearest(&values, 90.0),
        ) else {
            return Err(not_enough);
        };

        let goal = goal.and_then(|goal| {
            self.goal_probability(goal)
                .map(|probability| GoalOutcome { goal, probability })
        });

        Ok(MonteCarloStats {
            scenario_name: self.scenario.name().to_string(),
            num_runs: self.runs.len(),
            outliers_removed: self.raw_values.len() - values.len(),
            mean,
            std_dev,
            median,
            mad,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            p10,
            p90,
            goal,
        })
    }

    /// The trial whose terminal value is the low median
    #[must_use]
    pub fn median_run(&self, remove_outliers: bool) -> Option<&ScenarioKind> {
        let target = stats::median_low(&self.values(remove_outliers))?;
        self.run_with_value(target)
    }

    /// The trial whose terminal value is the nearest-rank percentile `p`
    #[must_use]
    pub fn percentile_run(&self, p: f64, remove_outliers: bool) -> Option<&ScenarioKind> {
        let target = stats::percentile_nearest(&self.values(remove_outliers), p)?;
        self.run_with_value(target)
    }

    fn run_with_value(&self, target: f64) -> Option<&ScenarioKind> {
        self.raw_values
            .iter()
            .position(|v| v.to_bits() == target.to_bits())
            .and_then(|index| self.runs.get(index))
    }
}

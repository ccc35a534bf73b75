//! Scenarios drive a portfolio through yearly steps and record its history.
//!
//! [`Scenario`] covers a single phase; [`PiecewiseScenario`] chains several
//! phases. [`ScenarioKind`] gives both the same run/reset/history surface.

mod history;
mod piecewise;
mod report;
mod single;

pub use history::{ScenarioHistory, percent_change};
pub use piecewise::PiecewiseScenario;
pub use report::{ReturnSummary, ScenarioReport, YearReturn};
pub use single::{
    ContributionSchedule, DEFAULT_INFLATION_RATE_PERCENT, GlidePath, Scenario, ScenarioBuilder,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::model::Portfolio;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScenarioKind {
    Single(Scenario),
    Piecewise(PiecewiseScenario),
}

impl ScenarioKind {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ScenarioKind::Single(s) => s.name(),
            ScenarioKind::Piecewise(s) => s.name(),
        }
    }

    #[must_use]
    pub fn num_years(&self) -> u32 {
        match self {
            ScenarioKind::Single(s) => s.num_years(),
            ScenarioKind::Piecewise(s) => s.num_years(),
        }
    }

    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ScenarioError> {
        match self {
            ScenarioKind::Single(s) => s.run(rng),
            ScenarioKind::Piecewise(s) => s.run(rng),
        }
    }

    pub fn reset(&mut self) {
        match self {
            ScenarioKind::Single(s) => s.reset(),
            ScenarioKind::Piecewise(s) => s.reset(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &ScenarioHistory {
        match self {
            ScenarioKind::Single(s) => s.history(),
            ScenarioKind::Piecewise(s) => s.history(),
        }
    }

    /// Inflation-corrected snapshots, year 0 first
    #[must_use]
    pub fn corrected_history(&self) -> &[Portfolio] {
        self.history().corrected()
    }

    #[must_use]
    pub fn uncorrected_history(&self) -> &[Portfolio] {
        self.history().nominal()
    }

    #[must_use]
    pub fn returns(&self) -> &[f64] {
        self.history().returns()
    }

    #[must_use]
    pub fn uncorrected_returns(&self) -> &[f64] {
        self.history().nominal_returns()
    }

    /// Inflation-corrected value at the end of the recorded history
    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.history().last().value()
    }

    #[must_use]
    pub fn final_nominal_value(&self) -> f64 {
        self.history().last_nominal().value()
    }

    pub fn report(&self) -> Result<ScenarioReport, ScenarioError> {
        match self {
            ScenarioKind::Single(s) => s.report(),
            ScenarioKind::Piecewise(s) => s.report(),
        }
    }
}

impl From<Scenario> for ScenarioKind {
    fn from(scenario: Scenario) -> Self {
        ScenarioKind::Single(scenario)
    }
}

impl From<PiecewiseScenario> for ScenarioKind {
    fn from(scenario: PiecewiseScenario) -> Self {
        ScenarioKind::Piecewise(scenario)
    }
}

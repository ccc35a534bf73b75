//! Sequential composition of scenarios
//!
//! Each phase after the first starts from the value the previous phase ended
//! with. Only the first phase's starting money matters; later phases keep
//! their weights, contributions and glide paths.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::history::ScenarioHistory;
use super::report::ScenarioReport;
use super::single::Scenario;
use crate::error::ScenarioError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredPiecewise")]
pub struct PiecewiseScenario {
    name: String,
    phases: Vec<Scenario>,
    history: ScenarioHistory,
}

/// Unchecked wire form of [`PiecewiseScenario`]
#[derive(Deserialize)]
struct StoredPiecewise {
    name: String,
    phases: Vec<Scenario>,
    history: ScenarioHistory,
}

impl TryFrom<StoredPiecewise> for PiecewiseScenario {
    type Error = ScenarioError;

    fn try_from(stored: StoredPiecewise) -> Result<Self, Self::Error> {
        let mut scenario = Self::new(stored.name, stored.phases)?;
        scenario.history = stored.history;
        Ok(scenario)
    }
}

impl PiecewiseScenario {
    pub fn new(name: impl Into<String>, phases: Vec<Scenario>) -> Result<Self, ScenarioError> {
        let first = phases.first().ok_or(ScenarioError::EmptyPiecewise)?;
        let history = ScenarioHistory::starting_at(first.initial_portfolio());

        Ok(Self {
            name: name.into(),
            phases,
            history,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phases(&self) -> &[Scenario] {
        &self.phases
    }

    /// Total duration across all phases
    #[must_use]
    pub fn num_years(&self) -> u32 {
        self.phases.iter().map(Scenario::num_years).sum()
    }

    #[must_use]
    pub fn history(&self) -> &ScenarioHistory {
        &self.history
    }

    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.history.last().value()
    }

    /// Run every phase in order, carrying the ending value forward
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ScenarioError> {
        let mut value = self.phases[0].portfolio().value();
        let mut year = 0;

        for (index, phase) in self.phases.iter_mut().enumerate() {
            debug!(
                scenario = %self.name,
                phase = index,
                start_year = year,
                carried_value = value,
                "Starting phase"
            );

            phase.begin_phase(value, year);
            phase.run_from(year, rng)?;

            year += phase.num_years();
            value = phase.portfolio().value();
            self.history.extend_from(phase.history());
        }

        Ok(())
    }

    /// Reset every phase, then drop the aggregated history
    pub fn reset(&mut self) {
        for phase in &mut self.phases {
            phase.reset();
        }
        self.history = ScenarioHistory::starting_at(self.phases[0].initial_portfolio());
    }

    /// Report using the first phase's portfolio name, inflation rate and
    /// rebalancing policy
    pub fn report(&self) -> Result<ScenarioReport, ScenarioError> {
        let first = &self.phases[0];
        ScenarioReport::from_history(
            &self.name,
            first.portfolio().name(),
            first.inflation_rate(),
            first.rebalances(),
            &self.history,
        )
    }
}

//! Single-phase scenario: one portfolio, one contribution schedule

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::history::{ScenarioHistory, percent_change};
use super::report::ScenarioReport;
use crate::error::ScenarioError;
use crate::inflation::discount_factor;
use crate::model::{Portfolio, normalize_weights};

pub const DEFAULT_INFLATION_RATE_PERCENT: f64 = 3.5;

/// Yearly amount added to (or, when negative, withdrawn from) the portfolio
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContributionSchedule {
    /// Amount traded in the first simulated year
    pub annual_amount: f64,
    /// Fractional growth of the amount from one year to the next
    pub annual_increase: f64,
}

impl ContributionSchedule {
    /// Amount traded in the zero-based simulated year `step`
    #[must_use]
    pub fn amount_for(&self, step: u32) -> f64 {
        (0..step).fold(self.annual_amount, |amount, _| {
            amount + amount * self.annual_increase
        })
    }
}

/// Linear drift of target weights from `start` (first simulated year) to
/// the end vector (last simulated year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlidePath {
    start: Vec<f64>,
    slopes: Vec<f64>,
}

impl GlidePath {
    fn new(start: &[f64], end: &[f64], num_years: u32) -> Self {
        let span = f64::from(num_years - 1);
        Self {
            start: start.to_vec(),
            slopes: start.iter().zip(end).map(|(s, e)| (e - s) / span).collect(),
        }
    }

    /// Raw target weights for the zero-based simulated year `step`
    #[must_use]
    pub fn weights_at(&self, step: u32) -> Vec<f64> {
        let step = f64::from(step);
        self.start
            .iter()
            .zip(&self.slopes)
            .map(|(w, slope)| (w + slope * step).max(0.0))
            .collect()
    }
}

/// Drives a portfolio through `num_years` yearly steps: glide-path
/// rebalance, contribution, growth, optional rebalance, inflation correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    initial: Portfolio,
    portfolio: Portfolio,
    num_years: u32,
    inflation_rate: f64,
    rebalance: bool,
    contributions: ContributionSchedule,
    glide_path: Option<GlidePath>,
    history: ScenarioHistory,
}

impl Scenario {
    /// Start building a scenario over a copy of `portfolio`
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        portfolio: &Portfolio,
        num_years: u32,
    ) -> ScenarioBuilder {
        ScenarioBuilder::new(name, portfolio, num_years)
    }

    /// Scenario with default inflation, yearly rebalancing and no contributions
    pub fn new(
        name: impl Into<String>,
        portfolio: &Portfolio,
        num_years: u32,
    ) -> Result<Self, ScenarioError> {
        Self::builder(name, portfolio, num_years).build()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The portfolio as it currently stands
    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// The configured starting portfolio restored by [`Scenario::reset`]
    #[must_use]
    pub fn initial_portfolio(&self) -> &Portfolio {
        &self.initial
    }

    #[must_use]
    pub fn num_years(&self) -> u32 {
        self.num_years
    }

    /// Annual inflation rate as a fraction
    #[must_use]
    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    #[must_use]
    pub fn rebalances(&self) -> bool {
        self.rebalance
    }

    #[must_use]
    pub fn contributions(&self) -> ContributionSchedule {
        self.contributions
    }

    #[must_use]
    pub fn glide_path(&self) -> Option<&GlidePath> {
        self.glide_path.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &ScenarioHistory {
        &self.history
    }

    /// Inflation-corrected value of the last recorded snapshot
    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.history.last().value()
    }

    /// Simulate every year of the scenario.
    ///
    /// Call [`Scenario::reset`] before running a scenario a second time.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ScenarioError> {
        self.run_from(0, rng)
    }

    /// Restore the starting portfolio and drop all recorded years
    pub fn reset(&mut self) {
        self.portfolio = self.initial.clone();
        self.history = ScenarioHistory::starting_at(&self.initial);
    }

    pub fn report(&self) -> Result<ScenarioReport, ScenarioError> {
        ScenarioReport::from_history(
            &self.name,
            self.portfolio.name(),
            self.inflation_rate,
            self.rebalance,
            &self.history,
        )
    }

    /// Replace the portfolio's money with `value` (keeping its target
    /// weights) and record that as the starting snapshot of a phase that
    /// begins `start_year` years into a longer horizon.
    pub(crate) fn begin_phase(&mut self, value: f64, start_year: u32) {
        self.portfolio.clear();
        self.portfolio.trade(value);
        self.history = ScenarioHistory::starting_at_pair(
            self.portfolio
                .discounted(discount_factor(start_year, self.inflation_rate)),
            self.portfolio.clone(),
        );
    }

    /// Run all years; `start_year` offsets the inflation correction
    pub(crate) fn run_from<R: Rng + ?Sized>(
        &mut self,
        start_year: u32,
        rng: &mut R,
    ) -> Result<(), ScenarioError> {
        let mut contribution = self.contributions.annual_amount;

        for step in 0..self.num_years {
            if let Some(glide_path) = &self.glide_path {
                let weights = glide_path.weights_at(step);
                self.portfolio.rebalance(Some(&weights))?;
            }

            self.portfolio.trade(contribution);
            contribution += contribution * self.contributions.annual_increase;

            self.simulate_year(start_year, rng)?;
        }

        debug!(
            scenario = %self.name,
            years = self.num_years,
            start_year,
            final_value = self.final_value(),
            final_nominal = self.history.last_nominal().value(),
            "Scenario complete"
        );
        Ok(())
    }

    fn simulate_year<R: Rng + ?Sized>(
        &mut self,
        start_year: u32,
        rng: &mut R,
    ) -> Result<(), ScenarioError> {
        let previous = self.portfolio.value();

        self.portfolio.simulate(rng);
        let value = self.portfolio.value();

        if self.rebalance {
            self.portfolio.rebalance(None)?;
        }

        // Count years across the whole horizon so phased scenarios keep
        // compounding inflation where the previous phase stopped
        let year = start_year + self.history.years() as u32 + 1;
        let factor = discount_factor(year, self.inflation_rate);
        let corrected = value * factor;
        let corrected_previous = previous * discount_factor(year - 1, self.inflation_rate);

        trace!(year, nominal = value, corrected, "Simulated year");

        self.history.record(
            self.portfolio.discounted(factor),
            percent_change(corrected_previous, corrected),
            self.portfolio.clone(),
            percent_change(previous, value),
        );
        Ok(())
    }
}

/// Builder for [`Scenario`]; percentages are given as `3.5` for 3.5%
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    portfolio: Portfolio,
    num_years: u32,
    inflation_rate_percent: f64,
    rebalance: bool,
    annual_contribution: f64,
    annual_contribution_increase_percent: f64,
    end_weights: Option<Vec<f64>>,
}

impl ScenarioBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, portfolio: &Portfolio, num_years: u32) -> Self {
        Self {
            name: name.into(),
            portfolio: portfolio.clone(),
            num_years,
            inflation_rate_percent: DEFAULT_INFLATION_RATE_PERCENT,
            rebalance: true,
            annual_contribution: 0.0,
            annual_contribution_increase_percent: 0.0,
            end_weights: None,
        }
    }

    #[must_use]
    pub fn inflation_rate_percent(mut self, rate: f64) -> Self {
        self.inflation_rate_percent = rate;
        self
    }

    /// Rebalance back to target weights after every year (default: on)
    #[must_use]
    pub fn rebalance(mut self, rebalance: bool) -> Self {
        self.rebalance = rebalance;
        self
    }

    /// Amount added in the first year; negative values withdraw
    #[must_use]
    pub fn annual_contribution(mut self, amount: f64) -> Self {
        self.annual_contribution = amount;
        self
    }

    #[must_use]
    pub fn annual_contribution_increase_percent(mut self, percent: f64) -> Self {
        self.annual_contribution_increase_percent = percent;
        self
    }

    /// Drift target weights linearly from the portfolio's weights to these
    /// over the scenario (raw weights, normalized like the portfolio's)
    #[must_use]
    pub fn end_weights(mut self, weights: Vec<f64>) -> Self {
        self.end_weights = Some(weights);
        self
    }

    pub fn build(self) -> Result<Scenario, ScenarioError> {
        if self.num_years == 0 {
            return Err(ScenarioError::ZeroDuration);
        }

        let glide_path = match &self.end_weights {
            Some(end) => {
                let expected = self.portfolio.positions().len();
                if end.len() != expected {
                    return Err(ScenarioError::GlidePathLength {
                        expected,
                        actual: end.len(),
                    });
                }
                if self.num_years < 2 {
                    return Err(ScenarioError::GlidePathTooShort {
                        num_years: self.num_years,
                    });
                }
                let end = normalize_weights(end, expected)?;
                Some(GlidePath::new(
                    self.portfolio.weights(),
                    &end,
                    self.num_years,
                ))
            }
            None => None,
        };

        Ok(Scenario {
            name: self.name,
            history: ScenarioHistory::starting_at(&self.portfolio),
            initial: self.portfolio.clone(),
            portfolio: self.portfolio,
            num_years: self.num_years,
            inflation_rate: self.inflation_rate_percent / 100.0,
            rebalance: self.rebalance,
            contributions: ContributionSchedule {
                annual_amount: self.annual_contribution,
                annual_increase: self.annual_contribution_increase_percent / 100.0,
            },
            glide_path,
        })
    }
}

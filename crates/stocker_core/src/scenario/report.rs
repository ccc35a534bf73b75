//! Structured summary of a completed scenario
//!
//! Text layout is left to the caller; this only gathers the numbers.

use serde::{Deserialize, Serialize};

use super::history::ScenarioHistory;
use crate::error::ScenarioError;
use crate::model::Portfolio;

/// A yearly return and the 1-based year it occurred in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearReturn {
    pub year: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub average: f64,
    pub best: YearReturn,
    pub worst: YearReturn,
}

impl ReturnSummary {
    /// Summarize a non-empty series of yearly returns; ties report the earliest year
    #[must_use]
    pub fn from_returns(returns: &[f64]) -> Option<Self> {
        let (&first, rest) = returns.split_first()?;
        let mut best = YearReturn {
            year: 1,
            rate: first,
        };
        let mut worst = best;

        for (offset, &rate) in rest.iter().enumerate() {
            let year = offset + 2;
            if rate > best.rate {
                best = YearReturn { year, rate };
            }
            if rate < worst.rate {
                worst = YearReturn { year, rate };
            }
        }

        Some(Self {
            average: returns.iter().sum::<f64>() / returns.len() as f64,
            best,
            worst,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub portfolio_name: String,
    pub duration_years: usize,
    pub inflation_rate: f64,
    pub rebalance: bool,
    pub start: Portfolio,
    /// Final snapshot in today's money
    pub end: Portfolio,
    pub end_nominal: Portfolio,
    pub nominal_returns: ReturnSummary,
    pub corrected_returns: ReturnSummary,
}

impl ScenarioReport {
    pub fn from_history(
        scenario_name: &str,
        portfolio_name: &str,
        inflation_rate: f64,
        rebalance: bool,
        history: &ScenarioHistory,
    ) -> Result<Self, ScenarioError> {
        let nominal_returns =
            ReturnSummary::from_returns(history.nominal_returns()).ok_or(ScenarioError::NotRun)?;
        let corrected_returns =
            ReturnSummary::from_returns(history.returns()).ok_or(ScenarioError::NotRun)?;

        Ok(Self {
            scenario_name: scenario_name.to_string(),
            portfolio_name: portfolio_name.to_string(),
            duration_years: history.years(),
            inflation_rate,
            rebalance,
            start: history.start().clone(),
            end: history.last().clone(),
            end_nominal: history.last_nominal().clone(),
            nominal_returns,
            corrected_returns,
        })
    }
}

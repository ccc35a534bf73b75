//! Year-indexed record of a scenario's portfolio snapshots and returns

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::model::Portfolio;

/// Snapshots indexed by year (0 is the starting state) in both today's money
/// and nominal terms, plus one return per simulated year for each series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredHistory")]
pub struct ScenarioHistory {
    corrected: Vec<Portfolio>,
    nominal: Vec<Portfolio>,
    returns: Vec<f64>,
    nominal_returns: Vec<f64>,
}

/// Unchecked wire form of [`ScenarioHistory`]
#[derive(Deserialize)]
struct StoredHistory {
    corrected: Vec<Portfolio>,
    nominal: Vec<Portfolio>,
    returns: Vec<f64>,
    nominal_returns: Vec<f64>,
}

impl TryFrom<StoredHistory> for ScenarioHistory {
    type Error = ScenarioError;

    fn try_from(stored: StoredHistory) -> Result<Self, Self::Error> {
        if stored.corrected.is_empty() {
            return Err(ScenarioError::InvalidHistory {
                reason: "no starting snapshot",
            });
        }
        if stored.nominal.len() != stored.corrected.len() {
            return Err(ScenarioError::InvalidHistory {
                reason: "corrected and nominal snapshot counts differ",
            });
        }
        if stored.returns.len() + 1 != stored.corrected.len()
            || stored.nominal_returns.len() != stored.returns.len()
        {
            return Err(ScenarioError::InvalidHistory {
                reason: "expected one return per simulated year",
            });
        }

        Ok(Self {
            corrected: stored.corrected,
            nominal: stored.nominal,
            returns: stored.returns,
            nominal_returns: stored.nominal_returns,
        })
    }
}

/// Fractional change from `previous` to `current`, 0 when `previous` is empty
#[must_use]
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous
    } else {
        0.0
    }
}

impl ScenarioHistory {
    /// History holding only the starting snapshot
    #[must_use]
    pub fn starting_at(start: &Portfolio) -> Self {
        Self::starting_at_pair(start.clone(), start.clone())
    }

    /// History whose starting snapshot differs between the two series
    #[must_use]
    pub fn starting_at_pair(corrected: Portfolio, nominal: Portfolio) -> Self {
        Self {
            corrected: vec![corrected],
            nominal: vec![nominal],
            returns: Vec::new(),
            nominal_returns: Vec::new(),
        }
    }

    /// Number of simulated years recorded so far
    #[must_use]
    pub fn years(&self) -> usize {
        self.corrected.len() - 1
    }

    /// Inflation-corrected snapshots
    #[must_use]
    pub fn corrected(&self) -> &[Portfolio] {
        &self.corrected
    }

    /// Nominal snapshots
    #[must_use]
    pub fn nominal(&self) -> &[Portfolio] {
        &self.nominal
    }

    /// Inflation-corrected yearly returns
    #[must_use]
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    #[must_use]
    pub fn nominal_returns(&self) -> &[f64] {
        &self.nominal_returns
    }

    #[must_use]
    pub fn start(&self) -> &Portfolio {
        &self.corrected[0]
    }

    /// Last inflation-corrected snapshot
    #[must_use]
    pub fn last(&self) -> &Portfolio {
        &self.corrected[self.corrected.len() - 1]
    }

    #[must_use]
    pub fn last_nominal(&self) -> &Portfolio {
        &self.nominal[self.nominal.len() - 1]
    }

    pub(crate) fn record(
        &mut self,
        corrected: Portfolio,
        corrected_return: f64,
        nominal: Portfolio,
        nominal_return: f64,
    ) {
        self.corrected.push(corrected);
        self.returns.push(corrected_return);
        self.nominal.push(nominal);
        self.nominal_returns.push(nominal_return);
    }

    /// Append every simulated year of `other`, skipping its starting snapshot
    pub(crate) fn extend_from(&mut self, other: &ScenarioHistory) {
        self.corrected.extend_from_slice(&other.corrected[1..]);
        self.nominal.extend_from_slice(&other.nominal[1..]);
        self.returns.extend_from_slice(&other.returns);
        self.nominal_returns.extend_from_slice(&other.nominal_returns);
    }
}

//! A single asset-class holding

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::PositionError;

/// A named holding in one asset class with an expected annual return and
/// volatility, both stored as fractions (0.07 = 7%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    name: String,
    value: f64,
    mean_return: f64,
    std_dev: f64,
}

impl Position {
    /// Create a position from percentage parameters (`10.2` = 10.2% per year)
    pub fn new(
        name: impl Into<String>,
        mean_return_percent: f64,
        std_dev_percent: f64,
        value: f64,
    ) -> Result<Self, PositionError> {
        Self::from_fractions(
            name,
            mean_return_percent / 100.0,
            std_dev_percent / 100.0,
            value,
        )
    }

    /// Create a position from fractional parameters (`0.102` = 10.2% per year)
    pub fn from_fractions(
        name: impl Into<String>,
        mean_return: f64,
        std_dev: f64,
        value: f64,
    ) -> Result<Self, PositionError> {
        let name = name.into();
        if !mean_return.is_finite() || !std_dev.is_finite() {
            return Err(PositionError::InvalidParameters {
                name,
                mean_return,
                std_dev,
                reason: "parameters must be finite",
            });
        }
        if std_dev < 0.0 {
            return Err(PositionError::InvalidParameters {
                name,
                mean_return,
                std_dev,
                reason: "std_dev must be non-negative",
            });
        }
        if !value.is_finite() || value < 0.0 {
            return Err(PositionError::InvalidValue { name, value });
        }

        Ok(Self {
            name,
            value,
            mean_return,
            std_dev,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn mean_return(&self) -> f64 {
        self.mean_return
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Deposit (positive) or withdraw (negative) `amount`.
    ///
    /// Withdrawing more than the balance empties the position.
    pub fn trade(&mut self, amount: f64) {
        self.value += amount;
        if self.value < 0.0 {
            self.value = 0.0;
        }
    }

    /// Simulate one year of growth and return the dollar change.
    ///
    /// Both the expected growth and the volatility scale with the current
    /// value, so an empty position stays empty and no draw is made for it.
    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if self.value <= 0.0 {
            return 0.0;
        }

        let mut this_return = self.mean_return * self.value;
        if self.std_dev > 0.0 {
            let z: f64 = rng.sample(StandardNormal);
            this_return += z * self.std_dev * self.value;
        }

        let before = self.value;
        self.trade(this_return);
        self.value - before
    }

    /// Copy of this position with its value multiplied by `factor`
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            ..self.clone()
        }
    }
}

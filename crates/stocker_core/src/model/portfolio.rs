//! Weighted collections of positions

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::error::PortfolioError;

/// Maximum change in total value a rebalance may cause before it is
/// treated as a bookkeeping error
pub const REBALANCE_TOLERANCE: f64 = 1.0;

/// An ordered set of positions with normalized target weights.
///
/// The number of positions is fixed for the lifetime of the portfolio;
/// target weights may be replaced but always keep the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    name: String,
    positions: Vec<Position>,
    weights: Vec<f64>,
}

/// Validate raw weights against a position count and normalize them to sum to 1
pub fn normalize_weights(raw: &[f64], positions: usize) -> Result<Vec<f64>, PortfolioError> {
    if raw.len() != positions {
        return Err(PortfolioError::WeightCountMismatch {
            weights: raw.len(),
            positions,
        });
    }
    if let Some((index, &weight)) = raw
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(PortfolioError::InvalidWeight { index, weight });
    }

    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return Err(PortfolioError::ZeroTotalWeight);
    }

    Ok(raw.iter().map(|w| w / total).collect())
}

impl Portfolio {
    /// Build a portfolio and spread `value` across the positions by weight.
    ///
    /// `weights` need not be normalized: `[7, 3]` means 70% / 30%.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Position>,
        weights: &[f64],
        value: f64,
    ) -> Result<Self, PortfolioError> {
        if positions.is_empty() {
            return Err(PortfolioError::Empty);
        }
        let weights = normalize_weights(weights, positions.len())?;
        if !value.is_finite() || value < 0.0 {
            return Err(PortfolioError::InvalidInitialValue(value));
        }

        let mut portfolio = Self {
            name: name.into(),
            positions,
            weights,
        };
        portfolio.trade(value);
        Ok(portfolio)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Normalized target weights
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Total value of all positions
    #[must_use]
    pub fn value(&self) -> f64 {
        self.positions.iter().map(Position::value).sum()
    }

    /// Current share of the total value held by each position.
    ///
    /// An empty portfolio reports its target weights.
    #[must_use]
    pub fn allocation(&self) -> Vec<f64> {
        let value = self.value();
        if value > 0.0 {
            self.positions.iter().map(|p| p.value() / value).collect()
        } else {
            self.weights.clone()
        }
    }

    /// Replace the target weights without moving any money
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<(), PortfolioError> {
        self.weights = normalize_weights(weights, self.positions.len())?;
        Ok(())
    }

    /// Split `amount` across positions by target weight.
    ///
    /// Negative amounts withdraw; a position cannot drop below zero.
    pub fn trade(&mut self, amount: f64) {
        for (position, weight) in self.positions.iter_mut().zip(&self.weights) {
            position.trade(amount * weight);
        }
    }

    /// Withdraw everything from every position
    pub fn clear(&mut self) {
        for position in &mut self.positions {
            position.trade(-position.value());
        }
    }

    /// Move money between positions so each holds its target share of the total.
    ///
    /// When `new_weights` is given the targets are replaced first. The total
    /// value must not move by more than [`REBALANCE_TOLERANCE`].
    pub fn rebalance(&mut self, new_weights: Option<&[f64]>) -> Result<(), PortfolioError> {
        let before = self.value();

        if let Some(weights) = new_weights {
            self.set_weights(weights)?;
        }

        if before > 0.0 {
            for (position, weight) in self.positions.iter_mut().zip(&self.weights) {
                let correction = weight * before - position.value();
                position.trade(correction);
            }
        }

        // Only weights that skipped normalization, such as a portfolio
        // loaded from JSON, can move the total
        let after = self.value();
        if (after - before).abs() > REBALANCE_TOLERANCE {
            return Err(PortfolioError::RebalanceDrift { before, after });
        }
        Ok(())
    }

    /// Simulate one year of growth for every position independently
    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for position in &mut self.positions {
            position.simulate(rng);
        }
    }

    /// Snapshot with every position scaled by `factor`, keeping weights
    #[must_use]
    pub fn discounted(&self, factor: f64) -> Self {
        Self {
            name: self.name.clone(),
            positions: self.positions.iter().map(|p| p.scaled(factor)).collect(),
            weights: self.weights.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn stocks_and_bonds(value: f64) -> Portfolio {
        Portfolio::new(
            "Stocks and Bonds",
            vec![
                Position::new("Domestic Equities", 10.2, 19.8, 0.0).unwrap(),
                Position::new("Domestic Fixed Income", 5.3, 5.8, 0.0).unwrap(),
            ],
            &[7.0, 3.0],
            value,
        )
        .unwrap()
    }

    #[test]
    fn test_weights_are_normalized_and_value_distributed() {
        let portfolio = stocks_and_bonds(10_000.0);
        assert!((portfolio.weights()[0] - 0.7).abs() < 1e-12);
        assert!((portfolio.weights()[1] - 0.3).abs() < 1e-12);
        assert!((portfolio.positions()[0].value() - 7_000.0).abs() < 1e-9);
        assert!((portfolio.positions()[1].value() - 3_000.0).abs() < 1e-9);
        assert!((portfolio.value() - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_construction_errors() {
        let positions = || vec![Position::new("A", 5.0, 1.0, 0.0).unwrap()];

        assert_eq!(
            Portfolio::new("P", positions(), &[1.0, 1.0], 0.0),
            Err(PortfolioError::WeightCountMismatch {
                weights: 2,
                positions: 1
            })
        );
        assert_eq!(
            Portfolio::new("P", positions(), &[0.0], 0.0),
            Err(PortfolioError::ZeroTotalWeight)
        );
        assert_eq!(
            Portfolio::new("P", positions(), &[-1.0], 0.0),
            Err(PortfolioError::InvalidWeight {
                index: 0,
                weight: -1.0
            })
        );
        assert_eq!(
            Portfolio::new("P", positions(), &[1.0], -5.0),
            Err(PortfolioError::InvalidInitialValue(-5.0))
        );
        assert_eq!(
            Portfolio::new("P", vec![], &[], 0.0),
            Err(PortfolioError::Empty)
        );
    }

    #[test]
    fn test_rebalance_restores_targets() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut portfolio = stocks_and_bonds(10_000.0);
        portfolio.simulate(&mut rng);

        let before = portfolio.value();
        portfolio.rebalance(None).unwrap();

        assert!((portfolio.value() - before).abs() <= REBALANCE_TOLERANCE);
        let allocation = portfolio.allocation();
        assert!((allocation[0] - 0.7).abs() < 1e-9);
        assert!((allocation[1] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_rebalance_with_new_weights() {
        let mut portfolio = stocks_and_bonds(10_000.0);
        portfolio.rebalance(Some(&[1.0, 1.0])).unwrap();

        assert!((portfolio.positions()[0].value() - 5_000.0).abs() < 1e-9);
        assert!((portfolio.positions()[1].value() - 5_000.0).abs() < 1e-9);
        assert!(
            portfolio
                .rebalance(Some(&[1.0, 1.0, 1.0]))
                .is_err_and(|e| matches!(e, PortfolioError::WeightCountMismatch { .. }))
        );
    }

    #[test]
    fn test_rebalance_reports_drift_from_unnormalized_weights() {
        let mut portfolio: Portfolio = serde_json::from_str(
            r#"{
                "name": "Loaded",
                "positions": [
                    { "name": "A", "value": 500.0, "mean_return": 0.05, "std_dev": 0.0 },
                    { "name": "B", "value": 500.0, "mean_return": 0.02, "std_dev": 0.0 }
                ],
                "weights": [1.0, 1.0]
            }"#,
        )
        .unwrap();

        assert_eq!(
            portfolio.rebalance(None),
            Err(PortfolioError::RebalanceDrift {
                before: 1_000.0,
                after: 2_000.0
            })
        );
    }

    #[test]
    fn test_rebalance_empty_portfolio_is_noop() {
        let mut portfolio = stocks_and_bonds(0.0);
        portfolio.rebalance(Some(&[1.0, 0.0])).unwrap();
        assert_eq!(portfolio.value(), 0.0);
        assert_eq!(portfolio.allocation(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_trade_withdrawal_clamps_each_position() {
        let mut portfolio = stocks_and_bonds(1_000.0);
        portfolio.trade(-5_000.0);
        assert_eq!(portfolio.value(), 0.0);
    }

    #[test]
    fn test_discounted_snapshot() {
        let portfolio = stocks_and_bonds(10_000.0);
        let snapshot = portfolio.discounted(0.5);
        assert!((snapshot.value() - 5_000.0).abs() < 1e-9);
        assert_eq!(snapshot.weights(), portfolio.weights());
        // The source is untouched
        assert!((portfolio.value() - 10_000.0).abs() < 1e-9);
    }
}

//! Cross-module tests for the simulation engine
//!
//! Tests are organized by topic:
//! - `scenario` - Single-phase yearly steps, glide paths, contributions
//! - `piecewise` - Phase handoff and cumulative inflation
//! - `monte_carlo` - Trial aggregation, statistics and goal probability
//! - `properties` - Property-based checks of portfolio and inflation invariants

mod monte_carlo;

use crate::model::{Portfolio, Position};

/// Portfolio of volatility-free positions whose growth is exactly `returns_percent`
pub(crate) fn fixed_return_portfolio(returns_percent: &[f64], weights: &[f64], value: f64) -> Portfolio {
    let positions = returns_percent
        .iter()
        .enumerate()
        .map(|(i, r)| Position::new(format!("Fixed {i}"), *r, 0.0, 0.0).unwrap())
        .collect();
    Portfolio::new("Fixed", positions, weights, value).unwrap()
}

//! Long-horizon investment simulation library
//!
//! This crate provides a Monte Carlo engine for personal savings and
//! retirement projections. It supports:
//! - Positions with a mean annual return and dollar-scaled volatility
//! - Weighted portfolios with rebalancing toward target weights
//! - Yearly scenarios with growing contributions or withdrawals, inflation
//!   correction and linear glide paths between allocations
//! - Piecewise scenarios chaining accumulation and distribution phases
//! - Monte Carlo aggregation with robust statistics and goal probabilities
//!
//! # Example
//!
//! ```ignore
//! use rand::SeedableRng;
//! use stocker_core::config::Catalog;
//! use stocker_core::monte_carlo::{MonteCarlo, MonteCarloConfig};
//! use stocker_core::scenario::Scenario;
//!
//! let portfolio = Catalog::builtin().portfolio("all_stocks", 5_000.0)?;
//! let scenario = Scenario::builder("College Savings", &portfolio, 18)
//!     .annual_contribution(2_500.0)
//!     .inflation_rate_percent(2.5)
//!     .build()?;
//!
//! let mut monte_carlo = MonteCarlo::new(scenario, MonteCarloConfig::seeded(42));
//! monte_carlo.run(1_000)?;
//! let stats = monte_carlo.results(Some(100_000.0), true)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod inflation;
pub mod monte_carlo;
pub mod scenario;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{Catalog, PlanConfig};
pub use model::{Portfolio, Position};
pub use monte_carlo::{MonteCarlo, MonteCarloConfig, MonteCarloStats};
pub use scenario::{PiecewiseScenario, Scenario, ScenarioKind};

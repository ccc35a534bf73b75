//! Scenario configuration
//!
//! `PlanConfig` describes a single or piecewise scenario in terms of catalog
//! keys so it can be stored as JSON and built against any [`Catalog`]:
//!
//! ```ignore
//! use stocker_core::config::{Catalog, PlanConfig};
//!
//! let plan: PlanConfig = serde_json::from_str(r#"{
//!     "type": "single",
//!     "name": "College Savings",
//!     "portfolio": { "preset": "all_stocks" },
//!     "initial_value": 5000.0,
//!     "num_years": 18,
//!     "annual_contribution": 2500.0,
//!     "end_weights": [0.0, 1.0]
//! }"#)?;
//! let scenario = plan.build(Catalog::builtin())?;
//! ```

mod catalog;

pub use catalog::{Allocation, AssetClass, Catalog, PortfolioPreset};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::Portfolio;
use crate::scenario::{
    DEFAULT_INFLATION_RATE_PERCENT, PiecewiseScenario, Scenario, ScenarioKind,
};

/// Either a catalog preset or an explicit list of allocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortfolioChoice {
    Preset {
        preset: String,
    },
    Custom {
        name: String,
        allocations: Vec<Allocation>,
    },
}

impl PortfolioChoice {
    pub fn build(&self, catalog: &Catalog, value: f64) -> Result<Portfolio, CatalogError> {
        match self {
            PortfolioChoice::Preset { preset } => catalog.portfolio(preset, value),
            PortfolioChoice::Custom { name, allocations } => {
                catalog.custom_portfolio(name, allocations, value)
            }
        }
    }
}

fn default_inflation_rate_percent() -> f64 {
    DEFAULT_INFLATION_RATE_PERCENT
}

fn default_rebalance() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub portfolio: PortfolioChoice,
    #[serde(default)]
    pub initial_value: f64,
    pub num_years: u32,
    #[serde(default = "default_inflation_rate_percent")]
    pub inflation_rate_percent: f64,
    #[serde(default = "default_rebalance")]
    pub rebalance: bool,
    #[serde(default)]
    pub annual_contribution: f64,
    #[serde(default)]
    pub annual_contribution_increase_percent: f64,
    #[serde(default)]
    pub end_weights: Option<Vec<f64>>,
}

impl ScenarioConfig {
    pub fn build(&self, catalog: &Catalog) -> Result<Scenario, CatalogError> {
        let portfolio = self.portfolio.build(catalog, self.initial_value)?;

        let mut builder = Scenario::builder(self.name.clone(), &portfolio, self.num_years)
            .inflation_rate_percent(self.inflation_rate_percent)
            .rebalance(self.rebalance)
            .annual_contribution(self.annual_contribution)
            .annual_contribution_increase_percent(self.annual_contribution_increase_percent);
        if let Some(end_weights) = &self.end_weights {
            builder = builder.end_weights(end_weights.clone());
        }

        Ok(builder.build()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanConfig {
    Single(ScenarioConfig),
    Piecewise {
        name: String,
        phases: Vec<ScenarioConfig>,
    },
}

impl PlanConfig {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn build(&self, catalog: &Catalog) -> Result<ScenarioKind, CatalogError> {
        match self {
            PlanConfig::Single(config) => Ok(config.build(catalog)?.into()),
            PlanConfig::Piecewise { name, phases } => {
                let phases = phases
                    .iter()
                    .map(|phase| phase.build(catalog))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PiecewiseScenario::new(name.clone(), phases)?.into())
            }
        }
    }
}

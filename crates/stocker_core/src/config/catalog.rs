//! Asset-class and portfolio catalog
//!
//! A catalog is a read-only table of asset-class parameters and portfolio
//! presets. [`Catalog::builtin`] holds the long-run historical figures below;
//! other tables can be loaded from JSON. Every lookup hands out a freshly
//! owned [`Position`] or [`Portfolio`].

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, PositionError};
use crate::model::{Portfolio, Position};

/// Parameters of one asset class, in percent per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    pub name: String,
    pub mean_return_percent: f64,
    pub std_dev_percent: f64,
}

impl AssetClass {
    #[must_use]
    pub fn new(name: impl Into<String>, mean_return_percent: f64, std_dev_percent: f64) -> Self {
        Self {
            name: name.into(),
            mean_return_percent,
            std_dev_percent,
        }
    }

    /// A new position in this asset class holding `value`
    pub fn position(&self, value: f64) -> Result<Position, PositionError> {
        Position::new(
            self.name.clone(),
            self.mean_return_percent,
            self.std_dev_percent,
            value,
        )
    }
}

/// One asset class (by catalog key) and its raw weight in a preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub asset_class: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPreset {
    pub name: String,
    pub allocations: Vec<Allocation>,
}

impl PortfolioPreset {
    #[must_use]
    pub fn new(name: impl Into<String>, allocations: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            allocations: allocations
                .iter()
                .map(|(asset_class, weight)| Allocation {
                    asset_class: (*asset_class).to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    asset_classes: FxHashMap<String, AssetClass>,
    #[serde(default)]
    portfolios: FxHashMap<String, PortfolioPreset>,
}

// Data sources: Ibbotson Associates, MSCI, Standard & Poor's, World Gold
// Council and Robert Shiller for the first six classes; Bogleheads
// arithmetic means for the rest.
const BUILTIN_ASSET_CLASSES: &[(&str, &str, f64, f64)] = &[
    ("us_stocks", "Domestic Equities", 10.2, 19.8),
    ("international_stocks", "International Equities", 9.2, 22.1),
    ("us_bonds", "Domestic Fixed Income", 5.3, 5.8),
    ("international_bonds", "International Fixed Income", 5.5, 9.1),
    ("alternatives", "Alternatives", 6.1, 16.1),
    ("cash", "Cash", 3.4, 3.1),
    ("large_cap_stocks", "Large Company Stocks", 10.4, 20.2),
    ("small_cap_stocks", "Small Company Stocks", 12.6, 32.9),
    ("long_term_corp_bonds", "Long-term Corporate Bonds", 5.9, 8.5),
    ("long_term_gov_bonds", "Long-term Government Bonds", 5.3, 5.7),
    ("us_treasury_bills", "U.S. Treasury Bills", 3.8, 3.1),
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    let mut catalog = Catalog::default();
    for (key, name, mean, std_dev) in BUILTIN_ASSET_CLASSES {
        catalog.insert_asset_class(*key, AssetClass::new(*name, *mean, *std_dev));
    }

    let presets = [
        (
            "all_stocks",
            PortfolioPreset::new(
                "All Stocks",
                &[("us_stocks", 7.0), ("international_stocks", 3.0)],
            ),
        ),
        (
            "all_bonds",
            PortfolioPreset::new(
                "All Bonds",
                &[("us_bonds", 7.0), ("international_bonds", 3.0)],
            ),
        ),
        (
            "all_us_stocks",
            PortfolioPreset::new("All US Stocks", &[("us_stocks", 1.0)]),
        ),
        (
            "all_us_bonds",
            PortfolioPreset::new("All US Bonds", &[("us_bonds", 1.0)]),
        ),
        (
            "fifty_fifty",
            PortfolioPreset::new(
                "Fifty-Fifty",
                &[
                    ("us_stocks", 7.0),
                    ("international_stocks", 3.0),
                    ("us_bonds", 7.0),
                    ("international_bonds", 3.0),
                ],
            ),
        ),
        (
            "sixty_forty",
            PortfolioPreset::new(
                "Sixty-Forty",
                &[
                    ("us_stocks", 7.0 * 6.0),
                    ("international_stocks", 3.0 * 6.0),
                    ("us_bonds", 7.0 * 4.0),
                    ("international_bonds", 3.0 * 4.0),
                ],
            ),
        ),
    ];
    for (key, preset) in presets {
        catalog.insert_portfolio(key, preset);
    }

    catalog
});

impl Catalog {
    /// The shared built-in catalog
    #[must_use]
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert_asset_class(&mut self, key: impl Into<String>, asset_class: AssetClass) {
        self.asset_classes.insert(key.into(), asset_class);
    }

    pub fn insert_portfolio(&mut self, key: impl Into<String>, preset: PortfolioPreset) {
        self.portfolios.insert(key.into(), preset);
    }

    #[must_use]
    pub fn asset_class(&self, key: &str) -> Option<&AssetClass> {
        self.asset_classes.get(key)
    }

    #[must_use]
    pub fn portfolio_preset(&self, key: &str) -> Option<&PortfolioPreset> {
        self.portfolios.get(key)
    }

    /// Sorted keys of all asset classes
    #[must_use]
    pub fn asset_class_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.asset_classes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Sorted keys of all portfolio presets
    #[must_use]
    pub fn portfolio_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.portfolios.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn position(&self, key: &str, value: f64) -> Result<Position, CatalogError> {
        let asset_class = self
            .asset_class(key)
            .ok_or_else(|| CatalogError::UnknownAssetClass(key.to_string()))?;
        Ok(asset_class.position(value)?)
    }

    /// Build a portfolio from raw `(asset class key, weight)` pairs
    pub fn custom_portfolio(
        &self,
        name: &str,
        allocations: &[Allocation],
        value: f64,
    ) -> Result<Portfolio, CatalogError> {
        let positions = allocations
            .iter()
            .map(|a| self.position(&a.asset_class, 0.0))
            .collect::<Result<Vec<_>, _>>()?;
        let weights: Vec<f64> = allocations.iter().map(|a| a.weight).collect();

        Ok(Portfolio::new(name, positions, &weights, value)?)
    }

    /// Build the preset portfolio `key` holding `value`
    pub fn portfolio(&self, key: &str, value: f64) -> Result<Portfolio, CatalogError> {
        let preset = self
            .portfolio_preset(key)
            .ok_or_else(|| CatalogError::UnknownPortfolio(key.to_string()))?;
        self.custom_portfolio(&preset.name, &preset.allocations, value)
    }
}

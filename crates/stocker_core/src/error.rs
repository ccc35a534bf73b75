use std::fmt;

/// Errors raised when a position is created with unusable parameters
#[derive(Debug, Clone, PartialEq)]
pub enum PositionError {
    InvalidParameters {
        name: String,
        mean_return: f64,
        std_dev: f64,
        reason: &'static str,
    },
    InvalidValue {
        name: String,
        value: f64,
    },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::InvalidParameters {
                name,
                mean_return,
                std_dev,
                reason,
            } => write!(
                f,
                "invalid parameters for position '{name}' (mean_return={mean_return}, std_dev={std_dev}): {reason}"
            ),
            PositionError::InvalidValue { name, value } => write!(
                f,
                "initial value of position '{name}' must be finite and non-negative, got {value}"
            ),
        }
    }
}

impl std::error::Error for PositionError {}

/// Errors related to portfolio weights and value bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioError {
    Empty,
    WeightCountMismatch { weights: usize, positions: usize },
    InvalidWeight { index: usize, weight: f64 },
    ZeroTotalWeight,
    InvalidInitialValue(f64),
    /// Rebalancing moved the total value by more than the allowed tolerance
    RebalanceDrift { before: f64, after: f64 },
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioError::Empty => write!(f, "a portfolio needs at least one position"),
            PortfolioError::WeightCountMismatch { weights, positions } => write!(
                f,
                "the number of weights ({weights}) must equal the number of positions ({positions})"
            ),
            PortfolioError::InvalidWeight { index, weight } => write!(
                f,
                "weight {index} must be finite and non-negative, got {weight}"
            ),
            PortfolioError::ZeroTotalWeight => write!(f, "weights must not sum to zero"),
            PortfolioError::InvalidInitialValue(value) => write!(
                f,
                "initial value must be finite and non-negative, got {value}"
            ),
            PortfolioError::RebalanceDrift { before, after } => write!(
                f,
                "rebalancing changed the portfolio value from {before} to {after}"
            ),
        }
    }
}

impl std::error::Error for PortfolioError {}

/// Errors related to scenario construction and execution
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    ZeroDuration,
    GlidePathLength { expected: usize, actual: usize },
    GlidePathTooShort { num_years: u32 },
    EmptyPiecewise,
    /// A stored history is missing its starting snapshot or its series
    /// disagree in length
    InvalidHistory { reason: &'static str },
    /// A report was requested before any year was simulated
    NotRun,
    Portfolio(PortfolioError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::ZeroDuration => write!(f, "a scenario must span at least one year"),
            ScenarioError::GlidePathLength { expected, actual } => write!(
                f,
                "end weight vector has {actual} entries but the portfolio has {expected} positions"
            ),
            ScenarioError::GlidePathTooShort { num_years } => write!(
                f,
                "a glide path needs at least two years, scenario spans {num_years}"
            ),
            ScenarioError::EmptyPiecewise => {
                write!(f, "a piecewise scenario needs at least one phase")
            }
            ScenarioError::InvalidHistory { reason } => {
                write!(f, "invalid scenario history: {reason}")
            }
            ScenarioError::NotRun => write!(f, "scenario has not been run"),
            ScenarioError::Portfolio(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Portfolio(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PortfolioError> for ScenarioError {
    fn from(err: PortfolioError) -> Self {
        ScenarioError::Portfolio(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonteCarloError {
    /// Statistics need at least two terminal values
    NotEnoughRuns { runs: usize },
    Scenario(ScenarioError),
}

impl fmt::Display for MonteCarloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonteCarloError::NotEnoughRuns { runs } => write!(
                f,
                "at least two runs are needed for statistics, have {runs}"
            ),
            MonteCarloError::Scenario(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MonteCarloError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonteCarloError::Scenario(e) => Some(e),
            MonteCarloError::NotEnoughRuns { .. } => None,
        }
    }
}

impl From<ScenarioError> for MonteCarloError {
    fn from(err: ScenarioError) -> Self {
        MonteCarloError::Scenario(err)
    }
}

impl From<PortfolioError> for MonteCarloError {
    fn from(err: PortfolioError) -> Self {
        MonteCarloError::Scenario(ScenarioError::Portfolio(err))
    }
}

/// Errors related to catalog lookups and configuration files
#[derive(Debug)]
pub enum CatalogError {
    UnknownAssetClass(String),
    UnknownPortfolio(String),
    Parse(serde_json::Error),
    Position(PositionError),
    Portfolio(PortfolioError),
    Scenario(ScenarioError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownAssetClass(key) => write!(f, "asset class '{key}' not found"),
            CatalogError::UnknownPortfolio(key) => write!(f, "portfolio preset '{key}' not found"),
            CatalogError::Parse(e) => write!(f, "failed to parse configuration: {e}"),
            CatalogError::Position(e) => write!(f, "{e}"),
            CatalogError::Portfolio(e) => write!(f, "{e}"),
            CatalogError::Scenario(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            CatalogError::Position(e) => Some(e),
            CatalogError::Portfolio(e) => Some(e),
            CatalogError::Scenario(e) => Some(e),
            CatalogError::UnknownAssetClass(_) | CatalogError::UnknownPortfolio(_) => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}

impl From<PositionError> for CatalogError {
    fn from(err: PositionError) -> Self {
        CatalogError::Position(err)
    }
}

impl From<PortfolioError> for CatalogError {
    fn from(err: PortfolioError) -> Self {
        CatalogError::Portfolio(err)
    }
}

impl From<ScenarioError> for CatalogError {
    fn from(err: ScenarioError) -> Self {
        CatalogError::Scenario(err)
    }
}

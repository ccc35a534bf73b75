mod portfolio;
mod position;

pub use portfolio::{Portfolio, REBALANCE_TOLERANCE, normalize_weights};
pub use position::Position;

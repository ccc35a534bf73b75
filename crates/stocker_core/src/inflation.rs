//! Inflation helpers
//!
//! Values are discounted with a fixed annual rate. Years are unsigned, so a
//! negative year cannot be expressed.

/// Factor that converts a value `year` years out into today's money
#[must_use]
#[inline]
pub fn discount_factor(year: u32, rate: f64) -> f64 {
    (1.0 + rate).powf(-f64::from(year))
}

/// Value in today's money of `value` received `year` years from now
#[must_use]
#[inline]
pub fn present_value(value: f64, year: u32, rate: f64) -> f64 {
    value * discount_factor(year, rate)
}

/// Nominal value `year` years from now of `value` in today's money
#[must_use]
#[inline]
pub fn future_value(value: f64, year: u32, rate: f64) -> f64 {
    value * (1.0 + rate).powf(f64::from(year))
}

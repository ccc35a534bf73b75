//! Robust summary statistics over Monte Carlo terminal values
//!
//! Every function takes an unsorted slice and returns `None` when the
//! statistic is undefined for that many values.

use tracing::debug;

/// Maximum number of trimming passes in [`remove_outliers`]
pub const OUTLIER_PASSES: usize = 3;
/// Values above `low_median + OUTLIER_MAD_MULTIPLE * MAD` are trimmed
pub const OUTLIER_MAD_MULTIPLE: f64 = 4.0;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Median that always returns one of the values: the lower of the two
/// middle values for an even count
#[must_use]
pub fn median_low(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    Some(sorted[(sorted.len() - 1) / 2])
}

/// Median averaging the two middle values for an even count
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median absolute deviation from the median
#[must_use]
pub fn median_absolute_deviation(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// Percentile `p` (0-100) picking the value nearest to the exact rank
#[must_use]
pub fn percentile_nearest(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    let sorted = sorted(values);
    let rank = (p / 100.0 * (sorted.len() - 1) as f64).round_ties_even();
    Some(sorted[rank as usize])
}

/// Mean absolute deviation from `center`
#[must_use]
pub fn mean_absolute_deviation(values: &[f64], center: f64) -> Option<f64> {
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    mean(&deviations)
}

/// Trim high outliers.
///
/// Each pass drops values above `low_median + 4 * MAD` of the remaining set.
/// When more than half the values tie and the MAD is zero, the mean absolute
/// deviation around the low median stands in for it, and that pass is the
/// last. Trimming also stops after [`OUTLIER_PASSES`] passes. Only the high
/// tail is cut, and the low median of each pass always survives it.
#[must_use]
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    let mut kept = values.to_vec();

    for pass in 1..=OUTLIER_PASSES {
        let (Some(center), Some(mad)) = (median_low(&kept), median_absolute_deviation(&kept))
        else {
            break;
        };

        let tied = mad <= 0.0;
        let scale = if tied {
            mean_absolute_deviation(&kept, center).unwrap_or(0.0)
        } else {
            mad
        };

        let threshold = center + OUTLIER_MAD_MULTIPLE * scale;
        let before = kept.len();
        kept.retain(|v| *v <= threshold);

        if kept.len() < before {
            debug!(pass, removed = before - kept.len(), threshold, tied, "Trimmed outliers");
        }
        if tied {
            break;
        }
    }

    kept
}

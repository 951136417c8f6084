//! Regression error metrics
//!
//! All functions take `actual` first and `predicted` second. Matrices are
//! passed as their row-major element slices.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Smallest denominator used by the clipped percentage error.
pub const PERCENTAGE_EPSILON: f64 = 1e-7;

/// Smallest squared norm used when normalising rows for cosine proximity.
const NORM_EPSILON: f64 = 1e-12;

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "Metrics need at least one value".to_string(),
        ));
    }
    if actual.len() != predicted.len() {
        return Err(MathError::LengthMismatch {
            expected: actual.len(),
            actual: predicted.len(),
        });
    }
    Ok(())
}

/// Mean of the squared differences
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Square root of [`mean_squared_error`]
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Mean of the absolute differences
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean absolute percentage error, expressed as a percentage.
///
/// Each term is `|actual - predicted| / actual`. The denominator is the actual
/// value as given, so a zero actual yields a non-finite result. That value is
/// returned rather than reported as an error.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();

    Ok(sum / actual.len() as f64 * 100.0)
}

/// Percentage error with the denominator clipped to [`PERCENTAGE_EPSILON`].
///
/// Used as a training metric on normalised targets, where zeros are expected.
pub fn mean_absolute_percentage_error_clipped(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs() / a.abs().max(PERCENTAGE_EPSILON))
        .sum();

    Ok(sum / actual.len() as f64 * 100.0)
}

/// Negative mean cosine similarity between corresponding rows.
///
/// `width` is the number of columns per row. A perfect match gives `-1.0`.
pub fn cosine_proximity(actual: &[f64], predicted: &[f64], width: usize) -> Result<f64> {
    check_lengths(actual, predicted)?;
    if width == 0 || actual.len() % width != 0 {
        return Err(MathError::InvalidInput(format!(
            "Row width {} does not divide {} values",
            width,
            actual.len()
        )));
    }

    let rows = actual.len() / width;
    let total: f64 = actual
        .chunks(width)
        .zip(predicted.chunks(width))
        .map(|(a, p)| {
            let norm_a = a.iter().map(|v| v * v).sum::<f64>().max(NORM_EPSILON).sqrt();
            let norm_p = p.iter().map(|v| v * v).sum::<f64>().max(NORM_EPSILON).sqrt();
            a.iter().zip(p).map(|(x, y)| x * y).sum::<f64>() / (norm_a * norm_p)
        })
        .sum();

    Ok(-total / rows as f64)
}

/// Aggregate error metrics for a set of predictions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error
    pub mape: f64,
}

impl RegressionMetrics {
    /// Compute all metrics at once
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        let mse = mean_squared_error(actual, predicted)?;
        Ok(Self {
            mse,
            mae: mean_absolute_error(actual, predicted)?,
            rmse: mse.sqrt(),
            mape: mean_absolute_percentage_error(actual, predicted)?,
        })
    }
}

impl std::fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mape_divides_by_actual() {
        let mape = mean_absolute_percentage_error(&[100.0, 200.0], &[110.0, 180.0]).unwrap();
        assert!((mape - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_mape_zero_actual_is_not_finite() {
        let mape = mean_absolute_percentage_error(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
        assert!(!mape.is_finite());
    }

    #[test]
    fn test_clipped_mape_stays_finite() {
        let mape = mean_absolute_percentage_error_clipped(&[0.0, 1.0], &[0.5, 1.0]).unwrap();
        assert!(mape.is_finite());
        assert!(mape > 1.0e6);
    }

    #[test]
    fn test_cosine_proximity_identical_rows() {
        let rows = [1.0, 2.0, 3.0, 4.0];
        let value = cosine_proximity(&rows, &rows, 2).unwrap();
        assert!((value + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_proximity_rejects_bad_width() {
        assert!(cosine_proximity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 2).is_err());
    }
}

//! Sliding-window sample construction

use crate::data::{TimeSeries, TARGET_COLUMN};
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Feature/label windows cut from a series, plus the live forecast input
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedData {
    /// One flattened lookback window per row
    pub inputs: Array2<f64>,
    /// The `output_dim` close prices following each input window
    pub outputs: Array2<f64>,
    /// Features for the most recent `input_dim` rows
    pub forecast_input: Array1<f64>,
}

impl WindowedData {
    /// Number of training samples
    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }
}

/// Smallest series length for which windows can be built.
///
/// Saturates instead of overflowing, so absurd window lengths surface as
/// `InsufficientData` rather than a panic.
pub fn required_rows(input_dim: usize, output_dim: usize) -> usize {
    input_dim.saturating_add(output_dim).saturating_add(1)
}

/// Smallest series length a full run can train on: two samples, so that the
/// split leaves at least one training row
pub fn min_training_rows(input_dim: usize, output_dim: usize) -> usize {
    required_rows(input_dim, output_dim).saturating_add(1)
}

/// Cut `series` into windows.
///
/// Each input row holds, attribute by attribute, `input_dim` consecutive
/// values; the paired output row holds the next `output_dim` close prices.
/// Sample `i` starts at row `i`, for `i` in `0..len - input_dim - output_dim`.
pub fn build_windows(
    series: &TimeSeries,
    input_dim: usize,
    output_dim: usize,
    attributes: &[usize],
) -> Result<WindowedData> {
    if input_dim == 0 || output_dim == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window lengths must be positive".to_string(),
        ));
    }
    if attributes.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "At least one attribute is required".to_string(),
        ));
    }
    if let Some(&bad) = attributes.iter().find(|&&a| a >= series.num_columns()) {
        return Err(ForecastError::InvalidParameter(format!(
            "Attribute {} out of range for {} columns",
            bad,
            series.num_columns()
        )));
    }

    let rows = series.len();
    let required = required_rows(input_dim, output_dim);
    if rows < required {
        return Err(ForecastError::InsufficientData { rows, required });
    }

    let values = series.values();
    let samples = rows - input_dim - output_dim;
    let width = input_dim * attributes.len();

    let inputs = Array2::from_shape_fn((samples, width), |(i, k)| {
        values[[i + k % input_dim, attributes[k / input_dim]]]
    });
    let outputs = Array2::from_shape_fn((samples, output_dim), |(i, j)| {
        values[[i + input_dim + j, TARGET_COLUMN]]
    });

    let start = rows - input_dim;
    let forecast_input =
        Array1::from_shape_fn(width, |k| values[[start + k % input_dim, attributes[k / input_dim]]]);

    debug!(samples, width, output_dim, "built windows");

    Ok(WindowedData {
        inputs,
        outputs,
        forecast_input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(rows: usize) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..rows)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        // column c of row r holds r * 10 + c
        let values = Array2::from_shape_fn((rows, 6), |(r, c)| (r * 10 + c) as f64);
        TimeSeries::new(dates, values).unwrap()
    }

    #[test]
    fn test_attribute_major_layout() {
        let data = build_windows(&series(8), 3, 2, &[0, 3]).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(
            data.inputs.row(1).to_vec(),
            vec![10.0, 20.0, 30.0, 13.0, 23.0, 33.0]
        );
        assert_eq!(data.outputs.row(1).to_vec(), vec![43.0, 53.0]);
    }

    #[test]
    fn test_forecast_window_is_most_recent() {
        let data = build_windows(&series(8), 3, 2, &[0, 3]).unwrap();
        assert_eq!(
            data.forecast_input.to_vec(),
            vec![50.0, 60.0, 70.0, 53.0, 63.0, 73.0]
        );
    }

    #[test]
    fn test_too_short() {
        let err = build_windows(&series(5), 3, 2, &[3]).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                rows: 5,
                required: 6
            }
        ));
    }
}

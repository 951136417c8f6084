//! Min-max feature scaling

use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column affine map fitted from the column minimum and maximum.
///
/// A fitted scaler sends each column's training minimum to the lower end of
/// `feature_range` and its maximum to the upper end. Constant columns are
/// shifted but not stretched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    feature_range: (f64, f64),
    params: Option<ScalerParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    data_min: Array1<f64>,
    data_max: Array1<f64>,
    scale: Array1<f64>,
    offset: Array1<f64>,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl MinMaxScaler {
    /// Scaler targeting `[0, 1]`
    pub fn new() -> Self {
        Self {
            feature_range: (0.0, 1.0),
            params: None,
        }
    }

    /// Scaler targeting `[min, max]`
    pub fn with_range(min: f64, max: f64) -> Result<Self> {
        if !(min < max) {
            return Err(ForecastError::InvalidParameter(format!(
                "Feature range minimum {} must be below maximum {}",
                min, max
            )));
        }
        Ok(Self {
            feature_range: (min, max),
            params: None,
        })
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// Column minima seen during fitting
    pub fn data_min(&self) -> Option<&Array1<f64>> {
        self.params.as_ref().map(|p| &p.data_min)
    }

    /// Column maxima seen during fitting
    pub fn data_max(&self) -> Option<&Array1<f64>> {
        self.params.as_ref().map(|p| &p.data_max)
    }

    /// Learn column ranges from `data`, replacing any earlier fit
    pub fn fit(&mut self, data: &Array2<f64>) -> Result<()> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(ForecastError::InsufficientData {
                rows: data.nrows(),
                required: 1,
            });
        }

        let data_min = data.fold_axis(Axis(0), f64::INFINITY, |&a, &b| a.min(b));
        let data_max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&a, &b| a.max(b));
        let (low, high) = self.feature_range;

        let scale = (&data_max - &data_min).mapv(|range| {
            let range = if range == 0.0 { 1.0 } else { range };
            (high - low) / range
        });
        let offset = low - &data_min * &scale;

        self.params = Some(ScalerParams {
            data_min,
            data_max,
            scale,
            offset,
        });
        Ok(())
    }

    /// Fit on `data`, then scale it
    pub fn fit_transform(&mut self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(data)?;
        self.transform(data)
    }

    /// Scale `data` with the fitted parameters
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        let params = self.checked_params(data)?;
        Ok(data * &params.scale + &params.offset)
    }

    /// Map scaled values back to the original units
    pub fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        let params = self.checked_params(data)?;
        Ok((data - &params.offset) / &params.scale)
    }

    fn checked_params(&self, data: &Array2<f64>) -> Result<&ScalerParams> {
        let params = self.params.as_ref().ok_or(ForecastError::ScalerNotFitted)?;
        if data.ncols() != params.scale.len() {
            return Err(ForecastError::shape(
                (data.nrows(), params.scale.len()),
                data.dim(),
            ));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform_range() {
        let mut scaler = MinMaxScaler::new();
        let data = array![[0.0, 10.0], [5.0, 20.0], [10.0, 30.0]];

        let scaled = scaler.fit_transform(&data).unwrap();
        let expected = array![[0.0, 0.0], [0.5, 0.5], [1.0, 1.0]];
        for (a, b) in scaled.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column() {
        let mut scaler = MinMaxScaler::new();
        let data = array![[7.0], [7.0]];

        let scaled = scaler.fit_transform(&data).unwrap();
        assert_eq!(scaled, array![[0.0], [0.0]]);
        assert_eq!(scaler.inverse_transform(&scaled).unwrap(), data);
    }

    #[test]
    fn test_unfitted() {
        let scaler = MinMaxScaler::new();
        let data = array![[1.0]];
        assert!(matches!(
            scaler.transform(&data),
            Err(ForecastError::ScalerNotFitted)
        ));
        assert!(matches!(
            scaler.inverse_transform(&data),
            Err(ForecastError::ScalerNotFitted)
        ));
    }

    #[test]
    fn test_refit_replaces_state() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&array![[0.0], [1.0]]).unwrap();
        scaler.fit(&array![[0.0], [4.0]]).unwrap();

        let scaled = scaler.transform(&array![[2.0]]).unwrap();
        assert_eq!(scaled, array![[0.5]]);
    }

    #[test]
    fn test_column_mismatch() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&array![[0.0, 1.0]]).unwrap();
        assert!(matches!(
            scaler.transform(&array![[0.0]]),
            Err(ForecastError::ShapeMismatch { .. })
        ));
    }
}

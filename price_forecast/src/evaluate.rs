//! Held-out evaluation in price units

use crate::error::Result;
use crate::scaler::MinMaxScaler;
use crate::trainer::TrainedModel;
use forecast_math::metrics::{mean_absolute_percentage_error, root_mean_squared_error};
use ndarray::Array2;
use serde::Serialize;
use tracing::{info, warn};

/// Test-set predictions and their errors, in raw price units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Model output, one horizon per row
    pub predictions: Array2<f64>,
    /// Ground truth matching `predictions`
    pub actual: Array2<f64>,
    /// Root mean squared error over all elements
    pub rmse: f64,
    /// Mean absolute percentage error over all elements
    pub mape: f64,
}

/// Predict the normalised test inputs and score them against the targets.
///
/// Both predictions and targets are mapped back to prices with
/// `output_scaler` before RMSE and MAPE are computed.
pub fn evaluate(
    model: &TrainedModel,
    test_inputs: &Array2<f64>,
    test_outputs: &Array2<f64>,
    output_scaler: &MinMaxScaler,
) -> Result<Evaluation> {
    let predictions = output_scaler.inverse_transform(&model.predict(test_inputs)?)?;
    let actual = output_scaler.inverse_transform(test_outputs)?;

    let flat_actual: Vec<f64> = actual.iter().copied().collect();
    let flat_predicted: Vec<f64> = predictions.iter().copied().collect();

    let rmse = root_mean_squared_error(&flat_actual, &flat_predicted)?;
    let mape = mean_absolute_percentage_error(&flat_actual, &flat_predicted)?;
    if !mape.is_finite() {
        warn!(mape, "MAPE is not finite; the test set contains a zero price");
    }
    info!(rmse, mape, samples = actual.nrows(), "evaluated on test set");

    Ok(Evaluation {
        predictions,
        actual,
        rmse,
        mape,
    })
}

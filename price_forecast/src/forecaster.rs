//! End-to-end forecasting pipeline
//!
//! Every run is independent: it owns a fresh RNG, split, pair of scalers and
//! network, so runs on different threads never share state.

use crate::config::ForecastConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::evaluate::evaluate;
use crate::scaler::MinMaxScaler;
use crate::split::train_test_split;
use crate::trainer::{History, ModelTrainer, TrainedModel};
use crate::utils::future_dates;
use crate::window::{build_windows, min_training_rows};
use chrono::NaiveDate;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A predicted close for one future day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Predicted closes for consecutive days after the series ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Pair each value with its date; both must have the same length
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ShapeMismatch {
                expected: format!("{} values", dates.len()),
                actual: format!("{} values", values.len()),
            });
        }

        Ok(Self {
            points: dates
                .into_iter()
                .zip(values)
                .map(|(date, close)| ForecastPoint { date, close })
                .collect(),
        })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }
}

/// Everything a forecasting run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutcome {
    /// Future closes, one per horizon step
    pub forecast: ForecastResult,
    /// Test-set targets in price units
    pub test_actual: Array2<f64>,
    /// Test-set predictions in price units
    pub test_predicted: Array2<f64>,
    /// Test-set root mean squared error
    pub rmse: f64,
    /// Test-set mean absolute percentage error
    pub mape: f64,
    /// Per-epoch training metrics
    pub history: History,
    /// The frozen network
    #[serde(skip)]
    pub model: TrainedModel,
}

/// Runs the windowing, split, scaling, training, evaluation and projection steps
#[derive(Debug, Clone, PartialEq)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Train on `series` and forecast the closes following its last date
    pub fn run(&self, series: &TimeSeries) -> Result<ForecastOutcome> {
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let required = min_training_rows(config.input_dim, config.output_dim);
        if series.len() < required {
            return Err(ForecastError::InsufficientData {
                rows: series.len(),
                required,
            });
        }

        let windows = build_windows(
            series,
            config.input_dim,
            config.output_dim,
            &config.attributes,
        )?;
        let split = train_test_split(
            &windows.inputs,
            &windows.outputs,
            config.test_fraction,
            config.split_seed,
        )?;
        info!(
            rows = series.len(),
            train = split.train_inputs.nrows(),
            test = split.test_inputs.nrows(),
            "prepared windows"
        );

        let mut input_scaler = MinMaxScaler::new();
        let mut output_scaler = MinMaxScaler::new();
        let train_inputs = input_scaler.fit_transform(&split.train_inputs)?;
        let test_inputs = input_scaler.transform(&split.test_inputs)?;
        let train_outputs = output_scaler.fit_transform(&split.train_outputs)?;
        let test_outputs = output_scaler.transform(&split.test_outputs)?;
        let forecast_input =
            input_scaler.transform(&windows.forecast_input.clone().insert_axis(Axis(0)))?;

        let trainer = ModelTrainer::from_config(config)?;
        let network = ModelTrainer::build_network(config, &mut rng)?;
        let (model, history) =
            trainer.fit(network, &train_inputs, &train_outputs, config.epochs, &mut rng)?;

        let evaluation = evaluate(&model, &test_inputs, &test_outputs, &output_scaler)?;

        let projected = output_scaler.inverse_transform(&model.predict(&forecast_input)?)?;
        let last_date = series.last_date().ok_or(ForecastError::InsufficientData {
            rows: 0,
            required: 1,
        })?;
        let forecast = ForecastResult::new(
            future_dates(last_date, config.output_dim)?,
            projected.iter().copied().collect(),
        )?;

        Ok(ForecastOutcome {
            forecast,
            test_actual: evaluation.actual,
            test_predicted: evaluation.predictions,
            rmse: evaluation.rmse,
            mape: evaluation.mape,
            history,
            model,
        })
    }
}

/// Forecast with the given window sizes, attributes and epoch count.
///
/// Remaining settings (batch size, learning rate, seeds, test fraction) take
/// their [`ForecastConfig`] defaults.
pub fn forecast(
    series: &TimeSeries,
    input_dim: usize,
    output_dim: usize,
    attributes: &[usize],
    epochs: usize,
) -> Result<ForecastOutcome> {
    let config = ForecastConfig::new(input_dim, output_dim, attributes.to_vec(), epochs);
    Forecaster::new(config)?.run(series)
}

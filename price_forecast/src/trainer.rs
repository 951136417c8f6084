//! Mini-batch training of the forecasting network

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::network::Network;
use crate::optimizer::Adam;
use forecast_math::metrics::{
    cosine_proximity, mean_absolute_error, mean_absolute_percentage_error_clipped,
    mean_squared_error,
};
use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Metrics averaged over one epoch, weighted by batch size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based epoch number
    pub epoch: usize,
    /// Training loss (mean squared error)
    pub loss: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Absolute Percentage Error, denominator clipped away from zero
    pub mape: f64,
    /// Negative mean cosine similarity between target and prediction rows
    pub cosine_proximity: f64,
}

/// Per-epoch training metrics, in epoch order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    epochs: Vec<EpochMetrics>,
}

impl History {
    pub fn epochs(&self) -> &[EpochMetrics] {
        &self.epochs
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    /// Mean squared error of every epoch
    pub fn mse(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.mse).collect()
    }

    /// Mean absolute error of every epoch
    pub fn mae(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.mae).collect()
    }
}

/// Network frozen after training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    network: Network,
}

impl TrainedModel {
    /// Predict one horizon per input row
    pub fn predict(&self, inputs: &Array2<f64>) -> Result<Array2<f64>> {
        self.network.predict(inputs)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}

/// Fits a [`Network`] with Adam on a mean-squared-error loss
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTrainer {
    batch_size: usize,
    learning_rate: f64,
}

impl ModelTrainer {
    pub fn new(batch_size: usize, learning_rate: f64) -> Result<Self> {
        if batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                learning_rate
            )));
        }
        Ok(Self {
            batch_size,
            learning_rate,
        })
    }

    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(config.batch_size, config.learning_rate)
    }

    /// Build the network for `config`: `input_dim * attributes` inputs, a ReLU
    /// hidden layer of `ceil((input_dim + output_dim) / 2)` units and
    /// `output_dim` linear outputs
    pub fn build_network<R: Rng + ?Sized>(config: &ForecastConfig, rng: &mut R) -> Result<Network> {
        let network = Network::regression(
            config.input_features(),
            config.hidden_units(),
            config.output_dim,
            rng,
        )?;
        info!("\n{}", network.summary());
        Ok(network)
    }

    /// Train for exactly `epochs` passes over `inputs`/`outputs`.
    ///
    /// Samples are reshuffled with `rng` before every epoch.
    pub fn fit<R: Rng + ?Sized>(
        &self,
        mut network: Network,
        inputs: &Array2<f64>,
        outputs: &Array2<f64>,
        epochs: usize,
        rng: &mut R,
    ) -> Result<(TrainedModel, History)> {
        let n = inputs.nrows();
        if n == 0 {
            return Err(ForecastError::InsufficientData {
                rows: 0,
                required: 1,
            });
        }
        if outputs.nrows() != n || outputs.ncols() != network.output_size() {
            return Err(ForecastError::shape(
                (n, network.output_size()),
                outputs.dim(),
            ));
        }
        if epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "epochs must be positive".to_string(),
            ));
        }

        let mut optimizer = Adam::new(self.learning_rate);
        let mut history = History::default();
        let mut order: Vec<usize> = (0..n).collect();

        for epoch in 1..=epochs {
            order.shuffle(rng);
            let mut totals = EpochTotals::default();

            for batch in order.chunks(self.batch_size) {
                let x = inputs.select(Axis(0), batch);
                let y = outputs.select(Axis(0), batch);

                let (predictions, caches) = network.forward_cached(&x)?;
                totals.add(&y, &predictions)?;

                let scale = 2.0 / predictions.len() as f64;
                let gradient = (&predictions - &y) * scale;
                let gradients = network.backward(&caches, gradient);
                optimizer.step(&mut network, &gradients);
            }

            let metrics = totals.finish(epoch, n);
            if !metrics.loss.is_finite() {
                warn!(epoch, loss = metrics.loss, "training loss is not finite");
            }
            debug!(
                epoch,
                loss = metrics.loss,
                mae = metrics.mae,
                mape = metrics.mape,
                "epoch finished"
            );
            history.epochs.push(metrics);
        }

        Ok((TrainedModel { network }, history))
    }
}

#[derive(Default)]
struct EpochTotals {
    mse: f64,
    mae: f64,
    mape: f64,
    cosine: f64,
}

impl EpochTotals {
    fn add(&mut self, targets: &Array2<f64>, predictions: &Array2<f64>) -> Result<()> {
        let rows = targets.nrows() as f64;
        let width = targets.ncols();
        let t: Vec<f64> = targets.iter().copied().collect();
        let p: Vec<f64> = predictions.iter().copied().collect();

        self.mse += mean_squared_error(&t, &p)? * rows;
        self.mae += mean_absolute_error(&t, &p)? * rows;
        self.mape += mean_absolute_percentage_error_clipped(&t, &p)? * rows;
        self.cosine += cosine_proximity(&t, &p, width)? * rows;
        Ok(())
    }

    fn finish(self, epoch: usize, samples: usize) -> EpochMetrics {
        let n = samples as f64;
        EpochMetrics {
            epoch,
            loss: self.mse / n,
            mse: self.mse / n,
            mae: self.mae / n,
            mape: self.mape / n,
            cosine_proximity: self.cosine / n,
        }
    }
}

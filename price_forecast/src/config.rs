//! Pipeline configuration

use crate::data::NUM_COLUMNS;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parameters of a single forecasting run.
///
/// Defaults match the dashboard: a 20-day lookback, a 10-day horizon, every
/// price column as a feature and 50 training epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Lookback length in trading days
    pub input_dim: usize,
    /// Horizon length in trading days
    pub output_dim: usize,
    /// Column indices used as features
    pub attributes: Vec<usize>,
    /// Full passes over the training set
    pub epochs: usize,
    /// Mini-batch size
    pub batch_size: usize,
    /// Adam step size
    pub learning_rate: f64,
    /// Share of windows held out for evaluation
    pub test_fraction: f64,
    /// Seed for weight initialisation and batch shuffling
    pub seed: u64,
    /// Seed for the train/test assignment
    pub split_seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            input_dim: 20,
            output_dim: 10,
            attributes: (0..NUM_COLUMNS).collect(),
            epochs: 50,
            batch_size: 64,
            learning_rate: 0.001,
            test_fraction: 0.2,
            seed: 3,
            split_seed: 12,
        }
    }
}

impl ForecastConfig {
    /// Create a configuration for the given window sizes, keeping other defaults
    pub fn new(input_dim: usize, output_dim: usize, attributes: Vec<usize>, epochs: usize) -> Self {
        Self {
            input_dim,
            output_dim,
            attributes,
            epochs,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = input_dim;
        self
    }

    pub fn with_output_dim(mut self, output_dim: usize) -> Self {
        self.output_dim = output_dim;
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<usize>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every parameter that does not depend on the data
    pub fn validate(&self) -> Result<()> {
        if self.input_dim == 0 {
            return Err(ForecastError::InvalidParameter(
                "input_dim must be positive".to_string(),
            ));
        }
        if self.output_dim == 0 {
            return Err(ForecastError::InvalidParameter(
                "output_dim must be positive".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "epochs must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "test_fraction must be between 0 and 1, got {}",
                self.test_fraction
            )));
        }
        if self.attributes.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "at least one attribute is required".to_string(),
            ));
        }
        if let Some(&bad) = self.attributes.iter().find(|&&a| a >= NUM_COLUMNS) {
            return Err(ForecastError::InvalidParameter(format!(
                "attribute {} out of range, expected 0..{}",
                bad, NUM_COLUMNS
            )));
        }
        Ok(())
    }

    /// Number of network inputs: one value per attribute per lookback step
    pub fn input_features(&self) -> usize {
        self.input_dim * self.attributes.len()
    }

    /// Width of the hidden layer, `ceil((input_dim + output_dim) / 2)`
    pub fn hidden_units(&self) -> usize {
        (self.input_dim + self.output_dim + 1) / 2
    }
}

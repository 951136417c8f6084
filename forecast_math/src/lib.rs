//! # Forecast Math
//!
//! Error metrics used to train and evaluate price forecasts.
//! Every metric works on flat slices so that it can be applied to a single
//! horizon, a whole matrix of predictions (row-major), or a training batch.

use thiserror::Error;

pub mod metrics;

pub use metrics::{
    cosine_proximity, mean_absolute_error, mean_absolute_percentage_error,
    mean_absolute_percentage_error_clipped, mean_squared_error, root_mean_squared_error,
    RegressionMetrics,
};

/// Errors that can occur in metric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Result type for metric calculations
pub type Result<T> = std::result::Result<T, MathError>;

//! # Price Forecast
//!
//! Near-term closing price forecasts for daily OHLCV stock data, produced by a
//! small feed-forward neural network.
//!
//! ## Pipeline
//!
//! - **Windowing**: flatten `input_dim` days of the chosen attributes into one
//!   feature row, paired with the next `output_dim` closes
//! - **Split**: seeded 80/20 train/test assignment
//! - **Scaling**: min-max scalers fitted on the training rows only
//! - **Training**: one ReLU hidden layer, Adam, mean squared error, batches of 64
//! - **Evaluation**: RMSE and MAPE on the test rows, in price units
//! - **Forecast**: the most recent window projected onto the following calendar days
//!
//! Runs are stateless and seeded explicitly, so identical inputs give identical
//! forecasts, and independent runs can be spread over threads (see [`compare`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::{DataLoader, ForecastAdvice, ForecastConfig, Forecaster};
//!
//! let series = DataLoader::from_csv("AAPL.csv")?;
//!
//! let config = ForecastConfig::default()
//!     .with_input_dim(20)
//!     .with_output_dim(10)
//!     .with_epochs(50);
//! let outcome = Forecaster::new(config)?.run(&series)?;
//!
//! for point in outcome.forecast.points() {
//!     println!("{}: {:.2}", point.date, point.close);
//! }
//! println!("RMSE {:.3}, MAPE {:.2}%", outcome.rmse, outcome.mape);
//! println!("{}", ForecastAdvice::from_outcome(&series, &outcome)?);
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod advice;
pub mod compare;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod forecaster;
pub mod network;
pub mod optimizer;
pub mod report;
pub mod scaler;
pub mod split;
pub mod trainer;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use crate::advice::{ForecastAdvice, MapeQuality};
pub use crate::compare::{compare, ComparisonEntry};
pub use crate::config::ForecastConfig;
pub use crate::data::{Column, DataLoader, OhlcvBar, TimeSeries, TARGET_COLUMN};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluate::{evaluate, Evaluation};
pub use crate::forecaster::{forecast, ForecastOutcome, ForecastPoint, ForecastResult, Forecaster};
pub use crate::report::{write_forecast_csv, ForecastReport};
pub use crate::scaler::MinMaxScaler;
pub use crate::split::{train_test_split, DatasetSplit};
pub use crate::trainer::{EpochMetrics, History, ModelTrainer, TrainedModel};
pub use crate::window::{build_windows, WindowedData};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! # Stock Forecast
//!
//! Umbrella crate for the stock forecasting workspace.
//!
//! - [`math`]: regression error metrics (`forecast_math`)
//! - [`forecast`]: data loading, windowing, the neural network and the
//!   forecasting pipeline (`price_forecast`)
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use stock_forecast_workspace::forecast::{forecast, OhlcvBar, TimeSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let bars: Vec<OhlcvBar> = (0..40)
//!     .map(|i| {
//!         let close = 50.0 + i as f64;
//!         OhlcvBar {
//!             date: start + chrono::Duration::days(i),
//!             open: close,
//!             high: close + 1.0,
//!             low: close - 1.0,
//!             close,
//!             adj_close: close,
//!             volume: 1_000.0,
//!         }
//!     })
//!     .collect();
//! let series = TimeSeries::from_bars(&bars).unwrap();
//!
//! let outcome = forecast(&series, 5, 3, &[3], 2).unwrap();
//! assert_eq!(outcome.forecast.len(), 3);
//! assert_eq!(
//!     outcome.forecast.first().unwrap().date,
//!     NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
//! );
//! ```

pub use forecast_math as math;
pub use price_forecast as forecast;

/// Error metrics and forecasting pipeline in one place.
pub mod prelude {
    pub use forecast_math::metrics::RegressionMetrics;
    pub use price_forecast::{
        compare, DataLoader, ForecastAdvice, ForecastConfig, ForecastError, ForecastOutcome,
        ForecastReport, Forecaster, TimeSeries,
    };
}

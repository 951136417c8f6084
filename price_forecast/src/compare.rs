//! Side-by-side forecasts for several stocks

use crate::config::ForecastConfig;
use crate::data::TimeSeries;
use crate::error::Result;
use crate::forecaster::{ForecastOutcome, Forecaster};
use rayon::prelude::*;
use tracing::{info, warn};

/// Result of forecasting one stock in a comparison
#[derive(Debug)]
pub struct ComparisonEntry {
    pub symbol: String,
    pub outcome: Result<ForecastOutcome>,
}

impl ComparisonEntry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Forecast every stock with the same configuration on the rayon pool.
///
/// Each run owns its own model, scalers and RNG. Entries come back in input
/// order, and a failing stock does not affect the others.
pub fn compare(stocks: &[(String, TimeSeries)], config: &ForecastConfig) -> Result<Vec<ComparisonEntry>> {
    let forecaster = Forecaster::new(config.clone())?;

    let entries = stocks
        .par_iter()
        .map(|(symbol, series)| {
            let outcome = forecaster.run(series);
            match &outcome {
                Ok(o) => info!(symbol = %symbol, rmse = o.rmse, mape = o.mape, "forecast ready"),
                Err(e) => warn!(symbol = %symbol, error = %e, "forecast failed"),
            }
            ComparisonEntry {
                symbol: symbol.clone(),
                outcome,
            }
        })
        .collect();

    Ok(entries)
}

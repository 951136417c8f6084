//! JSON and CSV output of forecasting runs

use crate::advice::ForecastAdvice;
use crate::config::ForecastConfig;
use crate::data::TimeSeries;
use crate::error::Result;
use crate::forecaster::{ForecastOutcome, ForecastResult};
use crate::trainer::History;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Summary of one run, suitable for a dashboard or a file
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub symbol: String,
    /// Last date of the input series
    pub as_of: Option<NaiveDate>,
    pub last_close: Option<f64>,
    pub config: ForecastConfig,
    pub forecast: ForecastResult,
    pub rmse: f64,
    pub mape: f64,
    pub advice: ForecastAdvice,
    pub history: History,
}

impl ForecastReport {
    pub fn new(
        symbol: impl Into<String>,
        series: &TimeSeries,
        config: &ForecastConfig,
        outcome: &ForecastOutcome,
    ) -> Result<Self> {
        Ok(Self {
            symbol: symbol.into(),
            as_of: series.last_date(),
            last_close: series.last_close(),
            config: config.clone(),
            forecast: outcome.forecast.clone(),
            rmse: outcome.rmse,
            mape: outcome.mape,
            advice: ForecastAdvice::from_outcome(series, outcome)?,
            history: outcome.history.clone(),
        })
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write forecast points as `date,close` rows
pub fn write_forecast_csv<P: AsRef<Path>>(path: P, forecast: &ForecastResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for point in forecast.points() {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

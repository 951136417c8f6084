//! Buy suggestion derived from a forecast

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::forecaster::ForecastOutcome;
use crate::utils::percent_change;
use serde::{Deserialize, Serialize};
use std::fmt;

/// MAPE below this value (in percent) counts as a reliable model
pub const GOOD_MAPE_THRESHOLD: f64 = 5.0;

/// How far the test-set error lets us trust the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapeQuality {
    Good,
    Poor,
}

impl MapeQuality {
    pub fn from_mape(mape: f64) -> Self {
        if mape < GOOD_MAPE_THRESHOLD {
            MapeQuality::Good
        } else {
            MapeQuality::Poor
        }
    }
}

/// Whether a stock looks worth buying given its forecast and error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastAdvice {
    /// Percent change from the last close to the final forecast close
    pub expected_change: f64,
    /// Test-set MAPE of the model behind the forecast
    pub mape: f64,
    /// True when the expected gain exceeds the model's typical error
    pub worth_buying: bool,
    pub quality: MapeQuality,
}

impl ForecastAdvice {
    /// Compare the horizon's last forecast close with the series' last close
    pub fn from_outcome(series: &TimeSeries, outcome: &ForecastOutcome) -> Result<Self> {
        let last_close = series
            .last_close()
            .ok_or_else(|| ForecastError::DataError("Series is empty".to_string()))?;
        let final_forecast = outcome
            .forecast
            .last()
            .ok_or_else(|| ForecastError::DataError("Forecast is empty".to_string()))?;

        Ok(Self::new(last_close, final_forecast.close, outcome.mape))
    }

    pub fn new(last_close: f64, forecast_close: f64, mape: f64) -> Self {
        let expected_change = percent_change(last_close, forecast_close);
        Self {
            expected_change,
            mape,
            worth_buying: expected_change - mape > 0.0,
            quality: MapeQuality::from_mape(mape),
        }
    }
}

impl fmt::Display for ForecastAdvice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Worth a buy:      {}",
            if self.worth_buying { "Yes" } else { "No" }
        )?;
        writeln!(f, "Expected change:  {:.2}%", self.expected_change)?;
        write!(f, "MAPE:             {:.2}% ({:?})", self.mape, self.quality)
    }
}

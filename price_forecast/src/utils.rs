//! Utility functions for the price_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};

/// Consecutive calendar days following `last_date`.
///
/// Weekends and holidays are not skipped.
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|step| {
            last_date.checked_add_days(Days::new(step)).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Date overflow {} days after {}",
                    step, last_date
                ))
            })
        })
        .collect()
}

/// Percentage change from `from` to `to`
pub fn percent_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}

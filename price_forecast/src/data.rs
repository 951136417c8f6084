//! Daily OHLCV time series and loaders

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate};
use ndarray::{Array2, ArrayView1, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Number of columns in the canonical layout
pub const NUM_COLUMNS: usize = 6;

/// Column holding the forecast target
pub const TARGET_COLUMN: usize = Column::Close as usize;

/// Columns of the canonical daily price layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Open = 0,
    High = 1,
    Low = 2,
    Close = 3,
    AdjClose = 4,
    Volume = 5,
}

impl Column {
    /// All columns in layout order
    pub const ALL: [Column; NUM_COLUMNS] = [
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::AdjClose,
        Column::Volume,
    ];

    /// Position of the column in a series row
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column stored at `index`, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Human readable name, as found in Yahoo-style CSV headers
    pub fn name(self) -> &'static str {
        match self {
            Column::Open => "Open",
            Column::High => "High",
            Column::Low => "Low",
            Column::Close => "Close",
            Column::AdjClose => "Adj Close",
            Column::Volume => "Volume",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "open" | "o" => Ok(Column::Open),
            "high" | "h" => Ok(Column::High),
            "low" | "l" => Ok(Column::Low),
            "close" | "c" => Ok(Column::Close),
            "adjclose" | "adjustedclose" => Ok(Column::AdjClose),
            "volume" | "vol" | "v" => Ok(Column::Volume),
            _ => match normalized.parse::<usize>() {
                Ok(idx) => Column::from_index(idx).ok_or_else(|| {
                    ForecastError::InvalidParameter(format!("Unknown column index: {}", idx))
                }),
                Err(_) => Err(ForecastError::InvalidParameter(format!(
                    "Unknown column: {}",
                    s
                ))),
            },
        }
    }
}

/// One trading day of price data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Close adjusted for splits and dividends
    pub adj_close: f64,
    /// Volume
    pub volume: f64,
}

impl OhlcvBar {
    fn to_row(&self) -> [f64; NUM_COLUMNS] {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.adj_close,
            self.volume,
        ]
    }
}

/// Ordered, date-indexed numeric series.
///
/// Rows are time steps in strictly increasing date order; columns are
/// attributes, with the close price at [`TARGET_COLUMN`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Array2<f64>,
}

impl TimeSeries {
    /// Create a series from dates and a `rows x columns` value matrix
    pub fn new(dates: Vec<NaiveDate>, values: Array2<f64>) -> Result<Self> {
        if dates.len() != values.nrows() {
            return Err(ForecastError::DataError(format!(
                "Got {} dates for {} rows",
                dates.len(),
                values.nrows()
            )));
        }
        if values.ncols() <= TARGET_COLUMN {
            return Err(ForecastError::DataError(format!(
                "Series needs at least {} columns to hold the close price, got {}",
                TARGET_COLUMN + 1,
                values.ncols()
            )));
        }
        if let Some(pos) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ForecastError::DataError(format!(
                "Dates must be strictly increasing: {} is followed by {}",
                dates[pos],
                dates[pos + 1]
            )));
        }

        Ok(Self { dates, values })
    }

    /// Create a series from daily bars
    pub fn from_bars(bars: &[OhlcvBar]) -> Result<Self> {
        let dates = bars.iter().map(|b| b.date).collect();
        let flat: Vec<f64> = bars.iter().flat_map(|b| b.to_row()).collect();
        let values = Array2::from_shape_vec((bars.len(), NUM_COLUMNS), flat)
            .map_err(|e| ForecastError::DataError(e.to_string()))?;

        Self::new(dates, values)
    }

    /// Get the dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the value matrix
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of attribute columns
    pub fn num_columns(&self) -> usize {
        self.values.ncols()
    }

    /// Values of one attribute column
    pub fn column(&self, index: usize) -> Result<ArrayView1<'_, f64>> {
        if index >= self.num_columns() {
            return Err(ForecastError::InvalidParameter(format!(
                "Column {} out of range for {} columns",
                index,
                self.num_columns()
            )));
        }
        Ok(self.values.column(index))
    }

    /// Get the close prices as a vector
    pub fn close_prices(&self) -> Vec<f64> {
        self.values.column(TARGET_COLUMN).to_vec()
    }

    /// Date of the most recent row
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Close price of the most recent row
    pub fn last_close(&self) -> Option<f64> {
        self.values
            .nrows()
            .checked_sub(1)
            .map(|last| self.values[[last, TARGET_COLUMN]])
    }

    /// Restrict the series to rows dated within `start..=end`
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ForecastError::InvalidParameter(format!(
                    "Start date {} is after end date {}",
                    s, e
                )));
            }
        }

        let keep: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| start.map_or(true, |s| **d >= s) && end.map_or(true, |e| **d <= e))
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            values: self.values.select(Axis(0), &keep),
        })
    }
}

/// Data loader for daily price files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a Yahoo-style CSV (`Date,Open,High,Low,Close,Adj Close,Volume`)
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<TimeSeries> {
        let file = File::open(path.as_ref())?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        debug!(path = %path.as_ref().display(), rows = df.height(), "loaded csv");
        Self::from_dataframe(&df)
    }

    /// Create a time series from an existing DataFrame
    pub fn from_dataframe(df: &DataFrame) -> Result<TimeSeries> {
        let date_column = Self::detect_time_column(df)?;
        let dates = Self::column_as_dates(df, &date_column)?;

        let mut columns = Vec::with_capacity(NUM_COLUMNS);
        for column in Column::ALL {
            let name = match Self::detect_value_column(df, column) {
                Some(name) => name,
                None if column == Column::AdjClose => Self::detect_value_column(df, Column::Close)
                    .ok_or_else(|| missing_column(Column::Close))?,
                None => return Err(missing_column(column)),
            };
            columns.push(Self::column_as_f64(df, &name)?);
        }

        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);

        let sorted_dates: Vec<NaiveDate> = order.iter().map(|&i| dates[i]).collect();
        if let Some(w) = sorted_dates.windows(2).find(|w| w[0] == w[1]) {
            return Err(ForecastError::DataError(format!(
                "Duplicate date in data: {}",
                w[0]
            )));
        }

        let values = Array2::from_shape_fn((order.len(), NUM_COLUMNS), |(r, c)| {
            columns[c][order[r]]
        });

        TimeSeries::new(sorted_dates, values)
    }

    /// Detect the time column in a DataFrame
    fn detect_time_column(df: &DataFrame) -> Result<String> {
        for name in df.get_column_names() {
            let lower_name = name.to_lowercase();
            if lower_name.contains("date") || lower_name.contains("time") {
                return Ok(name.to_string());
            }
        }

        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() {
                return Ok(first_col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "No time column found in data".to_string(),
        ))
    }

    /// Find the header for one of the canonical columns
    fn detect_value_column(df: &DataFrame, column: Column) -> Option<String> {
        df.get_column_names()
            .into_iter()
            .find(|name| {
                let lower = name.to_lowercase();
                match column {
                    Column::Open => lower.contains("open"),
                    Column::High => lower.contains("high"),
                    Column::Low => lower.contains("low"),
                    Column::Close => lower.contains("close") && !lower.contains("adj"),
                    Column::AdjClose => lower.contains("adj"),
                    Column::Volume => lower.contains("vol"),
                }
            })
            .map(|name| name.to_string())
    }

    /// Helper method to get a column as f64 values
    fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
        let col = df.column(column_name)?.cast(&DataType::Float64)?;

        let values = col
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| {
                    ForecastError::DataError(format!(
                        "Missing value in column '{}' at row {}",
                        column_name, row
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(values)
    }

    /// Helper method to get a column as calendar dates
    fn column_as_dates(df: &DataFrame, column_name: &str) -> Result<Vec<NaiveDate>> {
        let col = df.column(column_name)?;
        let missing =
            |row: usize| ForecastError::DataError(format!("Missing date at row {}", row));

        match col.dtype() {
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| parse_date(value.ok_or_else(|| missing(row))?))
                .collect(),
            DataType::Date => {
                let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
                    .ok_or_else(|| ForecastError::DataError("Invalid epoch".to_string()))?;
                col.cast(&DataType::Int32)?
                    .i32()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, days)| {
                        let days = days.ok_or_else(|| missing(row))?;
                        epoch
                            .checked_add_signed(chrono::Duration::days(days as i64))
                            .ok_or_else(|| missing(row))
                    })
                    .collect()
            }
            DataType::Datetime(unit, _) => {
                let per_second: i64 = match unit {
                    TimeUnit::Nanoseconds => 1_000_000_000,
                    TimeUnit::Microseconds => 1_000_000,
                    TimeUnit::Milliseconds => 1_000,
                };
                col.cast(&DataType::Int64)?
                    .i64()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, ts)| {
                        let ts = ts.ok_or_else(|| missing(row))?;
                        DateTime::from_timestamp(ts.div_euclid(per_second), 0)
                            .map(|dt| dt.date_naive())
                            .ok_or_else(|| missing(row))
                    })
                    .collect()
            }
            other => Err(ForecastError::DataError(format!(
                "Column '{}' of type {} cannot be read as dates",
                column_name, other
            ))),
        }
    }
}

fn missing_column(column: Column) -> ForecastError {
    ForecastError::DataError(format!("No '{}' column found in data", column))
}

/// Parse `YYYY-MM-DD`, ignoring any time-of-day suffix
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| ForecastError::DataError(format!("Invalid date '{}': {}", value, e)))
}

use chrono::NaiveDate;
use price_forecast::data::{OhlcvBar, TimeSeries};
use price_forecast::{
    compare, write_forecast_csv, ForecastAdvice, ForecastConfig, ForecastReport, Forecaster,
};
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn create_series(rows: usize, slope: f64) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
    let bars: Vec<OhlcvBar> = (0..rows)
        .map(|i| {
            let close = 80.0 + slope * i as f64;
            OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                adj_close: close,
                volume: 5_000.0,
            }
        })
        .collect();
    TimeSeries::from_bars(&bars).unwrap()
}

fn small_config() -> ForecastConfig {
    ForecastConfig::new(6, 3, vec![3, 5], 3)
}

#[test]
fn test_compare_keeps_order_and_isolates_failures() {
    let stocks = vec![
        ("UP".to_string(), create_series(80, 0.5)),
        ("SHORT".to_string(), create_series(9, 0.5)),
        ("DOWN".to_string(), create_series(80, -0.3)),
    ];

    let entries = compare(&stocks, &small_config()).unwrap();

    let symbols: Vec<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["UP", "SHORT", "DOWN"]);
    assert!(entries[0].is_ok());
    assert!(!entries[1].is_ok());
    assert!(entries[2].is_ok());
}

#[test]
fn test_compare_many_stocks_in_input_order() {
    let stocks: Vec<(String, TimeSeries)> = (0..12)
        .map(|i| (format!("S{:02}", i), create_series(40 + i, 0.1 * i as f64 - 0.5)))
        .collect();
    let config = ForecastConfig::new(4, 2, vec![3], 1);

    let entries = compare(&stocks, &config).unwrap();

    assert_eq!(entries.len(), stocks.len());
    for ((symbol, series), entry) in stocks.iter().zip(&entries) {
        assert_eq!(&entry.symbol, symbol);
        let single = Forecaster::new(config.clone()).unwrap().run(series).unwrap();
        assert_eq!(entry.outcome.as_ref().unwrap().forecast, single.forecast);
    }
}

#[test]
fn test_compare_matches_single_runs() {
    let series = create_series(80, 0.5);
    let stocks = vec![("UP".to_string(), series.clone())];

    let entries = compare(&stocks, &small_config()).unwrap();
    let single = Forecaster::new(small_config()).unwrap().run(&series).unwrap();

    let compared = entries[0].outcome.as_ref().unwrap();
    assert_eq!(compared.forecast, single.forecast);
    assert_eq!(compared.mape.to_bits(), single.mape.to_bits());
}

#[test]
fn test_report_json_and_csv() {
    let series = create_series(60, 0.25);
    let config = small_config();
    let outcome = Forecaster::new(config.clone()).unwrap().run(&series).unwrap();
    let report = ForecastReport::new("TEST", &series, &config, &outcome).unwrap();

    assert_eq!(report.as_of, series.last_date());
    assert_eq!(report.last_close, series.last_close());
    assert_eq!(
        report.advice,
        ForecastAdvice::from_outcome(&series, &outcome).unwrap()
    );

    let dir = tempdir().unwrap();
    let json_path = dir.path().join("report.json");
    report.write_json(&json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["symbol"], "TEST");
    assert_eq!(json["forecast"]["points"].as_array().unwrap().len(), 3);
    assert_eq!(json["config"]["input_dim"], 6);
    assert_eq!(json["history"]["epochs"].as_array().unwrap().len(), 3);

    let csv_path = dir.path().join("forecast.csv");
    write_forecast_csv(&csv_path, &outcome.forecast).unwrap();
    let contents = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "date,close");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("2023-04-30,"));
}

#[test]
fn test_config_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"input_dim": 30, "attributes": [3, 5], "epochs": 5}}"#).unwrap();

    let config = ForecastConfig::from_json_file(file.path()).unwrap();

    assert_eq!(config.input_dim, 30);
    assert_eq!(config.attributes, vec![3, 5]);
    assert_eq!(config.epochs, 5);
    // Unspecified fields keep their defaults
    assert_eq!(config.output_dim, 10);
    assert_eq!(config.batch_size, 64);
}

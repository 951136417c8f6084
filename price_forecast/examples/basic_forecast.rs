use chrono::{Duration, NaiveDate};
use price_forecast::data::{OhlcvBar, TimeSeries};
use price_forecast::{compare, ForecastAdvice, ForecastConfig, Forecaster};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Price Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    println!("Creating sample data...");
    let trending = create_sample_data(250, 0.4, 7.0);
    let choppy = create_sample_data(250, 0.0, 15.0);
    println!("Sample data created: {} daily bars each\n", trending.len());

    let config = ForecastConfig::default()
        .with_input_dim(20)
        .with_output_dim(10)
        .with_epochs(30);

    println!("Training on the trending series...");
    let outcome = Forecaster::new(config.clone())?.run(&trending)?;

    println!("{}", outcome.model.network().summary());
    if let Some(last) = outcome.history.last() {
        println!("Final training loss: {:.6}\n", last.loss);
    }

    println!("Forecast:");
    for point in outcome.forecast.points() {
        println!("  {}  {:>8.2}", point.date, point.close);
    }
    println!("\nTest RMSE: {:.3}", outcome.rmse);
    println!("Test MAPE: {:.3}%\n", outcome.mape);
    println!("{}\n", ForecastAdvice::from_outcome(&trending, &outcome)?);

    println!("Comparing both series in parallel...");
    let stocks = vec![
        ("TREND".to_string(), trending),
        ("CHOP".to_string(), choppy),
    ];
    for entry in compare(&stocks, &config)? {
        match entry.outcome {
            Ok(outcome) => println!(
                "  {:<6} MAPE {:>6.2}%  last forecast {:>8.2}",
                entry.symbol,
                outcome.mape,
                outcome.forecast.last().map_or(f64::NAN, |p| p.close)
            ),
            Err(e) => println!("  {:<6} failed: {}", entry.symbol, e),
        }
    }

    Ok(())
}

/// Daily bars with a drift and a monthly swing
fn create_sample_data(days: usize, drift: f64, swing: f64) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let bars: Vec<OhlcvBar> = (0..days)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + drift * t + swing * (t / 30.0 * std::f64::consts::TAU).sin();
            OhlcvBar {
                date: start + Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.2,
                low: close - 1.4,
                close,
                adj_close: close,
                volume: 2_000_000.0 + 250_000.0 * (t / 7.0).cos(),
            }
        })
        .collect();
    TimeSeries::from_bars(&bars).unwrap()
}

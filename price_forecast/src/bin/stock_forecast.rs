use clap::{Args, Parser, Subcommand};
use price_forecast::data::parse_date;
use price_forecast::{
    compare, write_forecast_csv, Column, DataLoader, ForecastConfig, ForecastError,
    ForecastReport, Forecaster, Result, TimeSeries,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Neural-network closing price forecasts for daily stock data",
    after_help = "EXAMPLES:
    # Forecast the next 10 days from a Yahoo-style CSV
    stock-forecast forecast --data AAPL.csv

    # Use only close and volume, 30-day lookback, write a JSON report
    stock-forecast forecast --data AAPL.csv --attributes close,volume --input-dim 30 --json aapl.json

    # Compare two stocks
    stock-forecast compare --data AAPL.csv --data MSFT.csv"
)]
struct Cli {
    /// Log debug output, including per-epoch metrics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on one stock and forecast its next closes
    Forecast {
        /// CSV file with Date, Open, High, Low, Close, Adj Close, Volume columns
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        params: Params,

        /// Write a JSON report here
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the forecast as date,close rows here
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Forecast several stocks in parallel and compare them
    Compare {
        /// CSV files, one per stock; the file stem is used as the symbol
        #[arg(long, required = true, num_args = 1..)]
        data: Vec<PathBuf>,

        #[command(flatten)]
        params: Params,
    },
}

#[derive(Args, Debug)]
struct Params {
    /// JSON configuration file; command line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lookback length in days
    #[arg(long)]
    input_dim: Option<usize>,

    /// Forecast horizon in days
    #[arg(long)]
    output_dim: Option<usize>,

    /// Comma separated feature columns (open,high,low,close,adj_close,volume)
    #[arg(long, value_delimiter = ',')]
    attributes: Option<Vec<String>>,

    /// Training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// First date to use (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Last date to use (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,
}

impl Params {
    fn to_config(&self) -> Result<ForecastConfig> {
        let mut config = match &self.config {
            Some(path) => ForecastConfig::from_json_file(path)?,
            None => ForecastConfig::default(),
        };

        if let Some(input_dim) = self.input_dim {
            config.input_dim = input_dim;
        }
        if let Some(output_dim) = self.output_dim {
            config.output_dim = output_dim;
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(names) = &self.attributes {
            config.attributes = names
                .iter()
                .map(|name| name.parse::<Column>().map(Column::index))
                .collect::<Result<Vec<_>>>()?;
        }

        config.validate()?;
        Ok(config)
    }

    fn load(&self, path: &Path) -> Result<TimeSeries> {
        let start = self.start.as_deref().map(parse_date).transpose()?;
        let end = self.end.as_deref().map(parse_date).transpose()?;
        DataLoader::from_csv(path)?.between(start, end)
    }
}

fn symbol_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_forecast(
    data: &Path,
    params: &Params,
    json: Option<&Path>,
    csv: Option<&Path>,
) -> Result<()> {
    let config = params.to_config()?;
    let series = params.load(data)?;
    let symbol = symbol_for(data);
    info!(symbol = %symbol, rows = series.len(), "forecasting");

    let outcome = Forecaster::new(config.clone())?.run(&series)?;
    let report = ForecastReport::new(&symbol, &series, &config, &outcome)?;

    println!("{} forecast:", symbol);
    for point in outcome.forecast.points() {
        println!("  {}  {:>10.2}", point.date, point.close);
    }
    println!("Test RMSE: {:.3}", outcome.rmse);
    println!("Test MAPE: {:.3}%", outcome.mape);
    println!("{}", report.advice);

    if let Some(path) = json {
        report.write_json(path)?;
        info!(path = %path.display(), "wrote report");
    }
    if let Some(path) = csv {
        write_forecast_csv(path, &outcome.forecast)?;
        info!(path = %path.display(), "wrote forecast");
    }
    Ok(())
}

fn run_compare(data: &[PathBuf], params: &Params) -> Result<()> {
    let config = params.to_config()?;
    let stocks = data
        .iter()
        .map(|path| Ok((symbol_for(path), params.load(path)?)))
        .collect::<Result<Vec<(String, TimeSeries)>>>()?;

    let entries = compare(&stocks, &config)?;

    println!(
        "{:<10} {:>12} {:>12} {:>10} {:>10} {:>6}",
        "Symbol", "Last close", "Forecast", "Change", "MAPE", "Buy"
    );
    let mut failures = 0;
    for (entry, (_, series)) in entries.iter().zip(&stocks) {
        match &entry.outcome {
            Ok(outcome) => {
                let report = ForecastReport::new(&entry.symbol, series, &config, outcome)?;
                println!(
                    "{:<10} {:>12.2} {:>12.2} {:>9.2}% {:>9.2}% {:>6}",
                    entry.symbol,
                    report.last_close.unwrap_or(f64::NAN),
                    outcome.forecast.last().map_or(f64::NAN, |p| p.close),
                    report.advice.expected_change,
                    outcome.mape,
                    if report.advice.worth_buying { "Yes" } else { "No" }
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:<10} error: {}", entry.symbol, e);
            }
        }
    }

    if failures == entries.len() {
        return Err(ForecastError::DataError(
            "No stock could be forecast".to_string(),
        ));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match &cli.command {
        Command::Forecast {
            data,
            params,
            json,
            csv,
        } => run_forecast(data, params, json.as_deref(), csv.as_deref()),
        Command::Compare { data, params } => run_compare(data, params),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

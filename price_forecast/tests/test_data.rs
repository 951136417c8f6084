use chrono::NaiveDate;
use price_forecast::data::{Column, DataLoader, TimeSeries};
use price_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_data_loader_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    writeln!(file, "2023-01-03,100.0,105.0,98.0,103.0,101.5,1000").unwrap();
    writeln!(file, "2023-01-04,103.0,107.0,101.0,106.0,104.5,1200").unwrap();
    writeln!(file, "2023-01-05,106.0,110.0,104.0,108.0,106.5,1500").unwrap();

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data.num_columns(), 6);
    assert_eq!(data.close_prices(), vec![103.0, 106.0, 108.0]);
    assert_eq!(data.column(Column::AdjClose.index()).unwrap().to_vec(), vec![101.5, 104.5, 106.5]);
    assert_eq!(data.column(Column::Volume.index()).unwrap()[2], 1500.0);
    assert_eq!(data.last_date(), Some(date("2023-01-05")));
}

#[test]
fn test_missing_adj_close_falls_back_to_close() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,open,high,low,close,volume").unwrap();
    writeln!(file, "2023-01-01,100.0,105.0,98.0,103.0,1000").unwrap();
    writeln!(file, "2023-01-02,103.0,107.0,101.0,106.0,1200").unwrap();

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(
        data.column(Column::AdjClose.index()).unwrap().to_vec(),
        data.close_prices()
    );
}

#[test]
fn test_rows_are_sorted_by_date() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    writeln!(file, "2023-01-05,106.0,110.0,104.0,108.0,108.0,1500").unwrap();
    writeln!(file, "2023-01-03,100.0,105.0,98.0,103.0,103.0,1000").unwrap();
    writeln!(file, "2023-01-04,103.0,107.0,101.0,106.0,106.0,1200").unwrap();

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(
        data.dates(),
        &[date("2023-01-03"), date("2023-01-04"), date("2023-01-05")]
    );
    assert_eq!(data.close_prices(), vec![103.0, 106.0, 108.0]);
}

#[test]
fn test_data_loader_error_handling() {
    assert!(DataLoader::from_csv("nonexistent_file.csv").is_err());

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Volume").unwrap();
    writeln!(file, "2023-01-01,100.0,105.0,98.0,1000").unwrap();
    let result = DataLoader::from_csv(file.path());
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    writeln!(file, "2023-01-01,100.0,105.0,98.0,103.0,103.0,1000").unwrap();
    writeln!(file, "2023-01-01,103.0,107.0,101.0,106.0,106.0,1200").unwrap();
    let result = DataLoader::from_csv(file.path());
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_date_range_filter() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    for day in 1..=9 {
        writeln!(file, "2023-02-0{},1,2,0.5,{},{},100", day, day, day).unwrap();
    }
    let data: TimeSeries = DataLoader::from_csv(file.path()).unwrap();

    let subset = data
        .between(Some(date("2023-02-03")), Some(date("2023-02-06")))
        .unwrap();
    assert_eq!(subset.close_prices(), vec![3.0, 4.0, 5.0, 6.0]);

    let tail = data.between(Some(date("2023-02-08")), None).unwrap();
    assert_eq!(tail.len(), 2);
}

use assert_approx_eq::assert_approx_eq;
use forecast_math::metrics::{
    mean_absolute_error, mean_absolute_percentage_error, mean_squared_error,
    root_mean_squared_error, RegressionMetrics,
};
use forecast_math::MathError;
use rstest::rstest;

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let mae = mean_absolute_error(&actual, &predicted).unwrap();
    assert_approx_eq!(mae, 2.4, 1e-9);

    let mse = mean_squared_error(&actual, &predicted).unwrap();
    assert_approx_eq!(mse, 6.0, 1e-9);

    let rmse = root_mean_squared_error(&actual, &predicted).unwrap();
    assert_approx_eq!(rmse, 6.0_f64.sqrt(), 1e-9);
}

#[rstest]
#[case(vec![100.0, 200.0], vec![110.0, 180.0], 10.0)]
#[case(vec![50.0, 50.0], vec![50.0, 50.0], 0.0)]
#[case(vec![10.0], vec![5.0], 50.0)]
fn test_mape_cases(#[case] actual: Vec<f64>, #[case] predicted: Vec<f64>, #[case] expected: f64) {
    let mape = mean_absolute_percentage_error(&actual, &predicted).unwrap();
    assert_approx_eq!(mape, expected, 1e-9);
}

#[test]
fn test_mape_is_asymmetric() {
    let forward = mean_absolute_percentage_error(&[100.0], &[120.0]).unwrap();
    let backward = mean_absolute_percentage_error(&[120.0], &[100.0]).unwrap();
    assert!(forward > backward);
}

#[test]
fn test_combined_metrics() {
    let metrics = RegressionMetrics::compute(&[100.0, 200.0], &[110.0, 180.0]).unwrap();

    assert_approx_eq!(metrics.mse, 250.0, 1e-9);
    assert_approx_eq!(metrics.mae, 15.0, 1e-9);
    assert_approx_eq!(metrics.rmse, 250.0_f64.sqrt(), 1e-9);
    assert_approx_eq!(metrics.mape, 10.0, 1e-9);

    let text = format!("{}", metrics);
    assert!(text.contains("RMSE"));
}

#[test]
fn test_error_handling() {
    let empty: Vec<f64> = vec![];
    assert!(matches!(
        mean_absolute_error(&empty, &empty),
        Err(MathError::InsufficientData(_))
    ));

    let result = mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
    assert_eq!(
        result,
        Err(MathError::LengthMismatch {
            expected: 3,
            actual: 2
        })
    );
}

use assert_approx_eq::assert_approx_eq;
use ndarray::{array, Array2};
use price_forecast::scaler::MinMaxScaler;
use price_forecast::split::train_test_split;
use price_forecast::ForecastError;
use rstest::rstest;

fn paired_samples(n: usize) -> (Array2<f64>, Array2<f64>) {
    let inputs = Array2::from_shape_fn((n, 3), |(r, c)| (r * 10 + c) as f64);
    let outputs = Array2::from_shape_fn((n, 2), |(r, c)| (r * 10 + c) as f64 + 0.5);
    (inputs, outputs)
}

#[test]
fn test_scaler_round_trip_on_unseen_rows() {
    let train = array![[10.0, -4.0, 7.0], [20.0, 0.0, 7.0], [15.0, 4.0, 7.0]];
    let unseen = array![[12.5, 8.0, 7.0], [30.0, -1.0, 3.0]];

    let mut scaler = MinMaxScaler::new();
    let scaled_train = scaler.fit_transform(&train).unwrap();
    assert!(scaled_train.iter().all(|v| (0.0..=1.0).contains(v)));

    let restored = scaler
        .inverse_transform(&scaler.transform(&unseen).unwrap())
        .unwrap();
    for (a, b) in restored.iter().zip(unseen.iter()) {
        assert_approx_eq!(*a, *b, 1e-9);
    }
}

#[test]
fn test_scaler_constant_column_maps_to_lower_bound() {
    let mut scaler = MinMaxScaler::new();
    let scaled = scaler.fit_transform(&array![[5.0], [5.0], [5.0]]).unwrap();
    assert!(scaled.iter().all(|v| *v == 0.0));
}

#[test]
fn test_unfitted_scaler() {
    let scaler = MinMaxScaler::new();
    let data = array![[1.0, 2.0]];

    assert!(matches!(
        scaler.transform(&data),
        Err(ForecastError::ScalerNotFitted)
    ));
    assert!(matches!(
        scaler.inverse_transform(&data),
        Err(ForecastError::ScalerNotFitted)
    ));
}

#[test]
fn test_scaler_rejects_wrong_width() {
    let mut scaler = MinMaxScaler::new();
    scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();

    let result = scaler.transform(&array![[1.0, 2.0, 3.0]]);
    assert!(matches!(result, Err(ForecastError::ShapeMismatch { .. })));
}

#[rstest]
#[case(10, 2)]
#[case(11, 3)]
#[case(185, 37)]
fn test_split_sizes(#[case] n: usize, #[case] expected_test: usize) {
    let (inputs, outputs) = paired_samples(n);
    let split = train_test_split(&inputs, &outputs, 0.2, 12).unwrap();

    assert_eq!(split.test_inputs.nrows(), expected_test);
    assert_eq!(split.test_outputs.nrows(), expected_test);
    assert_eq!(split.train_inputs.nrows(), n - expected_test);
    assert_eq!(split.train_outputs.nrows(), n - expected_test);
}

#[test]
fn test_split_is_reproducible() {
    let (inputs, outputs) = paired_samples(50);

    let first = train_test_split(&inputs, &outputs, 0.2, 12).unwrap();
    let second = train_test_split(&inputs, &outputs, 0.2, 12).unwrap();
    assert_eq!(first, second);

    let other_seed = train_test_split(&inputs, &outputs, 0.2, 13).unwrap();
    assert_ne!(first.test_inputs, other_seed.test_inputs);
}

#[test]
fn test_split_keeps_pairs_and_covers_every_sample() {
    let (inputs, outputs) = paired_samples(40);
    let split = train_test_split(&inputs, &outputs, 0.2, 12).unwrap();

    let mut seen = Vec::new();
    for (x, y) in split
        .train_inputs
        .rows()
        .into_iter()
        .zip(split.train_outputs.rows())
        .chain(split.test_inputs.rows().into_iter().zip(split.test_outputs.rows()))
    {
        assert_eq!(y[0], x[0] + 0.5);
        seen.push(x[0] as usize / 10);
    }

    seen.sort_unstable();
    assert_eq!(seen, (0..40).collect::<Vec<_>>());
}

#[test]
fn test_split_needs_two_samples() {
    let (inputs, outputs) = paired_samples(1);
    let result = train_test_split(&inputs, &outputs, 0.2, 12);
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientData {
            rows: 1,
            required: 2
        })
    ));
}

//! Seeded train/test split

use crate::error::{ForecastError, Result};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Paired inputs and outputs divided into training and test sets
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train_inputs: Array2<f64>,
    pub test_inputs: Array2<f64>,
    pub train_outputs: Array2<f64>,
    pub test_outputs: Array2<f64>,
}

/// Number of test samples for `n` samples: `ceil(test_fraction * n)`
pub fn test_size(n: usize, test_fraction: f64) -> usize {
    ((n as f64) * test_fraction).ceil() as usize
}

/// Shuffle sample rows with a permutation drawn from `seed` and split them.
///
/// The first `ceil(test_fraction * n)` permuted rows form the test set and the
/// rest the training set. Input and output rows stay paired, and the same
/// seed always gives the same partition and ordering.
pub fn train_test_split(
    inputs: &Array2<f64>,
    outputs: &Array2<f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<DatasetSplit> {
    if inputs.nrows() != outputs.nrows() {
        return Err(ForecastError::ShapeMismatch {
            expected: format!("{} output rows", inputs.nrows()),
            actual: format!("{} output rows", outputs.nrows()),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "test_fraction must be between 0 and 1, got {}",
            test_fraction
        )));
    }

    let n = inputs.nrows();
    let n_test = test_size(n, test_fraction);
    // Counts here are samples, not series rows
    if n_test == 0 || n_test >= n {
        return Err(ForecastError::InsufficientData {
            rows: n,
            required: n.max(1) + 1,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);
    let (test_idx, train_idx) = order.split_at(n_test);

    Ok(DatasetSplit {
        train_inputs: inputs.select(Axis(0), train_idx),
        test_inputs: inputs.select(Axis(0), test_idx),
        train_outputs: outputs.select(Axis(0), train_idx),
        test_outputs: outputs.select(Axis(0), test_idx),
    })
}

//! Feed-forward regression network
//!
//! A stack of dense layers computing `activation(input . weights + biases)`.
//! The forward pass never mutates the network, so a trained network can be
//! shared for inference.

use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activation applied after a layer's affine map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Rectified Linear Unit: max(0, x)
    ReLU,
    /// Identity
    Linear,
}

impl Activation {
    fn apply(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| v.max(0.0)),
            Activation::Linear => z.clone(),
        }
    }

    fn derivative(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => Array2::ones(z.dim()),
        }
    }
}

/// Fully connected layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weight matrix (input_size x output_size)
    pub weights: Array2<f64>,
    /// Bias vector (output_size)
    pub biases: Array1<f64>,
    /// Activation function
    pub activation: Activation,
}

/// Values kept from a forward pass for backpropagation
#[derive(Debug, Clone)]
pub(crate) struct LayerCache {
    input: Array2<f64>,
    z: Array2<f64>,
}

/// Gradients of the loss with respect to one layer's parameters
#[derive(Debug, Clone)]
pub(crate) struct LayerGradients {
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

impl DenseLayer {
    /// Create a layer with Glorot-uniform weights and zero biases
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        let dist = Uniform::new_inclusive(-limit, limit);
        let weights = Array2::from_shape_fn((input_size, output_size), |_| rng.sample(dist));

        Self {
            weights,
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Get number of parameters
    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    fn pre_activation(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.biases
    }

    /// Forward pass through the layer
    pub fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        self.activation.apply(&self.pre_activation(input))
    }

    fn forward_cached(&self, input: &Array2<f64>) -> (Array2<f64>, LayerCache) {
        let z = self.pre_activation(input);
        let output = self.activation.apply(&z);
        (
            output,
            LayerCache {
                input: input.clone(),
                z,
            },
        )
    }

    /// Returns the gradient for the previous layer and this layer's gradients
    fn backward(&self, cache: &LayerCache, output_gradient: &Array2<f64>) -> (Array2<f64>, LayerGradients) {
        let delta = output_gradient * &self.activation.derivative(&cache.z);

        let gradients = LayerGradients {
            weights: cache.input.t().dot(&delta),
            biases: delta.sum_axis(Axis(0)),
        };
        let input_gradient = delta.dot(&self.weights.t());

        (input_gradient, gradients)
    }
}

/// Dense network mapping a flattened window to one value per horizon step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    layers: Vec<DenseLayer>,
}

impl Network {
    /// One ReLU hidden layer followed by a linear output layer
    pub fn regression<R: Rng + ?Sized>(
        input_size: usize,
        hidden_units: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if input_size == 0 || hidden_units == 0 || output_size == 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Layer sizes must be positive, got {} -> {} -> {}",
                input_size, hidden_units, output_size
            )));
        }

        let hidden = DenseLayer::new(input_size, hidden_units, Activation::ReLU, rng);
        let output = DenseLayer::new(hidden_units, output_size, Activation::Linear, rng);

        Ok(Self {
            layers: vec![hidden, output],
        })
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    /// Get total number of parameters
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(DenseLayer::num_parameters).sum()
    }

    /// Run the network on a batch, one sample per row
    pub fn predict(&self, inputs: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(inputs)?;
        Ok(self
            .layers
            .iter()
            .fold(inputs.clone(), |acc, layer| layer.forward(&acc)))
    }

    fn check_input(&self, inputs: &Array2<f64>) -> Result<()> {
        if inputs.ncols() != self.input_size() {
            return Err(ForecastError::shape(
                (inputs.nrows(), self.input_size()),
                inputs.dim(),
            ));
        }
        Ok(())
    }

    /// Forward pass keeping the intermediate values needed by `backward`
    pub(crate) fn forward_cached(&self, inputs: &Array2<f64>) -> Result<(Array2<f64>, Vec<LayerCache>)> {
        self.check_input(inputs)?;

        let mut caches = Vec::with_capacity(self.layers.len());
        let mut output = inputs.clone();
        for layer in &self.layers {
            let (next, cache) = layer.forward_cached(&output);
            caches.push(cache);
            output = next;
        }
        Ok((output, caches))
    }

    /// Backpropagate `output_gradient`, returning per-layer gradients in layer order
    pub(crate) fn backward(&self, caches: &[LayerCache], output_gradient: Array2<f64>) -> Vec<LayerGradients> {
        let mut gradient = output_gradient;
        let mut all = Vec::with_capacity(self.layers.len());

        for (layer, cache) in self.layers.iter().zip(caches).rev() {
            let (input_gradient, gradients) = layer.backward(cache, &gradient);
            all.push(gradients);
            gradient = input_gradient;
        }

        all.reverse();
        all
    }

    /// Layer-by-layer overview of the architecture
    pub fn summary(&self) -> NetworkSummary<'_> {
        NetworkSummary { network: self }
    }
}

/// Printable architecture table returned by [`Network::summary`]
pub struct NetworkSummary<'a> {
    network: &'a Network,
}

impl fmt::Display for NetworkSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network Summary")?;
        writeln!(f, "======================")?;
        writeln!(f, "Input size: {}", self.network.input_size())?;
        for (i, layer) in self.network.layers.iter().enumerate() {
            writeln!(
                f,
                "Layer {}: {} -> {} ({:?}), params: {}",
                i + 1,
                layer.input_size(),
                layer.output_size(),
                layer.activation,
                layer.num_parameters()
            )?;
        }
        writeln!(f, "======================")?;
        write!(f, "Total parameters: {}", self.network.num_parameters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_regression_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = Network::regression(12, 5, 3, &mut rng).unwrap();

        assert_eq!(network.layers().len(), 2);
        assert_eq!(network.num_parameters(), 12 * 5 + 5 + 5 * 3 + 3);

        let output = network.predict(&Array2::ones((4, 12))).unwrap();
        assert_eq!(output.dim(), (4, 3));
    }

    #[test]
    fn test_same_seed_same_weights() {
        let a = Network::regression(6, 4, 2, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = Network::regression(6, 4, 2, &mut StdRng::seed_from_u64(7)).unwrap();
        let c = Network::regression(6, 4, 2, &mut StdRng::seed_from_u64(8)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_wrong_width() {
        let network = Network::regression(6, 4, 2, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(matches!(
            network.predict(&Array2::ones((1, 5))),
            Err(ForecastError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_summary_lists_layers() {
        let network = Network::regression(6, 4, 2, &mut StdRng::seed_from_u64(1)).unwrap();
        let text = network.summary().to_string();
        assert!(text.contains("Layer 1: 6 -> 4 (ReLU)"));
        assert!(text.contains("Total parameters: 38"));
    }
}

//! Adam (Adaptive Moment Estimation)

use crate::network::{LayerGradients, Network};
use ndarray::{Array1, Array2};

/// Moment estimates for one layer
#[derive(Debug, Clone)]
struct LayerMoments {
    m_w: Array2<f64>,
    v_w: Array2<f64>,
    m_b: Array1<f64>,
    v_b: Array1<f64>,
}

/// Adam optimizer holding moment estimates for every layer of one network
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    moments: Vec<LayerMoments>,
}

impl Adam {
    /// Adam with the usual defaults (beta1 0.9, beta2 0.999, epsilon 1e-7)
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            moments: Vec::new(),
        }
    }

    /// Number of updates applied so far
    pub fn iterations(&self) -> i32 {
        self.t
    }

    /// Apply one update to every layer of `network`
    pub(crate) fn step(&mut self, network: &mut Network, gradients: &[LayerGradients]) {
        let layers = network.layers_mut();
        if self.moments.len() != layers.len() {
            self.moments = layers
                .iter()
                .map(|l| LayerMoments {
                    m_w: Array2::zeros(l.weights.dim()),
                    v_w: Array2::zeros(l.weights.dim()),
                    m_b: Array1::zeros(l.biases.len()),
                    v_b: Array1::zeros(l.biases.len()),
                })
                .collect();
        }

        self.t += 1;
        let (b1, b2, eps) = (self.beta1, self.beta2, self.epsilon);
        let correction1 = 1.0 - b1.powi(self.t);
        let correction2 = 1.0 - b2.powi(self.t);
        let lr = self.learning_rate;

        for ((layer, grad), state) in layers.iter_mut().zip(gradients).zip(&mut self.moments) {
            state.m_w = &state.m_w * b1 + &grad.weights * (1.0 - b1);
            state.v_w = &state.v_w * b2 + &(&grad.weights * &grad.weights) * (1.0 - b2);
            state.m_b = &state.m_b * b1 + &grad.biases * (1.0 - b1);
            state.v_b = &state.v_b * b2 + &(&grad.biases * &grad.biases) * (1.0 - b2);

            let m_hat = &state.m_w / correction1;
            let v_hat = &state.v_w / correction2;
            layer.weights = &layer.weights - &(m_hat * lr / (v_hat.mapv(f64::sqrt) + eps));

            let m_hat = &state.m_b / correction1;
            let v_hat = &state.v_b / correction2;
            layer.biases = &layer.biases - &(m_hat * lr / (v_hat.mapv(f64::sqrt) + eps));
        }
    }
}

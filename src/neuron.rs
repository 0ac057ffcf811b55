use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Per-neuron learning rate stored on construction. Training always uses
/// the network-wide rate.
const NEURON_LEARNING_RATE: f64 = 0.1;

/// A single computational unit.
///
/// `weights[i]` is the weight applied to neuron `i` of the previous layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeuronUnit {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub learning_rate: f64,
    /// The activation written by the last forward pass.
    pub value: f64,
    /// The error signal written by the last backward pass.
    pub delta: f64,
}

impl NeuronUnit {
    /// Creates an input neuron, which only holds a value.
    pub fn input() -> Self {
        NeuronUnit {
            weights: Vec::new(),
            bias: 0.0,
            learning_rate: NEURON_LEARNING_RATE,
            value: 0.0,
            delta: 0.0,
        }
    }

    /// Creates a neuron fed by `inputs` neurons, with weights and bias drawn
    /// uniformly from `[-1, 1]`.
    pub fn random<R: Rng + ?Sized>(inputs: usize, rng: &mut R) -> Self {
        let range = Uniform::new_inclusive(-1.0, 1.0);
        let weights = (0..inputs).map(|_| range.sample(rng)).collect();
        NeuronUnit {
            weights,
            bias: range.sample(rng),
            learning_rate: NEURON_LEARNING_RATE,
            value: 0.0,
            delta: 0.0,
        }
    }

    /// Returns `bias + Σ weights[k] * previous[k].value`.
    pub fn weighted_sum(&self, previous: &[NeuronUnit]) -> f64 {
        debug_assert_eq!(self.weights.len(), previous.len());
        self.weights
            .iter()
            .zip(previous)
            .fold(self.bias, |sum, (w, n)| sum + w * n.value)
    }

    /// Moves the weights and bias along this neuron's current delta.
    pub fn apply_delta(&mut self, rate: f64, previous: &[NeuronUnit]) {
        debug_assert_eq!(self.weights.len(), previous.len());
        let step = rate * self.delta;
        for (w, n) in self.weights.iter_mut().zip(previous) {
            *w += step * n.value;
        }
        self.bias += step;
    }
}

//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network), trained
//! online with backpropagation.
//!
//! # Example
//!
//! Let's train a simple neural network to compute the XOR function:
//!
//! ```
//! # use mlpnet::feed_forward::Network;
//! # use mlpnet::{pattern, Activator};
//! // Create examples of the XOR function
//! let patterns = pattern::xor();
//!
//! // Train a network using those examples
//! let mut network = Network::with_seed(&[2, 4, 1], 0.5, Activator::Sigmoid, 1).unwrap();
//! let error = network.train(&patterns, 10_000).unwrap();
//! assert!(error < 0.05);
//!
//! // And verify the network correctly computes XOR!
//! for p in &patterns {
//!     let output = network.execute(p).unwrap();
//!     assert!((output[0] - p.targets[0]).abs() < 0.1);
//! }
//! ```

use crate::activator::Activator;
use crate::error::{Error, Result, Side};
use crate::layer::Layer;
use crate::pattern::Pattern;
use crate::state::NetworkState;
use crate::trainer::{Logging, Trainer};

use std::convert::TryFrom;

use itertools::multizip;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A Feedforward neural network
///
/// Layer 0 only holds the input values; every later layer is fully
/// connected to the one before it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct Network {
    learning_rate: f64,
    layers: Vec<Layer>,
    activator: Activator,
}

impl Network {
    /// Creates a new, untrained neural network with entropy-seeded weights.
    ///
    /// Arguments:
    ///  * `layer_sizes` - the number of neurons in each layer. Must contain
    ///                    at least 2 elements, none of them zero.
    ///  * `learning_rate` - the step size applied to every weight update.
    ///  * `activator` - the activation function to use for each neuron.
    pub fn new(layer_sizes: &[usize], learning_rate: f64, activator: Activator) -> Result<Self> {
        Self::with_rng(layer_sizes, learning_rate, activator, &mut rand::thread_rng())
    }

    /// Creates a network whose initial weights are fixed by `seed`.
    pub fn with_seed(
        layer_sizes: &[usize],
        learning_rate: f64,
        activator: Activator,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(layer_sizes, learning_rate, activator, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        learning_rate: f64,
        activator: Activator,
        rng: &mut R,
    ) -> Result<Self> {
        validate_topology(layer_sizes)?;
        validate_learning_rate(learning_rate)?;
        let mut layers = Vec::with_capacity(layer_sizes.len());
        layers.push(Layer::input(layer_sizes[0]));
        for sizes in layer_sizes.windows(2) {
            layers.push(Layer::random(sizes[1], sizes[0], rng));
        }
        Ok(Network {
            learning_rate,
            layers,
            activator,
        })
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.layers[0].len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.output_layer().len()
    }

    /// Returns the number of neurons in each layer.
    pub fn topology(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::len).collect()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    /// Returns a snapshot with no training progress attached.
    pub fn snapshot(&self) -> NetworkState {
        NetworkState::capture(self, 0, 0.0)
    }

    /// Feeds the pattern's features through the network, returning the
    /// output layer.
    pub fn execute(&mut self, pattern: &Pattern) -> Result<Vec<f64>> {
        self.run(&pattern.features)
    }

    /// Feeds `input` through the network, returning the output layer.
    ///
    /// Every neuron's cached value is overwritten.
    pub fn run(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_len() {
            return Err(Error::DimensionMismatch {
                side: Side::Input,
                pattern: 0,
                expected: self.input_len(),
                got: input.len(),
            });
        }
        self.feed_forward(input);
        Ok(self.output_layer().values())
    }

    /// Feeds the pattern's targets back through the network and updates
    /// every weight and bias in place. Returns the pattern's mean squared
    /// error.
    ///
    /// `outputs` must be the result of calling `execute` on the same pattern
    /// immediately before, since the cached activations of that pass drive
    /// the update.
    pub fn back_propagate(&mut self, pattern: &Pattern, outputs: &[f64]) -> Result<f64> {
        for &got in &[pattern.targets.len(), outputs.len()] {
            if got != self.output_len() {
                return Err(Error::DimensionMismatch {
                    side: Side::Output,
                    pattern: 0,
                    expected: self.output_len(),
                    got,
                });
            }
        }
        Ok(self.feed_backwards(&pattern.targets, outputs))
    }

    /// Trains the network online for `epochs` passes over `patterns`,
    /// returning the mean error over the final epoch.
    ///
    /// Nothing is modified if the patterns or epoch count are rejected.
    pub fn train(&mut self, patterns: &[Pattern], epochs: usize) -> Result<f64> {
        let report = Trainer::new()
            .epochs(epochs)
            .logging(Logging::Silent)
            .train(self, patterns)?;
        Ok(report.error)
    }

    /// Returns the mean over `patterns` of each pattern's mean squared error,
    /// without changing any weight.
    pub fn evaluate(&mut self, patterns: &[Pattern]) -> Result<f64> {
        self.validate(patterns)?;
        let mut total = 0.0;
        for pattern in patterns {
            self.feed_forward(&pattern.features);
            total += mean_square_error(&self.output_layer().values(), &pattern.targets);
        }
        Ok(total / patterns.len() as f64)
    }

    /// Verifies that `patterns` is non-empty and that every pattern fits
    /// this network.
    pub fn validate(&self, patterns: &[Pattern]) -> Result<()> {
        if patterns.is_empty() {
            return Err(Error::EmptyPatternSet);
        }
        for (i, pattern) in patterns.iter().enumerate() {
            let checks = [
                (Side::Input, self.input_len(), pattern.features.len()),
                (Side::Output, self.output_len(), pattern.targets.len()),
            ];
            for &(side, expected, got) in &checks {
                if expected != got {
                    return Err(Error::DimensionMismatch {
                        side,
                        pattern: i,
                        expected,
                        got,
                    });
                }
            }
        }
        Ok(())
    }

    /// Runs one online pass over already validated `patterns`, returning the
    /// mean of their errors.
    pub(crate) fn train_epoch(&mut self, patterns: &[Pattern]) -> f64 {
        let mut total = 0.0;
        for pattern in patterns {
            self.feed_forward(&pattern.features);
            let outputs = self.output_layer().values();
            total += self.feed_backwards(&pattern.targets, &outputs);
        }
        total / patterns.len() as f64
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Writes the input values and every later layer's activation, in
    /// layer order.
    fn feed_forward(&mut self, input: &[f64]) {
        for (neuron, &x) in self.layers[0].neurons_mut().iter_mut().zip(input) {
            neuron.value = x;
        }
        let activator = self.activator;
        for i in 1..self.layers.len() {
            let (previous, layer) = with_previous(&mut self.layers, i);
            for neuron in layer.neurons_mut() {
                neuron.value = activator.f(neuron.weighted_sum(previous.neurons()));
            }
        }
    }

    /// Computes every delta from the output layer down, then applies the
    /// updates from the first hidden layer up.
    fn feed_backwards(&mut self, targets: &[f64], outputs: &[f64]) -> f64 {
        let activator = self.activator;
        let last = self.layers.len() - 1;

        let mut squared_error = 0.0;
        for (neuron, &target, &output) in
            multizip((self.layers[last].neurons_mut(), targets, outputs))
        {
            let error = target - output;
            squared_error += error * error;
            neuron.delta = error * activator.fprime(output);
        }

        for l in (1..last).rev() {
            let (layer, next) = with_next(&mut self.layers, l);
            for (i, neuron) in layer.neurons_mut().iter_mut().enumerate() {
                let error: f64 = next
                    .neurons()
                    .iter()
                    .map(|n| n.delta * n.weights[i])
                    .sum();
                neuron.delta = error * activator.fprime(neuron.value);
            }
        }

        let rate = self.learning_rate;
        for l in 1..=last {
            let (previous, layer) = with_previous(&mut self.layers, l);
            for neuron in layer.neurons_mut() {
                neuron.apply_delta(rate, previous.neurons());
            }
        }

        squared_error / outputs.len() as f64
    }
}

/// A network as read from a serialized form, before its shape is checked.
#[derive(Deserialize)]
struct RawNetwork {
    learning_rate: f64,
    layers: Vec<Layer>,
    activator: Activator,
}

impl TryFrom<RawNetwork> for Network {
    type Error = Error;

    fn try_from(raw: RawNetwork) -> Result<Self> {
        let sizes: Vec<usize> = raw.layers.iter().map(Layer::len).collect();
        validate_topology(&sizes)?;
        validate_learning_rate(raw.learning_rate)?;
        for (l, layer) in raw.layers.iter().enumerate() {
            let expected = if l == 0 { 0 } else { sizes[l - 1] };
            for (neuron, n) in layer.neurons().iter().enumerate() {
                if n.weights.len() != expected {
                    return Err(Error::WeightCount {
                        layer: l,
                        neuron,
                        expected,
                        got: n.weights.len(),
                    });
                }
            }
        }
        Ok(Network {
            learning_rate: raw.learning_rate,
            layers: raw.layers,
            activator: raw.activator,
        })
    }
}

/// Checks that `learning_rate` is a usable step size.
pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(Error::InvalidLearningRate {
            rate: learning_rate,
        });
    }
    Ok(())
}

/// Checks that `layer_sizes` names at least two layers, none of them empty.
pub(crate) fn validate_topology(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(Error::InvalidTopology {
            layers: layer_sizes.len(),
        });
    }
    if let Some(index) = layer_sizes.iter().position(|&size| size == 0) {
        return Err(Error::EmptyLayer { index });
    }
    Ok(())
}

/// Gets layer `i - 1` alongside a mutable layer `i`.
fn with_previous(layers: &mut [Layer], i: usize) -> (&Layer, &mut Layer) {
    let (before, after) = layers.split_at_mut(i);
    (&before[i - 1], &mut after[0])
}

/// Gets a mutable layer `i` alongside layer `i + 1`.
fn with_next(layers: &mut [Layer], i: usize) -> (&mut Layer, &Layer) {
    let (before, after) = layers.split_at_mut(i + 1);
    (&mut before[i], &after[0])
}

/// Computes the mean squared error between `actual` and `expected`.
fn mean_square_error(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    let mut error = 0.0;
    for (&a, e) in actual.iter().zip(expected) {
        error += (a - e) * (a - e);
    }
    error / (actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern;

    fn xor_network(seed: u64) -> Network {
        Network::with_seed(&[2, 4, 1], 0.5, Activator::Sigmoid, seed).unwrap()
    }

    #[test]
    fn too_few_layers() {
        assert_eq!(
            Network::new(&[1], 0.5, Activator::Sigmoid),
            Err(Error::InvalidTopology { layers: 1 })
        );
        assert_eq!(
            Network::new(&[], 0.5, Activator::Sigmoid),
            Err(Error::InvalidTopology { layers: 0 })
        );
    }

    #[test]
    fn empty_layer() {
        assert_eq!(
            Network::new(&[1, 0, 1], 0.5, Activator::Sigmoid),
            Err(Error::EmptyLayer { index: 1 })
        );
    }

    #[test]
    fn weights_index_previous_layer() {
        let network = Network::with_seed(&[3, 5, 2, 4], 0.1, Activator::TanH, 9).unwrap();
        assert_eq!(network.topology(), vec![3, 5, 2, 4]);
        assert!(network.layers()[0].neurons().iter().all(|n| n.weights.is_empty()));
        for pair in network.layers().windows(2) {
            assert!(pair[1].neurons().iter().all(|n| n.weights.len() == pair[0].len()));
        }
    }

    #[test]
    fn bad_learning_rate() {
        for &rate in &[0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Network::new(&[2, 1], rate, Activator::Sigmoid),
                Err(Error::InvalidLearningRate { .. })
            ));
        }
    }

    #[test]
    fn json_keeps_network() {
        let network = xor_network(2);
        let json = serde_json::to_string(&network).unwrap();
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back, network);
    }

    #[test]
    fn json_without_layers_is_rejected() {
        let json = r#"{"learning_rate":0.5,"layers":[],"activator":"Sigmoid"}"#;
        let err = serde_json::from_str::<Network>(json).unwrap_err();
        assert!(err.to_string().contains("need at least 2 layers"), "{}", err);
    }

    #[test]
    fn json_with_misaligned_weights_is_rejected() {
        let neuron = r#"{"weights":[0.1,0.2],"bias":0.0,"learning_rate":0.1,"value":0.0,"delta":0.0}"#;
        let json = format!(
            r#"{{"learning_rate":0.5,"activator":"Sigmoid","layers":[
                {{"neurons":[],"len":2}},
                {{"neurons":[{}],"len":1}}]}}"#,
            neuron
        );
        assert!(serde_json::from_str::<Network>(&json).is_err());

        let input = r#"{"weights":[],"bias":0.0,"learning_rate":0.1,"value":0.0,"delta":0.0}"#;
        let json = format!(
            r#"{{"learning_rate":0.5,"activator":"Sigmoid","layers":[
                {{"neurons":[{input},{input},{input}],"len":2}},
                {{"neurons":[{neuron}],"len":1}}]}}"#,
            input = input,
            neuron = neuron
        );
        let err = serde_json::from_str::<Network>(&json).unwrap_err();
        assert!(err.to_string().contains("layer 1 neuron 0 has 2 weights"), "{}", err);
    }

    #[test]
    fn same_seed_same_network() {
        assert_eq!(xor_network(3), xor_network(3));
        assert_ne!(xor_network(3), xor_network(4));
    }

    #[test]
    fn execute_is_deterministic() {
        let mut network = xor_network(5);
        let pattern = Pattern::new([1.0, 0.0], [1.0]);
        let first = network.execute(&pattern).unwrap();
        let second = network.execute(&pattern).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].to_bits(), second[0].to_bits());
    }

    #[test]
    fn output_matches_output_layer() {
        for sizes in &[vec![1, 1], vec![2, 3], vec![4, 2, 7], vec![3, 8, 8, 2]] {
            let mut network = Network::with_seed(sizes, 0.5, Activator::Sigmoid, 2).unwrap();
            let output = network.run(&vec![0.5; sizes[0]]).unwrap();
            assert_eq!(output.len(), *sizes.last().unwrap());
            assert_eq!(output, network.layers()[sizes.len() - 1].values());
        }
    }

    #[test]
    fn input_values_are_not_activated() {
        let mut network = xor_network(6);
        network.run(&[3.0, -2.0]).unwrap();
        assert_eq!(network.layers()[0].values(), vec![3.0, -2.0]);
    }

    #[test]
    fn wrong_input_size() {
        let mut network = xor_network(1);
        let before = network.clone();
        let bad = Pattern::new([0.0, 0.0, 0.0], [0.0]);
        assert_eq!(
            network.execute(&bad),
            Err(Error::DimensionMismatch {
                side: Side::Input,
                pattern: 0,
                expected: 2,
                got: 3,
            })
        );

        let mut patterns = pattern::xor();
        patterns.push(bad);
        assert_eq!(
            network.train(&patterns, 10),
            Err(Error::DimensionMismatch {
                side: Side::Input,
                pattern: 4,
                expected: 2,
                got: 3,
            })
        );
        assert_eq!(network, before);
    }

    #[test]
    fn wrong_output_size() {
        let mut network = xor_network(1);
        let before = network.clone();
        let bad = Pattern::new([0.0, 1.0], [1.0, 0.0]);
        let outputs = network.execute(&bad).unwrap();
        let executed = network.clone();
        assert!(network.back_propagate(&bad, &outputs).is_err());
        assert_eq!(network, executed);

        let mut network = before.clone();
        assert!(network.train(&[bad], 5).is_err());
        assert_eq!(network, before);
    }

    #[test]
    fn empty_pattern_set() {
        let mut network = xor_network(1);
        let before = network.clone();
        assert_eq!(network.train(&[], 10), Err(Error::EmptyPatternSet));
        assert_eq!(network.evaluate(&[]), Err(Error::EmptyPatternSet));
        assert_eq!(network, before);
    }

    #[test]
    fn zero_epochs() {
        let mut network = xor_network(1);
        let before = network.clone();
        assert_eq!(network.train(&pattern::xor(), 0), Err(Error::InvalidEpochCount));
        assert_eq!(network, before);
    }

    #[test]
    fn single_update_by_hand() {
        let mut network = Network::with_seed(&[1, 1], 0.5, Activator::Sigmoid, 0).unwrap();
        {
            let neuron = &mut network.layers[1].neurons_mut()[0];
            neuron.weights = vec![0.5];
            neuron.bias = 0.0;
        }
        let pattern = Pattern::new([1.0], [1.0]);
        let outputs = network.execute(&pattern).unwrap();
        let y = 1.0 / (1.0 + (-0.5f64).exp());
        assert!((outputs[0] - y).abs() < 1e-12);

        let mse = network.back_propagate(&pattern, &outputs).unwrap();
        let error = 1.0 - y;
        let delta = error * y * (1.0 - y);
        let neuron = &network.layers()[1].neurons()[0];
        assert!((mse - error * error).abs() < 1e-12);
        assert!((neuron.delta - delta).abs() < 1e-12);
        assert!((neuron.weights[0] - (0.5 + 0.5 * delta)).abs() < 1e-12);
        assert!((neuron.bias - 0.5 * delta).abs() < 1e-12);
    }

    #[test]
    fn hidden_delta_uses_next_layer_weights() {
        let mut network = Network::with_seed(&[1, 2, 1], 1.0, Activator::Sigmoid, 0).unwrap();
        let pattern = Pattern::new([1.0], [0.0]);
        let outputs = network.execute(&pattern).unwrap();
        let output_weights = network.layers()[2].neurons()[0].weights.clone();
        let hidden = network.layers()[1].values();
        network.back_propagate(&pattern, &outputs).unwrap();

        let out_delta = network.layers()[2].neurons()[0].delta;
        assert!((out_delta - (0.0 - outputs[0]) * outputs[0] * (1.0 - outputs[0])).abs() < 1e-12);
        for i in 0..2 {
            let expected = out_delta * output_weights[i] * hidden[i] * (1.0 - hidden[i]);
            assert!((network.layers()[1].neurons()[i].delta - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn evaluate_leaves_weights_alone() {
        let mut network = xor_network(8);
        let weights: Vec<_> = network.layers()[1].neurons().iter().map(|n| n.weights.clone()).collect();
        let error = network.evaluate(&pattern::xor()).unwrap();
        assert!(error > 0.0);
        let after: Vec<_> = network.layers()[1].neurons().iter().map(|n| n.weights.clone()).collect();
        assert_eq!(weights, after);
    }

    #[test]
    fn training_keeps_shape() {
        let mut network = Network::with_seed(&[2, 3, 3, 1], 0.5, Activator::Sigmoid, 12).unwrap();
        network.train(&pattern::xor(), 50).unwrap();
        assert_eq!(network.topology(), vec![2, 3, 3, 1]);
        for pair in network.layers().windows(2) {
            assert!(pair[1].neurons().iter().all(|n| n.weights.len() == pair[0].len()));
        }
    }

    #[test]
    fn learns_xor() {
        let patterns = pattern::xor();
        let mut network = xor_network(1);
        let initial = network.evaluate(&patterns).unwrap();

        network.train(&patterns, 10_000).unwrap();
        let trained = network.evaluate(&patterns).unwrap();
        assert!(trained < initial);
        assert!(trained < 0.05, "mse {} after training", trained);

        for p in &patterns {
            let output = network.execute(p).unwrap();
            assert!(
                (output[0] - p.targets[0]).abs() < 0.1,
                "{:?} -> {:?}",
                p.features,
                output
            );
        }
    }
}

//! Read-only snapshots of a network, as handed to clients.

use crate::feed_forward::Network;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeuronState {
    pub weights: Vec<f64>,
    pub value: f64,
    pub bias: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    pub neurons: Vec<NeuronState>,
}

/// Every layer's weights, biases and last activations, together with the
/// training progress that produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub layers: Vec<LayerState>,
    pub error: f64,
    pub epoch: usize,
}

impl NetworkState {
    pub fn capture(network: &Network, epoch: usize, error: f64) -> Self {
        let layers = network
            .layers()
            .iter()
            .map(|layer| LayerState {
                neurons: layer
                    .neurons()
                    .iter()
                    .map(|n| NeuronState {
                        weights: n.weights.clone(),
                        value: n.value,
                        bias: n.bias,
                    })
                    .collect(),
            })
            .collect();
        NetworkState {
            layers,
            error,
            epoch,
        }
    }

    /// Returns the number of neurons in each layer.
    pub fn topology(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.neurons.len()).collect()
    }
}

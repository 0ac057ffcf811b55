use crate::neuron::NeuronUnit;

use rand::Rng;

/// An ordered group of neurons sharing the same inputs.
///
/// A neuron's position here is the index the next layer's weights refer to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLayer")]
pub struct Layer {
    neurons: Vec<NeuronUnit>,
    len: usize,
}

/// A serialized layer. Its width counter is ignored and recounted.
#[derive(Deserialize)]
struct RawLayer {
    neurons: Vec<NeuronUnit>,
}

impl From<RawLayer> for Layer {
    fn from(raw: RawLayer) -> Self {
        Layer {
            len: raw.neurons.len(),
            neurons: raw.neurons,
        }
    }
}

impl Layer {
    /// Initializes an input layer of `width` value holders.
    pub fn input(width: usize) -> Self {
        Layer {
            neurons: vec![NeuronUnit::input(); width],
            len: width,
        }
    }

    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `width` - the number of neurons in the layer.
    ///  * `inputs` - the width of the previous layer.
    pub fn random<R: Rng + ?Sized>(width: usize, inputs: usize, rng: &mut R) -> Self {
        Layer {
            neurons: (0..width).map(|_| NeuronUnit::random(inputs, rng)).collect(),
            len: width,
        }
    }

    /// Returns the number of neurons in this layer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn neurons(&self) -> &[NeuronUnit] {
        &self.neurons
    }

    pub(crate) fn neurons_mut(&mut self) -> &mut [NeuronUnit] {
        &mut self.neurons
    }

    /// Returns the cached activation of every neuron, in order.
    pub fn values(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.value).collect()
    }
}

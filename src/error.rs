//! Errors raised by network construction, training and the service layer.
//!
//! Every variant except `Poisoned` is an input validation failure, detected
//! before the network is touched.

use std::fmt;

use thiserror::Error;

/// Which end of the network a pattern disagreed with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// The pattern's features against the input layer.
    Input,
    /// The pattern's targets against the output layer.
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Side::Input => write!(f, "input"),
            Side::Output => write!(f, "output"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Fewer than two layers were requested.
    #[error("invalid topology: need at least 2 layers, got {layers}")]
    InvalidTopology { layers: usize },

    /// A layer was requested with no neurons.
    #[error("invalid topology: layer {index} has no neurons")]
    EmptyLayer { index: usize },

    /// A pattern's width disagrees with the network.
    #[error("{side} size mismatch in pattern {pattern}: expected {expected}, got {got}")]
    DimensionMismatch {
        side: Side,
        pattern: usize,
        expected: usize,
        got: usize,
    },

    /// A neuron's weights do not line up with the previous layer.
    #[error("layer {layer} neuron {neuron} has {got} weights, previous layer has {expected} neurons")]
    WeightCount {
        layer: usize,
        neuron: usize,
        expected: usize,
        got: usize,
    },

    #[error("learning rate must be finite and positive, got {rate}")]
    InvalidLearningRate { rate: f64 },

    #[error("no training patterns provided")]
    EmptyPatternSet,

    #[error("epoch count must be at least 1")]
    InvalidEpochCount,

    /// A writer panicked while holding the network lock.
    #[error("network state is poisoned")]
    Poisoned,
}

impl Error {
    /// Returns true if the error was caused by the caller's input.
    pub fn is_bad_request(&self) -> bool {
        match *self {
            Error::Poisoned => false,
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

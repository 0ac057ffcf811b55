//! Utilities for training neural networks.

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::pattern::Pattern;

use std::time::Instant;

use tracing::{debug, info};

/// A builder for training runs.
///
/// Training is strictly online: weights are updated after every pattern, and
/// patterns are visited in the order given.
#[derive(Copy, Clone, Debug)]
pub struct Trainer {
    epochs: usize,
    logging: Logging,
}

impl Default for Trainer {
    fn default() -> Self {
        Trainer::new()
    }
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * Stops after 1000 epochs.
    /// * Logs on training completion.
    pub fn new() -> Self {
        Trainer {
            epochs: 1000,
            logging: Logging::Completion,
        }
    }

    /// Sets the number of passes over the training patterns.
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Trains `network` in place using the provided labelled data.
    ///
    /// Returns:
    ///   The epoch count and the mean error of the final epoch, or an error
    ///   if invalid training parameters were provided. The network is left
    ///   untouched on error.
    pub fn train(&self, network: &mut Network, patterns: &[Pattern]) -> Result<TrainingReport> {
        if self.epochs == 0 {
            return Err(Error::InvalidEpochCount);
        }
        network.validate(patterns)?;
        debug!(
            "training {:?} on {} patterns for {} epochs",
            network.topology(),
            patterns.len(),
            self.epochs
        );

        let start_time = Instant::now();
        let mut training_error = 0.0;
        for epoch in 1..=self.epochs {
            training_error = network.train_epoch(patterns);
            self.logging.iteration(epoch, training_error);
        }
        self.logging
            .completion(self.epochs, training_error, start_time);
        Ok(TrainingReport {
            epochs: self.epochs,
            error: training_error,
        })
    }
}

/// The outcome of a training run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    /// Mean over the final epoch of each pattern's mean squared error.
    pub error: f64,
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be emitted at completion
    Completion,
    /// A summary will be emitted after every `n` epochs
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `epoch` of training.
    fn iteration(&self, epoch: usize, training_error: f64) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                info!("Epoch {}:\tMSE={}", epoch, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, epochs: usize, training_error: f64, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "Ran {} epochs in {} ms, final MSE: {}",
            epochs,
            start_time.elapsed().as_millis(),
            training_error
        );
    }
}

//! Shared access to a single network for request handlers.
//!
//! One writer trains or resets the network while any number of readers take
//! snapshots; a snapshot never observes a network part way through an
//! update.

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::pattern::Pattern;
use crate::state::NetworkState;
use crate::trainer::{Logging, Trainer};

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

/// A request to train the served network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub patterns: Vec<Pattern>,
    /// Zero means the configured default.
    #[serde(default)]
    pub epochs: usize,
}

/// A request to rebuild the served network.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Falls back to the configured topology when absent.
    #[serde(default)]
    pub topology: Option<Vec<usize>>,
}

#[derive(Debug)]
struct Served {
    network: Network,
    epoch: usize,
    error: f64,
}

impl Served {
    fn new(network: Network) -> Self {
        Served {
            network,
            epoch: 0,
            error: 0.0,
        }
    }

    fn snapshot(&self) -> NetworkState {
        NetworkState::capture(&self.network, self.epoch, self.error)
    }
}

/// A cloneable handle to the served network.
#[derive(Clone, Debug)]
pub struct NetworkService {
    config: Arc<ServiceConfig>,
    served: Arc<RwLock<Served>>,
}

impl NetworkService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let network = build(&config, &config.topology)?;
        Ok(NetworkService {
            config: Arc::new(config),
            served: Arc::new(RwLock::new(Served::new(network))),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the current weights, values and training progress.
    pub fn state(&self) -> Result<NetworkState> {
        Ok(self.read()?.snapshot())
    }

    /// Trains the network on the request's patterns.
    ///
    /// The epoch counter accumulates across calls. The reported error is
    /// re-evaluated on the request's patterns once training finishes, as the
    /// mean over patterns of each pattern's mean squared error, so it does
    /// not grow with the output width.
    pub fn train(&self, request: &TrainingRequest) -> Result<NetworkState> {
        let epochs = if request.epochs == 0 {
            self.config.default_epochs
        } else {
            request.epochs
        };

        let mut served = self.write()?;
        let report = Trainer::new()
            .epochs(epochs)
            .logging(Logging::Silent)
            .train(&mut served.network, &request.patterns)
            .map_err(|e| {
                warn!("rejected training request: {}", e);
                e
            })?;
        served.epoch += report.epochs;
        served.error = served.network.evaluate(&request.patterns)?;
        info!(
            "trained {} epochs on {} patterns, epoch {} error {}",
            report.epochs,
            request.patterns.len(),
            served.epoch,
            served.error
        );
        Ok(served.snapshot())
    }

    /// Replaces the network with a freshly initialized one.
    pub fn reset(&self, topology: Option<&[usize]>) -> Result<NetworkState> {
        let topology = topology.unwrap_or(&self.config.topology);
        let network = build(&self.config, topology).map_err(|e| {
            warn!("rejected reset request: {}", e);
            e
        })?;
        let mut served = self.write()?;
        *served = Served::new(network);
        info!("reset network to {:?}", topology);
        Ok(served.snapshot())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Served>> {
        self.served.read().map_err(|_| Error::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Served>> {
        self.served.write().map_err(|_| Error::Poisoned)
    }
}

fn build(config: &ServiceConfig, topology: &[usize]) -> Result<Network> {
    match config.seed {
        Some(seed) => Network::with_seed(topology, config.learning_rate, config.activator, seed),
        None => Network::new(topology, config.learning_rate, config.activator),
    }
}

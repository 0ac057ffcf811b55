//! Settings for a network served to clients.

use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::feed_forward::{validate_learning_rate, validate_topology};

/// How the served network is built and how the server listens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Layer widths used on startup and when a reset names no topology.
    pub topology: Vec<usize>,
    pub learning_rate: f64,
    pub activator: Activator,
    /// Epochs run when a training request asks for none.
    pub default_epochs: usize,
    /// Fixes the weights of every network built, for reproducible runs.
    pub seed: Option<u64>,
    pub bind: String,
    pub allowed_origin: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            topology: vec![2, 4, 1],
            learning_rate: 0.5,
            activator: Activator::Sigmoid,
            default_epochs: 1000,
            seed: None,
            bind: "0.0.0.0:8080".to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Checks the topology, learning rate and default epoch count before any network is
    /// built from them.
    pub fn validate(&self) -> Result<()> {
        validate_topology(&self.topology)?;
        validate_learning_rate(self.learning_rate)?;
        if self.default_epochs == 0 {
            return Err(Error::InvalidEpochCount);
        }
        Ok(())
    }
}

/// Parses a comma separated list of layer widths, e.g. `2,4,1`.
pub fn parse_topology(s: &str) -> std::result::Result<Vec<usize>, String> {
    s.split(',')
        .map(|w| {
            w.trim()
                .parse::<usize>()
                .map_err(|e| format!("bad layer width {:?}: {}", w, e))
        })
        .collect()
}

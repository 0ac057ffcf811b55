//! A multilayer perceptron trained online with backpropagation, and a small
//! service for sharing one network between request handlers.

#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod api;
pub mod config;
pub mod error;
pub mod feed_forward;
pub mod layer;
pub mod neuron;
pub mod pattern;
pub mod service;
pub mod state;
pub mod trainer;

pub use crate::activator::Activator;
pub use crate::config::ServiceConfig;
pub use crate::error::{Error, Result};
pub use crate::feed_forward::Network;
pub use crate::pattern::Pattern;
pub use crate::service::NetworkService;
pub use crate::state::NetworkState;
pub use crate::trainer::{Logging, Trainer};

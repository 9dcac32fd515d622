//! Tabular Q-learning on a grid world with fire pits and teleporters
//!
//! A [`GridWorld`](gym::GridWorld) supplies the transitions and a
//! [`QTableAgent`](algo::tabular::QTableAgent) learns from them, one episode at a time.

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Errors
pub mod error;

/// Exploration policies
pub mod exploration;

/// Observed transitions
pub mod memory;

/// Testing environments
pub mod gym;

#[doc(hidden)]
pub mod util;

pub use error::{Error, Result};

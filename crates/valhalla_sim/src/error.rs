//! # Simulation Error Types
//!
//! The simulation proper has no recoverable failures: stale targets are
//! expected steady state and contract violations panic loudly. The only
//! fallible surface is configuration loading at startup.

use thiserror::Error;

/// Errors that can occur while configuring a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`crate::SimConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

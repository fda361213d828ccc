//! CLI module for budgetsim
//!
//! Handles command-line argument parsing and scenario configuration.

pub mod args;
pub mod config;

pub use args::{Args, Commands, Verbosity};
pub use config::{Config, OutputConfig, SimulatorConfig};

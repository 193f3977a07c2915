//! CLI command implementations for herakles-memprobe.
//!
//! This module provides implementations for the probe and its subcommands:
//! - `probe`: The memory check itself (default when no subcommand is given)
//! - `check`: System validation
//! - `config`: Configuration file generation
//! - `generate`: Test data generation

pub mod check;
pub mod config;
pub mod generate;
pub mod probe;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use generate::{command_generate_testdata, GenerateOptions};
pub use probe::{command_probe, probe_processes, run_probe};

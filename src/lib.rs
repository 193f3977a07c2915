//! Herakles Memory Probe Library
//!
//! A Nagios-compatible check for the memory behaviour of one named program.
//! All running instances are classified by virtual memory size against a
//! warning and a critical threshold, swap activity is detected, and a single
//! status line with the plugin exit code is produced.
//!
//! The decision logic lives in [`probe`] and works on injected samples, so it
//! can be used without access to `/proc`.
//!
//! # Usage
//!
//! ```rust
//! use herakles_memprobe::{evaluate, ProcessSample, Thresholds};
//!
//! let thresholds = Thresholds::from_megabytes(200, 300).unwrap();
//! let samples = vec![
//!     ProcessSample {
//!         pid: 10,
//!         identity: "alpha".to_string(),
//!         virtual_memory_bytes: 100 * 1_048_576,
//!         swap_bytes: 0,
//!     },
//!     ProcessSample {
//!         pid: 11,
//!         identity: "beta".to_string(),
//!         virtual_memory_bytes: 350 * 1_048_576,
//!         swap_bytes: 0,
//!     },
//! ];
//!
//! let outcome = evaluate(&samples, &thresholds).outcome("thor");
//! println!("{}", outcome.message);
//! assert_eq!(outcome.exit_code(), 2);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod probe;
pub mod process;

// Re-export main types for convenience
pub use error::{ProbeError, Result};
pub use probe::{evaluate, AggregateResult, CheckOutcome, ProcessSample, Status, Thresholds};
pub use process::{LabelRule, ProcessRecord, ProcessSource, ProcfsSource, TestDataSource};

//! Memory limit evaluation for a snapshot of process samples.
//!
//! This module holds the decision logic of the probe and nothing else: it
//! never touches `/proc`, so every rule here can be tested with injected
//! samples.
//!
//! # Usage
//!
//! ```rust
//! use herakles_memprobe::{evaluate, ProcessSample, Status, Thresholds};
//!
//! let thresholds = Thresholds::from_megabytes(200, 300).unwrap();
//! let samples = vec![ProcessSample {
//!     pid: 4242,
//!     identity: "alpha".to_string(),
//!     virtual_memory_bytes: 250 * 1_048_576,
//!     swap_bytes: 0,
//! }];
//!
//! let result = evaluate(&samples, &thresholds);
//! let outcome = result.outcome("thor");
//! assert_eq!(outcome.status, Status::Warning);
//! assert_eq!(outcome.exit_code(), 1);
//! ```

use crate::error::{ProbeError, Result};
use serde::Serialize;
use std::fmt;

/// Bytes in one megabyte, as used for thresholds and the summary text.
pub const BYTES_PER_MB: u64 = 1_048_576;

/// Plugin status, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    /// Exit code understood by the monitoring supervisor.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Warning => write!(f, "WARNING"),
            Status::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Warning and critical limits for virtual memory, in bytes.
///
/// `critical_bytes` is expected to be at least `warning_bytes` but this is
/// not enforced. With inverted limits the warning band is empty and every
/// sample at or above `warning_bytes` is critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub warning_bytes: u64,
    pub critical_bytes: u64,
}

impl Thresholds {
    pub fn new(warning_bytes: u64, critical_bytes: u64) -> Self {
        Self {
            warning_bytes,
            critical_bytes,
        }
    }

    /// Converts megabyte limits from the command line into byte limits.
    ///
    /// Zero, negative, and overflowing values are rejected.
    pub fn from_megabytes(warning_mb: i64, critical_mb: i64) -> Result<Self> {
        Ok(Self {
            warning_bytes: megabytes_to_bytes("wthres", warning_mb)?,
            critical_bytes: megabytes_to_bytes("cthres", critical_mb)?,
        })
    }

    /// Classifies a single virtual memory reading.
    ///
    /// The warning band is checked before the critical band.
    pub fn classify(&self, virtual_memory_bytes: u64) -> Status {
        if virtual_memory_bytes < self.warning_bytes {
            Status::Ok
        } else if virtual_memory_bytes < self.critical_bytes {
            Status::Warning
        } else {
            Status::Critical
        }
    }
}

fn megabytes_to_bytes(flag: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .ok()
        .filter(|mb| *mb > 0)
        .and_then(|mb| mb.checked_mul(BYTES_PER_MB))
        .ok_or(ProbeError::InvalidThreshold { flag, value })
}

/// One observed process instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSample {
    pub pid: u32,
    /// Short display label derived from the command line.
    pub identity: String,
    pub virtual_memory_bytes: u64,
    pub swap_bytes: u64,
}

impl ProcessSample {
    pub fn is_swapping(&self) -> bool {
        self.swap_bytes > 0
    }

    fn summary_entry(&self) -> String {
        if self.is_swapping() {
            format!("{}:SWAPPING", self.identity)
        } else {
            format!(
                "{}:{}MB",
                self.identity,
                self.virtual_memory_bytes / BYTES_PER_MB
            )
        }
    }
}

/// Result of evaluating one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    /// Per-sample status, in input order.
    pub statuses: Vec<Status>,
    pub warning_count: usize,
    pub critical_count: usize,
    pub any_swapping: bool,
    /// `label:<N>MB` or `label:SWAPPING` per sample, comma separated.
    pub summary: String,
}

/// Classifies every sample and aggregates the snapshot.
///
/// Callers handle the empty snapshot themselves (see
/// [`CheckOutcome::unknown_process`]); an empty slice yields zero counts and
/// an empty summary.
pub fn evaluate(samples: &[ProcessSample], thresholds: &Thresholds) -> AggregateResult {
    let statuses: Vec<Status> = samples
        .iter()
        .map(|s| thresholds.classify(s.virtual_memory_bytes))
        .collect();

    let warning_count = statuses.iter().filter(|s| **s == Status::Warning).count();
    let critical_count = statuses.iter().filter(|s| **s == Status::Critical).count();
    let any_swapping = samples.iter().any(ProcessSample::is_swapping);

    let summary = samples
        .iter()
        .map(ProcessSample::summary_entry)
        .collect::<Vec<_>>()
        .join(", ");

    AggregateResult {
        statuses,
        warning_count,
        critical_count,
        any_swapping,
        summary,
    }
}

impl AggregateResult {
    pub fn process_count(&self) -> usize {
        self.statuses.len()
    }

    /// Picks the final status and message for the supervisor.
    pub fn outcome(&self, process_name: &str) -> CheckOutcome {
        let summary = &self.summary;
        let swapping = if self.any_swapping {
            "Swapping detected. "
        } else {
            ""
        };

        match (self.warning_count, self.critical_count, self.any_swapping) {
            (0, 0, false) => CheckOutcome::new(
                Status::Ok,
                format!(
                    "MEMORY LIMITS OK: \"{}\" Process{} operating within allowed parameters ({}).",
                    process_name,
                    plural(self.process_count()),
                    summary
                ),
            ),
            (0, 0, true) => CheckOutcome::new(
                Status::Critical,
                format!("CRITICAL: Swapping detected. ({}).", summary),
            ),
            (warn, 0, false) => CheckOutcome::new(
                Status::Warning,
                format!(
                    "WARNING: ({}) Process{} operating above allowed parameters ({}).",
                    warn,
                    plural(warn),
                    summary
                ),
            ),
            (warn, 0, true) => CheckOutcome::new(
                Status::Critical,
                format!(
                    "CRITICAL: {}({}) Process{} operating above allowed parameters ({}).",
                    swapping,
                    warn,
                    plural(warn),
                    summary
                ),
            ),
            (0, crit, _) => CheckOutcome::new(
                Status::Critical,
                format!(
                    "CRITICAL: {}({}) Process{} exceeded critical thresholds ({}).",
                    swapping,
                    crit,
                    plural(crit),
                    summary
                ),
            ),
            (warn, crit, _) => CheckOutcome::new(
                Status::Critical,
                format!(
                    "CRITICAL: {}({}) Process{} exceeded critical thresholds and ({}) process{} \
                     operating above allowed parameters ({}).",
                    swapping,
                    crit,
                    plural(crit),
                    warn,
                    plural(warn),
                    summary
                ),
            ),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "es"
    }
}

/// Final status line and exit status of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub status: Status,
    pub message: String,
}

impl CheckOutcome {
    pub fn new(status: Status, message: String) -> Self {
        Self { status, message }
    }

    /// No process matched. Reported as OK so the supervisor does not alert.
    pub fn unknown_process(process_name: &str) -> Self {
        Self::new(
            Status::Ok,
            format!(
                "MEMORY UNKNOWN - could not find any process named {}.",
                process_name
            ),
        )
    }

    /// Bad input or an unusable environment.
    pub fn from_error(error: &ProbeError) -> Self {
        Self::new(Status::Warning, format!("WARNING - {}", error))
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

//! Probe command implementation.
//!
//! Runs one memory check: snapshot the named processes, evaluate them against
//! the thresholds and return the status line for the supervisor.

use tracing::{debug, info, warn};

use crate::cli::Args;
use crate::config::Config;
use crate::error::{ProbeError, Result};
use crate::probe::{evaluate, CheckOutcome, ProcessSample, Thresholds};
use crate::process::{LabelRule, ProcessSource, ProcfsSource, TestDataSource};

/// Runs the probe and maps any failure to a WARNING status line.
pub fn command_probe(args: &Args, config: &Config) -> CheckOutcome {
    match run_probe(args, config) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Probe failed: {}", e);
            CheckOutcome::from_error(&e)
        }
    }
}

/// Validates the probe arguments, picks the process source and evaluates.
pub fn run_probe(args: &Args, config: &Config) -> Result<CheckOutcome> {
    let (name, warning_mb, critical_mb) = args
        .probe_arguments()
        .ok_or(ProbeError::InsufficientArguments)?;

    let thresholds = Thresholds::from_megabytes(warning_mb, critical_mb)?;
    if thresholds.warning_bytes >= thresholds.critical_bytes {
        warn!(
            "Warning threshold ({} MB) is not below critical threshold ({} MB); \
             no process can be reported as WARNING",
            warning_mb, critical_mb
        );
    }

    let source: Box<dyn ProcessSource> = match &config.test_data_file {
        Some(path) => {
            info!("Using test data from {}", path.display());
            Box::new(TestDataSource::new(path))
        }
        None => Box::new(ProcfsSource::new(config.proc_root(), config.max_processes)),
    };

    probe_processes(source.as_ref(), name, &thresholds, &config.label_rule())
}

/// Evaluates one snapshot of `name` taken from `source`.
pub fn probe_processes(
    source: &dyn ProcessSource,
    name: &str,
    thresholds: &Thresholds,
    labels: &LabelRule,
) -> Result<CheckOutcome> {
    let records = source.query_processes_by_name(name)?;
    if records.is_empty() {
        info!("No process named {} found", name);
        return Ok(CheckOutcome::unknown_process(name));
    }

    let samples: Vec<ProcessSample> = records
        .into_iter()
        .map(|record| record.into_sample(labels))
        .collect();

    let result = evaluate(&samples, thresholds);
    debug!(
        "Evaluated {} processes: warning={} critical={} swapping={}",
        result.process_count(),
        result.warning_count,
        result.critical_count,
        result.any_swapping
    );

    Ok(result.outcome(name))
}

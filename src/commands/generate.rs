//! Generate testdata command implementation.
//!
//! Generates synthetic process snapshots as JSON so the probe can be run
//! against known data instead of the live process table.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ProbeError, Result};
use crate::probe::BYTES_PER_MB;
use crate::process::ProcessRecord;

/// Format version written by `generate-testdata`.
pub const TEST_DATA_VERSION: &str = "1.0";

// Lower bound for generated virtual memory sizes
const MIN_VMS_MB: u64 = 16;

// Swapped amounts stay well below the VMS of the process
const MAX_SWAP_MB: u64 = 256;

/// Test process entry for JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestProcess {
    pub pid: u32,
    pub name: String,
    #[serde(default)]
    pub cmdline: Vec<String>,
    /// Virtual memory size in bytes.
    pub vms: u64,
    /// Swapped-out memory in bytes.
    #[serde(default)]
    pub swap: u64,
}

/// Root structure for test data JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestData {
    pub version: String,
    pub generated_at: String,
    pub processes: Vec<TestProcess>,
}

impl From<TestProcess> for ProcessRecord {
    fn from(tp: TestProcess) -> Self {
        ProcessRecord {
            pid: tp.pid,
            name: tp.name,
            cmdline: tp.cmdline,
            vm_size: tp.vms,
            vm_swap: tp.swap,
        }
    }
}

/// Load test data from JSON file.
pub fn load_test_data_from_file(path: &Path) -> Result<TestData> {
    debug!("Loading test data from: {}", path.display());

    if !path.exists() {
        return Err(ProbeError::TestData(format!(
            "Test data file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ProbeError::TestData(format!("Failed to read test data file: {}", e))
    })?;
    let test_data: TestData = serde_json::from_str(&content).map_err(|e| {
        ProbeError::TestData(format!("Failed to parse test data JSON: {}", e))
    })?;

    info!(
        "Loaded test data version {} from {}",
        test_data.version, test_data.generated_at
    );

    Ok(test_data)
}

/// Options for `generate-testdata`.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output: PathBuf,
    pub process_name: String,
    pub count: usize,
    pub max_vms_mb: u64,
    pub swap_ratio: f64,
}

/// Builds a synthetic snapshot of `count` instances of one program.
///
/// Command lines are built from the configured label prefix and suffix so the
/// probe derives short labels (`instance-1`, `instance-2`, ...) from them.
pub fn generate_test_data(
    rng: &mut impl Rng,
    options: &GenerateOptions,
    config: &Config,
) -> Result<TestData> {
    if options.count == 0 {
        return Err(ProbeError::TestData("count must be at least 1".into()));
    }
    if options.max_vms_mb <= MIN_VMS_MB {
        return Err(ProbeError::TestData(format!(
            "max VMS must be larger than {} MB",
            MIN_VMS_MB
        )));
    }
    let max_vms_bytes = options
        .max_vms_mb
        .checked_mul(BYTES_PER_MB)
        .ok_or_else(|| {
            ProbeError::TestData(format!(
                "max VMS too large: {} MB does not fit in bytes",
                options.max_vms_mb
            ))
        })?;
    if !(0.0..=1.0).contains(&options.swap_ratio) {
        return Err(ProbeError::TestData(format!(
            "swap ratio must be between 0.0 and 1.0, got {}",
            options.swap_ratio
        )));
    }

    let rule = config.label_rule();
    let mut processes = Vec::with_capacity(options.count);

    for i in 0..options.count {
        let command = format!("{}instance-{}{}", rule.prefix, i + 1, rule.suffix);
        let vms = rng.gen_range(MIN_VMS_MB * BYTES_PER_MB..max_vms_bytes);
        let swap = if rng.gen_bool(options.swap_ratio) {
            rng.gen_range(1..MAX_SWAP_MB * BYTES_PER_MB)
        } else {
            0
        };

        processes.push(TestProcess {
            pid: 1000 + i as u32,
            name: options.process_name.clone(),
            cmdline: vec![command, "--daemon".to_string()],
            vms,
            swap,
        });
    }

    Ok(TestData {
        version: TEST_DATA_VERSION.to_string(),
        generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        processes,
    })
}

/// Generates synthetic test data JSON file for testing purposes.
pub fn command_generate_testdata(options: &GenerateOptions, config: &Config) -> Result<()> {
    debug!(
        "Generating test data: name={}, count={}, output={}",
        options.process_name,
        options.count,
        options.output.display()
    );

    let mut rng = rand::thread_rng();
    let test_data = generate_test_data(&mut rng, options, config)?;

    // Write to file as pretty-printed JSON
    let json_content = serde_json::to_string_pretty(&test_data)?;
    fs::write(&options.output, &json_content)?;

    println!(
        "✅ Generated test data: {} processes in {}",
        test_data.processes.len(),
        options.output.display()
    );

    Ok(())
}

//! Memory parsing utilities for reading process memory figures from /proc.
//!
//! The probe only needs two values per process, both taken from
//! `/proc/<pid>/status`: `VmSize` (virtual memory size) and `VmSwap`.

use std::fs;
use std::path::Path;

/// Memory figures of one process, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusMemory {
    pub vm_size: u64,
    pub vm_swap: u64,
}

/// Parses kilobyte values from status file lines.
pub fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}

/// Extracts `VmSize` and `VmSwap` from the contents of a status file.
///
/// Kernel threads have neither line and report zero. `VmSwap` is also absent
/// on kernels older than 2.6.34.
pub fn parse_status_memory(content: &str) -> StatusMemory {
    let mut mem = StatusMemory::default();

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("VmSize:") {
            mem.vm_size = parse_kb_value(v).unwrap_or(0).saturating_mul(1024);
        } else if let Some(v) = line.strip_prefix("VmSwap:") {
            mem.vm_swap = parse_kb_value(v).unwrap_or(0).saturating_mul(1024);
        }
    }

    mem
}

/// Reads VmSize and VmSwap from /proc/[pid]/status.
pub fn read_status_memory(proc_path: &Path) -> Result<StatusMemory, std::io::Error> {
    let content = fs::read_to_string(proc_path.join("status"))?;
    Ok(parse_status_memory(&content))
}

//! Process-related modules for discovering processes and reading their memory.
//!
//! This module provides:
//! - `scanner`: Process discovery, names and command lines
//! - `memory`: VmSize/VmSwap parsing from /proc/<pid>/status
//! - `label`: Display labels derived from command lines
//! - `source`: The `ProcessSource` seam with procfs and test data implementations

pub mod label;
pub mod memory;
pub mod scanner;
pub mod source;

// Re-export commonly used types
pub use label::{LabelRule, DEFAULT_LABEL_PREFIX, DEFAULT_LABEL_SUFFIX};
pub use memory::{parse_kb_value, parse_status_memory, read_status_memory, StatusMemory};
pub use scanner::{collect_proc_entries, read_cmdline, read_process_name, ProcEntry};
pub use source::{ProcessRecord, ProcessSource, ProcfsSource, TestDataSource};

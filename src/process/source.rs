//! Process sources: where a snapshot of matching processes comes from.
//!
//! `ProcfsSource` reads the live process table, `TestDataSource` replays a
//! JSON snapshot written by `generate-testdata`. Both return raw
//! [`ProcessRecord`]s; labels are applied afterwards.

use crate::commands::generate::load_test_data_from_file;
use crate::error::{ProbeError, Result};
use crate::probe::ProcessSample;
use crate::process::label::LabelRule;
use crate::process::memory::read_status_memory;
use crate::process::scanner::{collect_proc_entries, read_cmdline, read_process_name, ProcEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Raw facts about one process instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cmdline: Vec<String>,
    /// Virtual memory size in bytes.
    pub vm_size: u64,
    /// Swapped-out memory in bytes.
    pub vm_swap: u64,
}

impl ProcessRecord {
    /// First command-line token, or the process name when the command line is empty.
    pub fn command(&self) -> &str {
        self.cmdline.first().map(String::as_str).unwrap_or(&self.name)
    }

    pub fn into_sample(self, rule: &LabelRule) -> ProcessSample {
        ProcessSample {
            pid: self.pid,
            identity: rule.apply(self.command()),
            virtual_memory_bytes: self.vm_size,
            swap_bytes: self.vm_swap,
        }
    }
}

/// Snapshots all processes carrying a given name.
pub trait ProcessSource {
    fn query_processes_by_name(&self, name: &str) -> Result<Vec<ProcessRecord>>;
}

/// Live process table under a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    root: PathBuf,
    max_processes: Option<usize>,
}

impl ProcfsSource {
    pub fn new(root: impl Into<PathBuf>, max_processes: Option<usize>) -> Self {
        Self {
            root: root.into(),
            max_processes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_record(&self, entry: &ProcEntry, name: &str) -> Option<ProcessRecord> {
        // Processes may exit between the directory listing and these reads.
        let cmdline = read_cmdline(&entry.proc_path).unwrap_or_default();
        let proc_name = read_process_name(&entry.proc_path, &cmdline)?;
        if proc_name != name {
            return None;
        }

        match read_status_memory(&entry.proc_path) {
            Ok(mem) => Some(ProcessRecord {
                pid: entry.pid,
                name: proc_name,
                cmdline,
                vm_size: mem.vm_size,
                vm_swap: mem.vm_swap,
            }),
            Err(e) => {
                debug!("Skipping PID {}: cannot read status: {}", entry.pid, e);
                None
            }
        }
    }
}

impl ProcessSource for ProcfsSource {
    fn query_processes_by_name(&self, name: &str) -> Result<Vec<ProcessRecord>> {
        let entries = collect_proc_entries(&self.root, self.max_processes).map_err(|source| {
            ProbeError::ProcRootUnavailable {
                path: self.root.clone(),
                source,
            }
        })?;
        debug!(
            "Scanning {} process entries under {}",
            entries.len(),
            self.root.display()
        );

        let records: Vec<ProcessRecord> = entries
            .iter()
            .filter_map(|entry| self.read_record(entry, name))
            .collect();

        for r in &records {
            debug!(
                "Matched PID {} ({}): vms={} swap={}",
                r.pid,
                r.command(),
                r.vm_size,
                r.vm_swap
            );
        }

        Ok(records)
    }
}

/// Snapshot replayed from a JSON test data file.
#[derive(Debug, Clone)]
pub struct TestDataSource {
    path: PathBuf,
}

impl TestDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProcessSource for TestDataSource {
    fn query_processes_by_name(&self, name: &str) -> Result<Vec<ProcessRecord>> {
        let test_data = load_test_data_from_file(&self.path)?;
        info!("Loaded {} test processes", test_data.processes.len());

        Ok(test_data
            .processes
            .into_iter()
            .filter(|p| p.name == name)
            .map(ProcessRecord::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_proc(root: &Path, pid: u32, comm: &str, cmdline: &str, vm_kb: u64, swap_kb: u64) {
        let dir = root.join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("comm"), format!("{}\n", comm)).unwrap();
        fs::write(dir.join("cmdline"), cmdline.replace(' ', "\0")).unwrap();
        fs::write(
            dir.join("status"),
            format!(
                "Name:\t{}\nVmSize:\t{} kB\nVmRSS:\t10 kB\nVmSwap:\t{} kB\n",
                comm, vm_kb, swap_kb
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_record_command_falls_back_to_name() {
        let record = ProcessRecord {
            pid: 7,
            name: "thor".to_string(),
            cmdline: vec![],
            vm_size: 0,
            vm_swap: 0,
        };
        assert_eq!(record.command(), "thor");
    }

    #[test]
    fn test_into_sample_applies_label() {
        let record = ProcessRecord {
            pid: 7,
            name: "thor".to_string(),
            cmdline: vec![
                "/clover/prod/tr/thor-alpha/bin/thor".to_string(),
                "-d".to_string(),
            ],
            vm_size: 1024,
            vm_swap: 0,
        };
        let sample = record.into_sample(&LabelRule::default());
        assert_eq!(sample.identity, "alpha");
        assert_eq!(sample.virtual_memory_bytes, 1024);
        assert_eq!(sample.pid, 7);
    }

    #[test]
    fn test_procfs_source_matches_by_name() {
        let root = TempDir::new().unwrap();
        write_proc(root.path(), 20, "thor", "/clover/prod/tr/thor-beta/bin/thor", 2048, 0);
        write_proc(root.path(), 10, "thor", "/clover/prod/tr/thor-alpha/bin/thor", 1024, 4);
        write_proc(root.path(), 15, "nginx", "/usr/sbin/nginx", 512, 0);

        let source = ProcfsSource::new(root.path(), None);
        let records = source.query_processes_by_name("thor").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pid, 10);
        assert_eq!(records[0].vm_size, 1024 * 1024);
        assert_eq!(records[0].vm_swap, 4 * 1024);
        assert_eq!(records[1].pid, 20);
        assert_eq!(records[1].command(), "/clover/prod/tr/thor-beta/bin/thor");
    }

    #[test]
    fn test_procfs_source_skips_unreadable_status() {
        let root = TempDir::new().unwrap();
        write_proc(root.path(), 10, "thor", "/bin/thor", 1024, 0);
        let gone = root.path().join("11");
        fs::create_dir_all(&gone).unwrap();
        fs::write(gone.join("comm"), "thor\n").unwrap();

        let source = ProcfsSource::new(root.path(), None);
        let records = source.query_processes_by_name("thor").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pid, 10);
    }

    #[test]
    fn test_procfs_source_no_match() {
        let root = TempDir::new().unwrap();
        write_proc(root.path(), 10, "nginx", "/usr/sbin/nginx", 1024, 0);

        let source = ProcfsSource::new(root.path(), None);
        assert!(source.query_processes_by_name("thor").unwrap().is_empty());
    }

    #[test]
    fn test_procfs_source_missing_root() {
        let root = TempDir::new().unwrap();
        let source = ProcfsSource::new(root.path().join("missing"), None);
        assert!(matches!(
            source.query_processes_by_name("thor"),
            Err(ProbeError::ProcRootUnavailable { .. })
        ));
    }
}

//! Process scanning utilities for discovering and reading process entries from /proc.
//!
//! This module provides functions to scan the /proc filesystem for process entries
//! and read process names and command lines.

use std::fs;
use std::path::{Path, PathBuf};

/// Length at which the kernel truncates `comm`.
const COMM_MAX_LEN: usize = 15;

/// Process entry representing a directory in /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

/// Scans the proc root for process entries with numeric PIDs, sorted by PID.
pub fn collect_proc_entries(root: &Path, max: Option<usize>) -> std::io::Result<Vec<ProcEntry>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)?.flatten() {
        let p = entry.path();
        let name = match p.file_name().and_then(|s| s.to_str()) {
            Some(v) => v,
            None => continue,
        };
        if !name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let pid: u32 = match name.parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        out.push(ProcEntry { pid, proc_path: p });
    }

    out.sort_by_key(|e| e.pid);
    if let Some(maxp) = max {
        out.truncate(maxp);
    }
    Ok(out)
}

/// Reads the NUL-separated command line of a process.
///
/// Kernel threads and zombies have an empty command line.
pub fn read_cmdline(proc_path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read(proc_path.join("cmdline"))?;
    Ok(content
        .split(|&b| b == 0u8)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect())
}

/// Resolves the process name used for matching.
///
/// `comm` is preferred. When it has been truncated by the kernel and the
/// executable basename from the command line extends it, the basename wins.
pub fn read_process_name(proc_path: &Path, cmdline: &[String]) -> Option<String> {
    let comm = fs::read_to_string(proc_path.join("comm"))
        .ok()
        .map(|s| s.trim_end_matches('\n').to_string())
        .filter(|s| !s.is_empty());

    let exe_name = cmdline
        .first()
        .and_then(|c| Path::new(c).file_name())
        .and_then(|n| n.to_str())
        .map(|s| s.to_string());

    match (comm, exe_name) {
        (Some(comm), Some(exe)) if comm.len() >= COMM_MAX_LEN && exe.starts_with(&comm) => {
            Some(exe)
        }
        (Some(comm), _) => Some(comm),
        (None, exe) => exe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_proc(root: &Path, pid: u32, comm: Option<&str>, cmdline: &[u8]) -> PathBuf {
        let dir = root.join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        if let Some(c) = comm {
            fs::write(dir.join("comm"), format!("{}\n", c)).unwrap();
        }
        fs::write(dir.join("cmdline"), cmdline).unwrap();
        dir
    }

    #[test]
    fn test_collect_proc_entries_numeric_sorted() {
        let root = TempDir::new().unwrap();
        write_proc(root.path(), 300, Some("c"), b"");
        write_proc(root.path(), 12, Some("a"), b"");
        write_proc(root.path(), 45, Some("b"), b"");
        fs::create_dir_all(root.path().join("self")).unwrap();
        fs::write(root.path().join("uptime"), "1.0 2.0").unwrap();

        let entries = collect_proc_entries(root.path(), None).unwrap();
        let pids: Vec<u32> = entries.iter().map(|e| e.pid).collect();
        assert_eq!(pids, vec![12, 45, 300]);
    }

    #[test]
    fn test_collect_proc_entries_max() {
        let root = TempDir::new().unwrap();
        for pid in [5, 3, 9, 1] {
            write_proc(root.path(), pid, Some("x"), b"");
        }
        let entries = collect_proc_entries(root.path(), Some(2)).unwrap();
        let pids: Vec<u32> = entries.iter().map(|e| e.pid).collect();
        assert_eq!(pids, vec![1, 3]);
    }

    #[test]
    fn test_collect_proc_entries_missing_root() {
        let root = TempDir::new().unwrap();
        assert!(collect_proc_entries(&root.path().join("nope"), None).is_err());
    }

    #[test]
    fn test_read_cmdline() {
        let root = TempDir::new().unwrap();
        let dir = write_proc(
            root.path(),
            1,
            Some("thor"),
            b"/clover/prod/tr/thor-alpha/bin/thor\0--config\0/etc/thor.conf\0",
        );
        let cmdline = read_cmdline(&dir).unwrap();
        assert_eq!(
            cmdline,
            vec![
                "/clover/prod/tr/thor-alpha/bin/thor",
                "--config",
                "/etc/thor.conf"
            ]
        );
    }

    #[test]
    fn test_read_cmdline_empty() {
        let root = TempDir::new().unwrap();
        let dir = write_proc(root.path(), 2, Some("kthreadd"), b"");
        assert!(read_cmdline(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_read_process_name_prefers_comm() {
        let root = TempDir::new().unwrap();
        let dir = write_proc(root.path(), 1, Some("thor"), b"/usr/bin/other\0");
        let cmdline = read_cmdline(&dir).unwrap();
        assert_eq!(read_process_name(&dir, &cmdline), Some("thor".to_string()));
    }

    #[test]
    fn test_read_process_name_extends_truncated_comm() {
        let root = TempDir::new().unwrap();
        let dir = write_proc(
            root.path(),
            1,
            Some("very-long-servi"),
            b"/opt/bin/very-long-service-name\0",
        );
        let cmdline = read_cmdline(&dir).unwrap();
        assert_eq!(
            read_process_name(&dir, &cmdline),
            Some("very-long-service-name".to_string())
        );
    }

    #[test]
    fn test_read_process_name_falls_back_to_cmdline() {
        let root = TempDir::new().unwrap();
        let dir = write_proc(root.path(), 1, None, b"/usr/sbin/nginx\0-g\0");
        let cmdline = read_cmdline(&dir).unwrap();
        assert_eq!(read_process_name(&dir, &cmdline), Some("nginx".to_string()));
    }

    #[test]
    fn test_read_process_name_none() {
        let root = TempDir::new().unwrap();
        let dir = write_proc(root.path(), 1, None, b"");
        assert_eq!(read_process_name(&dir, &[]), None);
    }
}

//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};
use crate::error::Result;

/// Generates configuration files.
pub fn command_config(output: Option<PathBuf>, format: &ConfigFormat, commented: bool) -> Result<()> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("herakles-memprobe.yaml"),
    };

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Herakles Memory Probe Configuration
# ===================================
#
# Process Discovery
# -----------------
# proc_root: "/proc"                      # Where procfs is mounted
# max_processes: null                     # Maximum processes to scan (null = all)
#
# Labels
# ------
# label_prefix: "/clover/prod/tr/thor-"   # Stripped from the start of the command
# label_suffix: "/bin/thor"               # Stripped from the end of the command
#
# Logging
# -------
# log_level: "warn"                       # off, error, warn, info, debug, trace (stderr)
#
# Testing
# -------
# test_data_file: null                    # JSON snapshot used instead of /proc
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::TempDir;

    #[test]
    fn test_command_config_writes_loadable_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memprobe.yaml");

        command_config(Some(path.clone()), &ConfigFormat::Yaml, true).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Herakles Memory Probe Configuration"));
        assert_eq!(load_config(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn test_command_config_writes_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memprobe.json");

        command_config(Some(path.clone()), &ConfigFormat::Json, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Config::default());
    }
}

//! Configuration management for herakles-memprobe.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use crate::error::{ProbeError, Result};
use crate::process::{LabelRule, DEFAULT_LABEL_PREFIX, DEFAULT_LABEL_SUFFIX};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const VALID_LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Probe configuration. Every field is optional in files; unset fields fall
/// back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Process discovery
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "max-processes")]
    pub max_processes: Option<usize>,

    // Labels in the summary text
    #[serde(alias = "label-prefix")]
    pub label_prefix: Option<String>,
    #[serde(alias = "label-suffix")]
    pub label_suffix: Option<String>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    /// Path to JSON test data file (uses synthetic data instead of /proc)
    #[serde(alias = "test-data-file")]
    pub test_data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            max_processes: None,
            label_prefix: Some(DEFAULT_LABEL_PREFIX.to_string()),
            label_suffix: Some(DEFAULT_LABEL_SUFFIX.to_string()),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            test_data_file: None,
        }
    }
}

impl Config {
    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn label_rule(&self) -> LabelRule {
        LabelRule::new(
            self.label_prefix.as_deref().unwrap_or(DEFAULT_LABEL_PREFIX),
            self.label_suffix.as_deref().unwrap_or(DEFAULT_LABEL_SUFFIX),
        )
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Validate effective config (used by --check-config and before probing)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    if let Some(level) = cfg.log_level.as_deref() {
        if !VALID_LOG_LEVELS.contains(&level) {
            return Err(ProbeError::Config(format!(
                "Invalid log_level '{}', expected one of: {}",
                level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
    }

    if let Some(root) = &cfg.proc_root {
        if root.as_os_str().is_empty() {
            return Err(ProbeError::Config("proc_root must not be empty".into()));
        }
    }

    if cfg.max_processes == Some(0) {
        return Err(ProbeError::Config(
            "max_processes must be at least 1".into(),
        ));
    }

    if let Some(path) = &cfg.test_data_file {
        if !path.exists() {
            return Err(ProbeError::Config(format!(
                "Test data file not found: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }

    if let Some(level) = &args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }

    // Test data file: CLI wins if provided
    if let Some(test_file) = &args.test_data_file {
        config.test_data_file = Some(test_file.clone());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ProbeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            // Try default locations
            let defaults = [
                "/etc/herakles/memprobe.yaml",
                "/etc/herakles/memprobe.yml",
                "/etc/herakles/memprobe.json",
                "./herakles-memprobe.yaml",
                "./herakles-memprobe.yml",
                "./herakles-memprobe.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config file contents, picking the format from the file extension.
///
/// Keys missing from the file keep their default values.
fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        // Default to YAML
        _ => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Renders configuration in the requested format
pub fn render_config(config: &Config, format: &ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: &ConfigFormat) -> Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

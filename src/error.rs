//! Error types for herakles-memprobe.
//!
//! Every failure is terminal for the invocation. `main` turns these into a
//! single status line and a plugin exit code.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Insufficient arguments supplied.")]
    InsufficientArguments,

    #[error("Invalid arguments supplied: {0}")]
    InvalidArguments(String),

    #[error("Invalid threshold for --{flag}: {value} (must be a positive number of MB)")]
    InvalidThreshold { flag: &'static str, value: i64 },

    #[error("Configuration invalid: {0}")]
    Config(String),

    #[error("Test data error: {0}")]
    TestData(String),

    #[error("Cannot read process table at {path}: {source}")]
    ProcRootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

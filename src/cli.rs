//! CLI arguments and subcommands for herakles-memprobe.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.
//!
//! The three probe flags are optional at the clap level so a missing flag
//! yields the plugin's own "insufficient arguments" status line instead of a
//! clap usage error.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::error::ProbeError;
use crate::probe::CheckOutcome;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-memprobe",
    about = "Nagios plugin that checks for swapping and defined memory limits for a selected process, by name",
    long_about = "Nagios plugin that checks for swapping and defined memory limits for a selected process, by name.\n\n\
                  Every running instance of the named process is classified by its virtual memory size \
                  against the warning and critical thresholds. Any swapped-out memory is reported as \
                  critical. Exactly one status line is printed and the exit code follows the plugin \
                  convention (0 OK, 1 WARNING, 2 CRITICAL).",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("VERGEN_BUILD_TIMESTAMP"), ")"),
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Process name to track
    #[arg(short = 'p', long = "proc")]
    pub proc_name: Option<String>,

    /// Warning threshold in MBs
    #[arg(short = 'w', long = "wthres", allow_negative_numbers = true)]
    pub warning_mb: Option<i64>,

    /// Critical threshold in MBs
    #[arg(short = 'c', long = "cthres", allow_negative_numbers = true)]
    pub critical_mb: Option<i64>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Directory where procfs is mounted
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Path to JSON test data file (uses synthetic data instead of /proc)
    #[arg(short = 't', long)]
    pub test_data_file: Option<PathBuf>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and system requirements
    Check {
        /// Check memory accessibility
        #[arg(long)]
        memory: bool,

        /// Check /proc filesystem
        #[arg(long)]
        proc: bool,

        /// Check all system requirements
        #[arg(long)]
        all: bool,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Generate synthetic test data JSON file
    GenerateTestdata {
        /// Process name the generated instances carry
        #[arg(short = 'p', long = "proc")]
        proc_name: String,

        /// Output file path
        #[arg(short = 'o', long, default_value = "testdata.json")]
        output: PathBuf,

        /// Number of instances to generate
        #[arg(short = 'n', long, default_value_t = 4)]
        count: usize,

        /// Upper bound for generated virtual memory sizes, in MB
        #[arg(long, default_value_t = 1024)]
        max_vms_mb: u64,

        /// Fraction of instances that report swapped-out memory (0.0 - 1.0)
        #[arg(long, default_value_t = 0.0)]
        swap_ratio: f64,
    },
}

impl Args {
    /// Returns the probe arguments when all three were supplied.
    pub fn probe_arguments(&self) -> Option<(&str, i64, i64)> {
        match (&self.proc_name, self.warning_mb, self.critical_mb) {
            (Some(name), Some(warning), Some(critical)) => Some((name.as_str(), warning, critical)),
            _ => None,
        }
    }
}

/// Maps a clap rejection to the plugin status line.
///
/// Returns `None` for help and version requests, which clap prints itself.
pub fn invalid_arguments_outcome(error: &clap::Error) -> Option<CheckOutcome> {
    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => {
            let rendered = error.to_string();
            let first_line = rendered.lines().next().unwrap_or_default();
            let reason = first_line.strip_prefix("error: ").unwrap_or(first_line);
            Some(CheckOutcome::from_error(&ProbeError::InvalidArguments(
                reason.to_string(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_short_flags() {
        let args = Args::try_parse_from(["herakles-memprobe", "-p", "thor", "-w", "200", "-c", "300"])
            .unwrap();
        assert_eq!(args.probe_arguments(), Some(("thor", 200, 300)));
    }

    #[test]
    fn test_parse_long_flags() {
        let args = Args::try_parse_from([
            "herakles-memprobe",
            "--proc",
            "thor",
            "--wthres",
            "512",
            "--cthres",
            "1024",
        ])
        .unwrap();
        assert_eq!(args.probe_arguments(), Some(("thor", 512, 1024)));
    }

    #[test]
    fn test_missing_threshold_is_not_a_parse_error() {
        let args = Args::try_parse_from(["herakles-memprobe", "-p", "thor", "-w", "200"]).unwrap();
        assert!(args.probe_arguments().is_none());
    }

    #[test]
    fn test_negative_threshold_parses() {
        let args =
            Args::try_parse_from(["herakles-memprobe", "-p", "thor", "-w", "-1", "-c", "300"])
                .unwrap();
        assert_eq!(args.warning_mb, Some(-1));
    }

    #[test]
    fn test_non_numeric_threshold_is_rejected() {
        let result =
            Args::try_parse_from(["herakles-memprobe", "-p", "thor", "-w", "lots", "-c", "300"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_threshold_status_line() {
        let err =
            Args::try_parse_from(["herakles-memprobe", "-p", "thor", "-w", "abc", "-c", "300"])
                .unwrap_err();
        let outcome = invalid_arguments_outcome(&err).expect("status line for bad value");

        assert!(outcome
            .message
            .starts_with("WARNING - Invalid arguments supplied: invalid value 'abc'"));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_unknown_flag_status_line() {
        let err = Args::try_parse_from(["herakles-memprobe", "--bogus"]).unwrap_err();
        let outcome = invalid_arguments_outcome(&err).unwrap();
        assert!(outcome.message.starts_with("WARNING - Invalid arguments supplied: "));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_help_has_no_status_line() {
        let err = Args::try_parse_from(["herakles-memprobe", "--help"]).unwrap_err();
        assert!(invalid_arguments_outcome(&err).is_none());
    }

    #[test]
    fn test_generate_testdata_subcommand() {
        let args = Args::try_parse_from([
            "herakles-memprobe",
            "generate-testdata",
            "-p",
            "thor",
            "-n",
            "3",
            "--swap-ratio",
            "0.5",
        ])
        .unwrap();
        match args.command {
            Some(Commands::GenerateTestdata {
                proc_name,
                count,
                swap_ratio,
                ..
            }) => {
                assert_eq!(proc_name, "thor");
                assert_eq!(count, 3);
                assert!((swap_ratio - 0.5).abs() < f64::EPSILON);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

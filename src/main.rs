//! herakles-memprobe - version 0.1.0
//!
//! Nagios-compatible memory probe with tracing logging.
//! This is the main entry point that parses arguments, handles subcommands,
//! runs the check and exits with the plugin status code.

use clap::Parser;
use tracing::{debug, Level};

use herakles_memprobe::cli::{invalid_arguments_outcome, Args, Commands};
use herakles_memprobe::commands::{
    command_check, command_config, command_generate_testdata, command_probe, GenerateOptions,
};
use herakles_memprobe::config::{resolve_config, show_config, validate_effective_config, Config};
use herakles_memprobe::{CheckOutcome, ProbeError, Result};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr; stdout carries only the status line.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level() {
        "off" => return,
        "error" => Level::ERROR,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::WARN,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    debug!("Logging initialized with level: {}", config.log_level());
}

/// Helper function to load and validate configuration.
fn load_validated_config(args: &Args) -> Result<Config> {
    let config = resolve_config(args)?;
    validate_effective_config(&config)?;
    Ok(config)
}

/// Parses arguments; anything clap rejects becomes a plugin status line.
fn parse_args() -> std::result::Result<Args, CheckOutcome> {
    Args::try_parse().map_err(|e| match invalid_arguments_outcome(&e) {
        Some(outcome) => outcome,
        None => e.exit(),
    })
}

/// Runs a subcommand. Subcommands report through stdout/stderr, not the
/// plugin status line.
fn run_command(command: &Commands, args: &Args) -> Result<()> {
    let config = load_validated_config(args)?;
    setup_logging(&config);

    match command {
        Commands::Check { memory, proc, all } => command_check(*memory, *proc, *all, &config),

        Commands::Config {
            output,
            format,
            commented,
        } => command_config(output.clone(), format, *commented),

        Commands::GenerateTestdata {
            proc_name,
            output,
            count,
            max_vms_mb,
            swap_ratio,
        } => {
            let options = GenerateOptions {
                output: output.clone(),
                process_name: proc_name.clone(),
                count: *count,
                max_vms_mb: *max_vms_mb,
                swap_ratio: *swap_ratio,
            };
            command_generate_testdata(&options, &config)
        }
    }
}

/// Runs the memory check.
fn run_probe(args: &Args) -> CheckOutcome {
    if args.probe_arguments().is_none() {
        return CheckOutcome::from_error(&ProbeError::InsufficientArguments);
    }

    let config = match load_validated_config(args) {
        Ok(config) => config,
        Err(e) => return CheckOutcome::from_error(&e),
    };
    setup_logging(&config);

    command_probe(args, &config)
}

/// Main application entry point.
fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(outcome) => {
            println!("{}", outcome.message);
            std::process::exit(outcome.exit_code());
        }
    };

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let result = resolve_config(&args).and_then(|config| {
            if args.check_config {
                validate_effective_config(&config)?;
                println!("✅ Configuration is valid");
                Ok(())
            } else {
                show_config(&config, &args.config_format)
            }
        });

        if let Err(e) = result {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        if let Err(e) = run_command(command, &args) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        return;
    }

    let outcome = run_probe(&args);
    println!("{}", outcome.message);
    std::process::exit(outcome.exit_code());
}

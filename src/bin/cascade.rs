//! Cascade CLI Binary
//!
//! Command-line interface for cascading TOML configuration trees.

use cascade::cli::{exit_code, map_error, Cli, RunContext};
use cascade::logging::{init_logging, LoggingConfig};
use clap::Parser;
use std::process;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    debug!("cascade CLI starting");

    let mut context = RunContext::new();
    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.text.is_empty() {
                println!("{}", output.text);
            }
            if output.code != 0 {
                process::exit(output.code);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(exit_code(&e));
        }
    }
}

/// Build logging configuration from CLI flags.
/// Precedence: explicit --log-* flags override --quiet/--verbose override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = LoggingConfig::default();
    if cli.quiet {
        config.level = "off".to_string();
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    config
}

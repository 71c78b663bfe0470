//! CLI command implementations

mod methods;
mod quantize;
mod validate;

use crate::cli::logging::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Quantize(args) => quantize::run_quantize(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Methods(args) => methods::run_methods(args, log_level),
    }
}

//! Validate command implementation
//!
//! Runs the argument validator alone, without constructing a quantizer or
//! touching any model.

use crate::cli::logging::{log, LogLevel};
use crate::config::ValidateArgs;
use crate::registry::MethodRegistry;

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    let registry = MethodRegistry::builtin();
    registry
        .check_consistency()
        .map_err(|e| format!("Registry misconfigured: {e}"))?;

    let arg_map = args.params.to_argument_map();
    registry
        .validate(&args.method, &arg_map)
        .map_err(|e| format!("Invalid arguments: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "{} argument(s) valid for method {}",
            arg_map.len(),
            args.method
        ),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_args, Command};

    fn validate_args_from(argv: &[&str]) -> ValidateArgs {
        let cli = parse_args(argv.iter().copied()).unwrap();
        match cli.command {
            Command::Validate(args) => args,
            other => panic!("expected validate, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_arguments_pass() {
        let args = validate_args_from(&[
            "cuantizar",
            "validate",
            "--method",
            "bnb",
            "--quant-type",
            "4bit",
            "--bnb-4bit-compute-dtype",
            "bfloat16",
        ]);
        assert!(run_validate(args, LogLevel::Quiet).is_ok());
    }

    #[test]
    fn test_wrong_method_key_fails() {
        let args = validate_args_from(&[
            "cuantizar",
            "validate",
            "--method",
            "bnb",
            "--gptq-group-size",
            "128",
        ]);
        let err = run_validate(args, LogLevel::Quiet).unwrap_err();
        assert!(err.contains("gptq_group_size"));
    }
}

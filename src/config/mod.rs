//! CLI configuration types

mod cli;

pub use cli::{
    parse_args, Cli, Command, MethodParams, MethodsArgs, OutputFormat, QuantizeArgs, ValidateArgs,
};

//! Methods command implementation
//!
//! Lists registered methods and their parameter schemas, as text or JSON.

use crate::cli::logging::{log, LogLevel};
use crate::config::{MethodsArgs, OutputFormat};
use crate::registry::MethodRegistry;
use crate::schema::{Constraint, ParameterSchema};
use std::collections::BTreeMap;

fn describe(constraint: &Constraint) -> String {
    match constraint {
        Constraint::Type(tags) => {
            let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
            tags.join(" | ")
        }
        Constraint::Enum(values) => {
            let values: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("one of: {}", values.join(", "))
        }
    }
}

fn print_schema(method: &str, schema: &ParameterSchema, level: LogLevel) {
    log(level, LogLevel::Normal, method);
    for (key, constraint) in schema {
        log(
            level,
            LogLevel::Normal,
            &format!("  {key}: {}", describe(constraint)),
        );
    }
}

pub fn run_methods(args: MethodsArgs, level: LogLevel) -> Result<(), String> {
    let registry = MethodRegistry::builtin();
    registry
        .check_consistency()
        .map_err(|e| format!("Registry misconfigured: {e}"))?;

    let selected: BTreeMap<&str, &ParameterSchema> = match &args.method {
        Some(method) => {
            let schema = registry
                .schema()
                .lookup(method)
                .ok_or_else(|| format!("Unknown quantization method: {method}"))?;
            BTreeMap::from([(method.as_str(), schema)])
        }
        None => registry.schema().iter().collect(),
    };

    match args.format {
        OutputFormat::Text => {
            for (method, schema) in selected {
                print_schema(method, schema, level);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&selected)
                .map_err(|e| format!("Failed to serialize schemas: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

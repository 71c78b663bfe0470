//! Argument validation logic
//!
//! Checks user-supplied arguments against a method's parameter schema
//! before any model loading or quantization work begins.

use super::error::ValidationError;
use crate::args::ArgumentMap;
use crate::schema::{Constraint, SchemaTable};

/// Validate supplied arguments against the schema for `method`.
///
/// Checks, in order:
/// - the method is registered in the schema table
/// - every supplied key is a parameter the method accepts
/// - every supplied value satisfies its parameter's constraint
///
/// Fail-fast: the first violation aborts the whole check. The function is
/// pure; it reads only its inputs and the table.
pub fn validate_args(
    table: &SchemaTable,
    method: &str,
    args: &ArgumentMap,
) -> Result<(), ValidationError> {
    let Some(schema) = table.lookup(method) else {
        return Err(ValidationError::UnknownMethod {
            method: method.to_string(),
            known: table.method_names().map(String::from).collect(),
        });
    };

    // Recognition pass: every supplied key must be a known parameter.
    for (key, _) in args.iter() {
        if !schema.contains_key(key.as_str()) {
            return Err(ValidationError::UnrecognizedParameter {
                method: method.to_string(),
                key: key.clone(),
                valid: schema.keys().map(|k| (*k).to_string()).collect(),
            });
        }
    }

    // Constraint pass: every supplied value must satisfy its constraint.
    for (key, value) in args.iter() {
        match &schema[key.as_str()] {
            Constraint::Type(expected) => {
                if !expected.contains(&value.type_tag()) {
                    return Err(ValidationError::TypeMismatch {
                        key: key.clone(),
                        expected: expected.clone(),
                        actual: value.type_tag(),
                    });
                }
            }
            Constraint::Enum(allowed) => {
                if !allowed.contains(value) {
                    return Err(ValidationError::ValueNotAllowed {
                        key: key.clone(),
                        allowed: allowed.clone(),
                        actual: value.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

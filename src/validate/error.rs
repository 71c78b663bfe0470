//! Validation error types
//!
//! Defines all argument validation error variants. Each variant carries the
//! offending input plus the legal alternatives so the CLI can print an
//! actionable message.

use crate::args::{ArgValue, TypeTag};
use std::fmt::Display;

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Argument validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown quantization method: {method} (known methods: {})", join(.known))]
    UnknownMethod { method: String, known: Vec<String> },

    #[error("parameter {key} is not accepted by method {method} (valid keys: {})", join(.valid))]
    UnrecognizedParameter {
        method: String,
        key: String,
        valid: Vec<String>,
    },

    #[error("parameter {key} must have type {}, got {actual}", join(.expected))]
    TypeMismatch {
        key: String,
        expected: Vec<TypeTag>,
        actual: TypeTag,
    },

    #[error("parameter {key} value {actual} is not allowed (allowed: {})", join(.allowed))]
    ValueNotAllowed {
        key: String,
        allowed: Vec<ArgValue>,
        actual: ArgValue,
    },
}

//! Per-parameter constraints.

use crate::args::{ArgValue, TypeTag};
use serde::Serialize;

/// What a schema entry accepts for one parameter.
///
/// The variant is set explicitly per entry; nothing is inferred from the
/// shape of the allowed set at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
    /// Any value whose runtime type is among the given tags.
    Type(Vec<TypeTag>),
    /// Exactly one of the given literal values.
    Enum(Vec<ArgValue>),
}

impl Constraint {
    /// Whether `value` satisfies this constraint.
    #[must_use]
    pub fn admits(&self, value: &ArgValue) -> bool {
        match self {
            Constraint::Type(tags) => tags.contains(&value.type_tag()),
            Constraint::Enum(allowed) => allowed.contains(value),
        }
    }
}

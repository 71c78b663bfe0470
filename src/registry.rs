//! Method registry
//!
//! Maps each method name to the factory that builds its quantizer. The
//! registry owns the schema table so the two key sets can be checked
//! against each other at startup; the sets drifting apart is a
//! configuration bug, not a runtime condition.

use crate::args::ArgumentMap;
use crate::backend::ProcessEngine;
use crate::quantizer::{AqlmFactory, AwqFactory, BnbFactory, GptqFactory, Quantizer};
use crate::schema::SchemaTable;
use crate::validate::{validate_args, ValidationError};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Builds a quantizer instance for one method.
///
/// Factories only construct: no network, no disk I/O. Everything expensive
/// is deferred to `quantize()`.
pub trait QuantizerFactory: Send + Sync {
    /// Construct an instance from a model identifier and a validated
    /// argument map. Keys beyond what the method consumes are tolerated.
    fn construct(&self, model: &str, args: &ArgumentMap) -> Box<dyn Quantizer>;
}

/// Registry/schema consistency failure.
#[derive(Debug, Error)]
#[error(
    "schema table and registry key sets differ (schema only: {schema_only:?}, registry only: {registry_only:?})"
)]
pub struct RegistryMismatch {
    pub schema_only: Vec<String>,
    pub registry_only: Vec<String>,
}

/// Immutable method name → factory mapping, constructed once at startup
/// and passed to whoever dispatches.
pub struct MethodRegistry {
    schema: SchemaTable,
    factories: BTreeMap<String, Box<dyn QuantizerFactory>>,
}

impl MethodRegistry {
    /// Empty registry over the given schema table; used by tests to wire
    /// synthetic methods.
    #[must_use]
    pub fn new(schema: SchemaTable) -> Self {
        Self {
            schema,
            factories: BTreeMap::new(),
        }
    }

    /// Registry covering the four built-in methods, each backed by its
    /// default external driver.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new(SchemaTable::builtin());
        registry.register(
            "bnb",
            Box::new(BnbFactory::new(Arc::new(ProcessEngine::driver("bnb")))),
        );
        registry.register(
            "gptq",
            Box::new(GptqFactory::new(Arc::new(ProcessEngine::driver("gptq")))),
        );
        registry.register(
            "awq",
            Box::new(AwqFactory::new(Arc::new(ProcessEngine::driver("awq")))),
        );
        // The additive-codebook pipeline ships as a standalone script.
        registry.register(
            "aqlm",
            Box::new(AqlmFactory::new(Arc::new(
                ProcessEngine::new("python").with_args(["main.py"]),
            ))),
        );
        registry
    }

    pub fn register(&mut self, method: impl Into<String>, factory: Box<dyn QuantizerFactory>) {
        self.factories.insert(method.into(), factory);
    }

    #[must_use]
    pub fn schema(&self) -> &SchemaTable {
        &self.schema
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Factory for `method`, or `UnknownMethod` listing what is registered.
    pub fn resolve(&self, method: &str) -> Result<&dyn QuantizerFactory, ValidationError> {
        self.factories
            .get(method)
            .map(|factory| factory.as_ref())
            .ok_or_else(|| ValidationError::UnknownMethod {
                method: method.to_string(),
                known: self.method_names().map(String::from).collect(),
            })
    }

    /// Validate `args` for `method` against the carried schema table.
    pub fn validate(&self, method: &str, args: &ArgumentMap) -> Result<(), ValidationError> {
        validate_args(&self.schema, method, args)
    }

    /// Startup self-check: the schema table and the factory map must cover
    /// exactly the same methods.
    pub fn check_consistency(&self) -> Result<(), RegistryMismatch> {
        let schema_only: Vec<String> = self
            .schema
            .method_names()
            .filter(|m| !self.factories.contains_key(*m))
            .map(String::from)
            .collect();
        let registry_only: Vec<String> = self
            .factories
            .keys()
            .filter(|m| !self.schema.contains(m))
            .cloned()
            .collect();
        if schema_only.is_empty() && registry_only.is_empty() {
            Ok(())
        } else {
            Err(RegistryMismatch {
                schema_only,
                registry_only,
            })
        }
    }
}

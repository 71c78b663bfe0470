//! Cuantizar: uniform front-end over LLM quantization engines
//!
//! One registry, four methods (bitsandbytes, GPTQ, AWQ, AQLM), one
//! lifecycle. Arguments are validated against per-method schemas before
//! any model is touched; a resolved factory then builds a quantizer that
//! is driven through `quantize()` and `save()`.
//!
//! # Example
//!
//! ```
//! use cuantizar::args::ArgumentMap;
//! use cuantizar::registry::MethodRegistry;
//!
//! let registry = MethodRegistry::builtin();
//! registry.check_consistency().unwrap();
//!
//! let args: ArgumentMap = [("quant_type", "4bit")].into_iter().collect();
//! registry.validate("bnb", &args).unwrap();
//!
//! let quantizer = registry.resolve("bnb").unwrap().construct("gpt2", &args);
//! assert!(!quantizer.is_quantized());
//! ```

pub mod args;
pub mod backend;
pub mod cli;
pub mod config;
pub mod io;
pub mod quantizer;
pub mod registry;
pub mod schema;
pub mod validate;

pub use args::{ArgValue, ArgumentMap, TypeTag};
pub use quantizer::{QuantError, Quantizer};
pub use registry::{MethodRegistry, QuantizerFactory};
pub use schema::{Constraint, SchemaTable};
pub use validate::{validate_args, ValidationError};

//! Built-in method schemas.
//!
//! One [`ParameterSchema`] per registered quantization method, describing
//! which configuration keys the method accepts and what each key's value
//! must look like. The table is built once at startup and never mutated;
//! the registry carries it alongside the factories so the two stay in
//! lock-step.

use super::constraint::Constraint;
use crate::args::{ArgValue, TypeTag};
use std::collections::BTreeMap;

/// Accepted keys and their constraints for one method.
pub type ParameterSchema = BTreeMap<&'static str, Constraint>;

/// Immutable method name → parameter schema mapping.
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
    methods: BTreeMap<&'static str, ParameterSchema>,
}

fn typed(tags: &[TypeTag]) -> Constraint {
    Constraint::Type(tags.to_vec())
}

fn one_of(values: &[&str]) -> Constraint {
    Constraint::Enum(values.iter().map(|v| ArgValue::from(*v)).collect())
}

fn boolean() -> Constraint {
    Constraint::Enum(vec![ArgValue::Bool(true), ArgValue::Bool(false)])
}

fn bnb_schema() -> ParameterSchema {
    BTreeMap::from([
        ("model_path", typed(&[TypeTag::Str])),
        ("model_name", typed(&[TypeTag::Str])),
        ("quant_type", one_of(&["4bit", "8bit"])),
        // Only consulted on the 4bit path.
        ("bnb_4bit_compute_dtype", one_of(&["float32", "bfloat16"])),
        ("device_map", one_of(&["auto", "cuda", "cpu"])),
        ("save_tokenizer", boolean()),
        ("save_dir", typed(&[TypeTag::Str])),
        ("bnb_4bit_quant_type", one_of(&["nf4", "fp4"])),
        ("bnb_4bit_use_double_quant", boolean()),
    ])
}

fn gptq_schema() -> ParameterSchema {
    BTreeMap::from([
        ("model_path", typed(&[TypeTag::Str])),
        ("model_name", typed(&[TypeTag::Str])),
        ("quant_type", one_of(&["2bit", "3bit", "4bit"])),
        ("device_map", one_of(&["auto", "cuda", "cpu"])),
        ("save_tokenizer", boolean()),
        ("save_dir", typed(&[TypeTag::Str])),
        // Calibration batch size.
        ("batch_size", typed(&[TypeTag::Int])),
        // Dataset reference or inline samples; no further semantics implied.
        ("calib_dataset", typed(&[TypeTag::Str, TypeTag::StrList])),
        ("gptq_group_size", typed(&[TypeTag::Int])),
    ])
}

fn awq_schema() -> ParameterSchema {
    BTreeMap::from([
        ("model_path", typed(&[TypeTag::Str])),
        ("model_name", typed(&[TypeTag::Str])),
        ("quant_type", one_of(&["2bit", "3bit", "4bit"])),
        ("device_map", one_of(&["auto", "cuda", "cpu"])),
        ("save_tokenizer", boolean()),
        ("save_dir", typed(&[TypeTag::Str])),
        ("group_size", typed(&[TypeTag::Int])),
    ])
}

fn aqlm_schema() -> ParameterSchema {
    BTreeMap::from([
        ("model_path", typed(&[TypeTag::Str])),
        ("model_name", typed(&[TypeTag::Str])),
        ("quant_type", one_of(&["8bit"])),
        ("dataset_path", typed(&[TypeTag::Str])),
        ("nsamples", typed(&[TypeTag::Int])),
        ("val_size", typed(&[TypeTag::Int])),
        ("num_codebooks", typed(&[TypeTag::Int])),
        ("in_group_size", typed(&[TypeTag::Int])),
        ("local_batch_size", typed(&[TypeTag::Int])),
        ("offload_activations", boolean()),
        ("save_dir", typed(&[TypeTag::Str])),
        // The external pipeline only runs on CUDA with eager attention.
        ("device_map", one_of(&["cuda"])),
        ("attn_implementation", one_of(&["eager"])),
        ("save_tokenizer", boolean()),
    ])
}

impl SchemaTable {
    /// Table covering the four built-in methods.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert("bnb", bnb_schema());
        table.insert("gptq", gptq_schema());
        table.insert("awq", awq_schema());
        table.insert("aqlm", aqlm_schema());
        table
    }

    pub fn insert(&mut self, method: &'static str, schema: ParameterSchema) {
        self.methods.insert(method, schema);
    }

    /// Schema for `method`, or `None` if the method is not registered.
    #[must_use]
    pub fn lookup(&self, method: &str) -> Option<&ParameterSchema> {
        self.methods.get(method)
    }

    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParameterSchema)> {
        self.methods.iter().map(|(name, schema)| (*name, schema))
    }
}

//! Integration tests for the validate → resolve → construct → quantize →
//! save pipeline.

use cuantizar::args::{ArgValue, ArgumentMap, TypeTag};
use cuantizar::backend::{
    EngineError, EngineRequest, ModelStore, PersistError, ProcessEngine, QuantEngine,
    QuantizedModel,
};
use cuantizar::quantizer::{AqlmFactory, GptqFactory, Quantizer};
use cuantizar::registry::{MethodRegistry, QuantizerFactory};
use cuantizar::schema::{Constraint, SchemaTable};
use cuantizar::validate::ValidationError;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Engine double: always succeeds with a writer-backed artifact.
struct InMemoryEngine;

struct WeightsFile;

impl ModelStore for WeightsFile {
    fn persist(&self, dir: &Path) -> Result<(), PersistError> {
        std::fs::write(dir.join("model.bin"), b"q").map_err(PersistError::from)
    }
}

impl QuantEngine for InMemoryEngine {
    fn run(&self, request: &EngineRequest) -> Result<QuantizedModel, EngineError> {
        Ok(QuantizedModel::native(request.method(), Box::new(WeightsFile)))
    }
}

fn args<const N: usize>(entries: [(&str, ArgValue); N]) -> ArgumentMap {
    entries.into_iter().collect()
}

#[test]
fn registry_and_schema_cover_the_same_methods() {
    let registry = MethodRegistry::builtin();
    registry.check_consistency().expect("builtin registry must be consistent");

    let from_registry: Vec<&str> = registry.method_names().collect();
    let from_schema: Vec<&str> = registry.schema().method_names().collect();
    assert_eq!(from_registry, from_schema);
}

#[test]
fn bnb_accepts_quant_type_and_compute_dtype() {
    let registry = MethodRegistry::builtin();
    let args = args([
        ("quant_type", ArgValue::from("4bit")),
        ("bnb_4bit_compute_dtype", ArgValue::from("bfloat16")),
    ]);
    assert!(registry.validate("bnb", &args).is_ok());
}

#[test]
fn bnb_rejects_sixteen_bit() {
    let registry = MethodRegistry::builtin();
    let args = args([("quant_type", ArgValue::from("16bit"))]);
    match registry.validate("bnb", &args).unwrap_err() {
        ValidationError::ValueNotAllowed {
            key,
            allowed,
            actual,
        } => {
            assert_eq!(key, "quant_type");
            assert_eq!(allowed, vec![ArgValue::from("4bit"), ArgValue::from("8bit")]);
            assert_eq!(actual, ArgValue::from("16bit"));
        }
        other => panic!("expected ValueNotAllowed, got {other:?}"),
    }
}

#[test]
fn gptq_rejects_stringly_typed_group_size() {
    let registry = MethodRegistry::builtin();
    let args = args([("gptq_group_size", ArgValue::from("128"))]);
    match registry.validate("gptq", &args).unwrap_err() {
        ValidationError::TypeMismatch {
            key,
            expected,
            actual,
        } => {
            assert_eq!(key, "gptq_group_size");
            assert_eq!(expected, vec![TypeTag::Int]);
            assert_eq!(actual, TypeTag::Str);
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn unknown_method_fails_before_anything_else() {
    let registry = MethodRegistry::builtin();
    assert!(matches!(
        registry.validate("unknown_method", &ArgumentMap::new()),
        Err(ValidationError::UnknownMethod { .. })
    ));
    assert!(registry.resolve("unknown_method").is_err());
}

#[test]
fn default_save_dir_is_the_method_name() {
    let registry = MethodRegistry::builtin();
    let quantizer = registry
        .resolve("gptq")
        .unwrap()
        .construct("gpt2", &ArgumentMap::new());
    assert_eq!(quantizer.save_dir(), Path::new("gptq"));
}

#[test]
fn full_lifecycle_with_injected_engine() {
    let tmp = tempfile::tempdir().unwrap();
    let factory = GptqFactory::new(Arc::new(InMemoryEngine));
    let mut quantizer = factory.construct(
        "gpt2",
        &args([
            ("quant_type", ArgValue::from("4bit")),
            ("gptq_group_size", ArgValue::from(64)),
        ]),
    );

    // save() before quantize() violates the state machine
    let err = quantizer.save(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("quantize()"));

    quantizer.quantize().unwrap();
    assert!(quantizer.is_quantized());

    quantizer.save(tmp.path()).unwrap();
    assert!(tmp.path().join("model.bin").exists());

    // save() is repeatable
    quantizer.save(tmp.path()).unwrap();
}

#[test]
fn aqlm_pipeline_runs_an_external_process() {
    // The external pipeline owns the output directory; save() afterwards
    // only confirms the artifact it wrote.
    let out_dir = tempfile::tempdir().unwrap();
    let engine = ProcessEngine::new("sh").with_args(["-c", "exit 0"]);
    let factory = AqlmFactory::new(Arc::new(engine));

    let mut quantizer = factory.construct(
        "facebook/opt-125m",
        &args([(
            "save_dir",
            ArgValue::from(out_dir.path().display().to_string()),
        )]),
    );
    quantizer.quantize().unwrap();
    quantizer.save(out_dir.path()).unwrap();
}

#[test]
fn aqlm_pipeline_failure_surfaces_the_method() {
    let engine = ProcessEngine::new("sh").with_args(["-c", "exit 7"]);
    let factory = AqlmFactory::new(Arc::new(engine));
    let mut quantizer = factory.construct("gpt2", &ArgumentMap::new());
    let err = quantizer.quantize().unwrap_err();
    assert!(err.to_string().contains("aqlm quantization failed"));
}

/// Minimal quantizer/factory pair for a synthetic method, showing the
/// registry works with injected test doubles.
struct EchoQuantizer {
    artifact: Option<QuantizedModel>,
}

impl Quantizer for EchoQuantizer {
    fn method(&self) -> &str {
        "echo"
    }

    fn save_dir(&self) -> &Path {
        Path::new("echo")
    }

    fn is_quantized(&self) -> bool {
        self.artifact.is_some()
    }

    fn quantize(&mut self) -> cuantizar::quantizer::Result<&QuantizedModel> {
        let model = QuantizedModel::native("echo", Box::new(WeightsFile));
        Ok(self.artifact.insert(model))
    }

    fn save(&self, dir: &Path) -> cuantizar::quantizer::Result<()> {
        let model = self.artifact.as_ref().ok_or(cuantizar::QuantError::IllegalState)?;
        model.persist(dir).map_err(cuantizar::QuantError::from)
    }
}

struct EchoFactory;

impl QuantizerFactory for EchoFactory {
    fn construct(&self, _model: &str, _args: &ArgumentMap) -> Box<dyn Quantizer> {
        Box::new(EchoQuantizer { artifact: None })
    }
}

#[test]
fn synthetic_methods_can_be_registered() {
    let mut schema = SchemaTable::builtin();
    schema.insert(
        "echo",
        BTreeMap::from([("level", Constraint::Type(vec![TypeTag::Int]))]),
    );
    let mut registry = MethodRegistry::new(schema);
    registry.register("echo", Box::new(EchoFactory));

    // Only echo has a factory; the four built-in schemas are orphaned.
    let err = registry.check_consistency().unwrap_err();
    assert_eq!(err.schema_only.len(), 4);

    let args = args([("level", ArgValue::from(3))]);
    assert!(registry.validate("echo", &args).is_ok());
    let mut quantizer = registry.resolve("echo").unwrap().construct("m", &args);
    assert_eq!(quantizer.method(), "echo");

    let tmp = tempfile::tempdir().unwrap();
    quantizer.quantize().unwrap();
    quantizer.save(tmp.path()).unwrap();
    assert!(tmp.path().join("model.bin").exists());
}

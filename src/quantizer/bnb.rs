//! bitsandbytes-style quantizer.
//!
//! Load-and-quantize in a single engine call: the 4-bit path forwards the
//! compute dtype, quant flavor, and double-quant switch; the 8-bit path
//! forwards only the bit width.

use super::base::{persist_artifact, CommonConfig, CommonDefaults, Quantizer};
use super::error::{QuantError, Result};
use crate::args::ArgumentMap;
use crate::backend::{
    BnbMode, BnbRequest, DeviceMap, EngineError, EngineRequest, QuantEngine, QuantizedModel,
};
use crate::registry::QuantizerFactory;
use std::path::Path;
use std::sync::Arc;

const METHOD: &str = "bnb";

const DEFAULTS: CommonDefaults = CommonDefaults {
    device_map: DeviceMap::Auto,
    quant_type: "4bit",
};

pub struct BnbQuantizer {
    common: CommonConfig,
    compute_dtype: String,
    quant_flavor: String,
    double_quant: bool,
    engine: Arc<dyn QuantEngine>,
    artifact: Option<QuantizedModel>,
}

impl BnbQuantizer {
    #[must_use]
    pub fn from_args(model: &str, args: &ArgumentMap, engine: Arc<dyn QuantEngine>) -> Self {
        Self {
            common: CommonConfig::resolve(METHOD, model, args, &DEFAULTS),
            compute_dtype: args
                .get_str("bnb_4bit_compute_dtype")
                .unwrap_or("float16")
                .to_string(),
            quant_flavor: args
                .get_str("bnb_4bit_quant_type")
                .unwrap_or("nf4")
                .to_string(),
            double_quant: args.get_bool("bnb_4bit_use_double_quant").unwrap_or(false),
            engine,
            artifact: None,
        }
    }

    fn request(&self) -> Result<EngineRequest> {
        let mode = match self.common.quant_type.as_str() {
            "4bit" => BnbMode::FourBit {
                compute_dtype: self.compute_dtype.clone(),
                quant_flavor: self.quant_flavor.clone(),
                double_quant: self.double_quant,
            },
            "8bit" => BnbMode::EightBit,
            other => {
                return Err(QuantError::Quantization {
                    method: METHOD.to_string(),
                    source: EngineError::Engine(format!("unsupported quant_type: {other}")),
                })
            }
        };
        Ok(EngineRequest::BitsAndBytes(BnbRequest {
            model: self.common.model.clone(),
            device_map: self.common.device_map,
            mode,
            output_dir: self.common.save_dir.clone(),
        }))
    }
}

impl Quantizer for BnbQuantizer {
    fn method(&self) -> &str {
        METHOD
    }

    fn save_dir(&self) -> &Path {
        &self.common.save_dir
    }

    fn is_quantized(&self) -> bool {
        self.artifact.is_some()
    }

    fn quantize(&mut self) -> Result<&QuantizedModel> {
        let request = self.request()?;
        let model = self
            .engine
            .run(&request)
            .map_err(|source| QuantError::Quantization {
                method: METHOD.to_string(),
                source,
            })?;
        Ok(self.artifact.insert(model))
    }

    fn save(&self, dir: &Path) -> Result<()> {
        persist_artifact(self.artifact.as_ref(), dir)
    }
}

/// Factory wiring a [`BnbQuantizer`] to its engine.
pub struct BnbFactory {
    engine: Arc<dyn QuantEngine>,
}

impl BnbFactory {
    #[must_use]
    pub fn new(engine: Arc<dyn QuantEngine>) -> Self {
        Self { engine }
    }
}

impl QuantizerFactory for BnbFactory {
    fn construct(&self, model: &str, args: &ArgumentMap) -> Box<dyn Quantizer> {
        Box::new(BnbQuantizer::from_args(model, args, Arc::clone(&self.engine)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgValue;
    use crate::backend::test_support::StubEngine;

    #[test]
    fn test_defaults() {
        let q = BnbQuantizer::from_args("gpt2", &ArgumentMap::new(), StubEngine::new());
        assert_eq!(q.method(), "bnb");
        assert_eq!(q.save_dir(), Path::new("bnb"));
        assert!(!q.is_quantized());
        assert_eq!(q.compute_dtype, "float16");
        assert_eq!(q.quant_flavor, "nf4");
        assert!(!q.double_quant);
    }

    #[test]
    fn test_four_bit_request_carries_tuning_knobs() {
        let engine = StubEngine::new();
        let args: ArgumentMap = [
            ("quant_type", ArgValue::from("4bit")),
            ("bnb_4bit_compute_dtype", ArgValue::from("bfloat16")),
            ("bnb_4bit_quant_type", ArgValue::from("fp4")),
            ("bnb_4bit_use_double_quant", ArgValue::from(true)),
        ]
        .into_iter()
        .collect();
        let mut q = BnbQuantizer::from_args("gpt2", &args, engine.clone());
        q.quantize().unwrap();

        match engine.last_request() {
            Some(EngineRequest::BitsAndBytes(r)) => {
                assert_eq!(
                    r.mode,
                    BnbMode::FourBit {
                        compute_dtype: "bfloat16".to_string(),
                        quant_flavor: "fp4".to_string(),
                        double_quant: true,
                    }
                );
            }
            other => panic!("expected a bnb request, got {other:?}"),
        }
    }

    #[test]
    fn test_eight_bit_request_forwards_only_the_bit_width() {
        let engine = StubEngine::new();
        let args: ArgumentMap = [("quant_type", ArgValue::from("8bit"))].into_iter().collect();
        let mut q = BnbQuantizer::from_args("gpt2", &args, engine.clone());
        q.quantize().unwrap();

        match engine.last_request() {
            Some(EngineRequest::BitsAndBytes(r)) => assert_eq!(r.mode, BnbMode::EightBit),
            other => panic!("expected a bnb request, got {other:?}"),
        }
    }

    #[test]
    fn test_save_before_quantize_is_illegal() {
        let q = BnbQuantizer::from_args("gpt2", &ArgumentMap::new(), StubEngine::new());
        let err = q.save(Path::new("bnb")).unwrap_err();
        assert!(matches!(err, QuantError::IllegalState));
    }

    #[test]
    fn test_quantize_then_save_writes_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let mut q = BnbQuantizer::from_args("gpt2", &ArgumentMap::new(), StubEngine::new());
        q.quantize().unwrap();
        assert!(q.is_quantized());
        q.save(tmp.path()).unwrap();
        assert!(tmp.path().join("model.bin").exists());
        // save() is repeatable
        q.save(tmp.path()).unwrap();
    }

    #[test]
    fn test_quantize_again_reruns_the_engine() {
        let engine = StubEngine::new();
        let mut q = BnbQuantizer::from_args("gpt2", &ArgumentMap::new(), engine.clone());
        q.quantize().unwrap();
        q.quantize().unwrap();
        assert_eq!(engine.run_count(), 2);
    }

    #[test]
    fn test_engine_failure_is_wrapped_with_method_name() {
        let mut q = BnbQuantizer::from_args(
            "gpt2",
            &ArgumentMap::new(),
            StubEngine::failing("CUDA out of memory"),
        );
        let err = q.quantize().unwrap_err();
        match err {
            QuantError::Quantization { method, source } => {
                assert_eq!(method, "bnb");
                assert!(source.to_string().contains("CUDA out of memory"));
            }
            other => panic!("expected Quantization, got {other:?}"),
        }
        assert!(!q.is_quantized());
    }
}

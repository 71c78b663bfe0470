//! Activation-aware-style quantizer.
//!
//! Forwards the bit width, group size, zero-point switch, and kernel
//! version. Zero-point and version are not schema keys; they are read from
//! the tolerated extra kwargs with library defaults, the way the underlying
//! engine expects them.

use super::base::{parse_bits, persist_artifact, CommonConfig, CommonDefaults, Quantizer};
use super::error::{QuantError, Result};
use crate::args::ArgumentMap;
use crate::backend::{
    AwqRequest, DeviceMap, EngineError, EngineRequest, QuantEngine, QuantizedModel,
};
use crate::registry::QuantizerFactory;
use std::path::Path;
use std::sync::Arc;

const METHOD: &str = "awq";

const DEFAULTS: CommonDefaults = CommonDefaults {
    device_map: DeviceMap::Auto,
    quant_type: "4bit",
};

const DEFAULT_GROUP_SIZE: i64 = 128;
const DEFAULT_VERSION: &str = "GEMM";
const ALLOWED_BITS: [u8; 3] = [2, 3, 4];

pub struct AwqQuantizer {
    common: CommonConfig,
    group_size: i64,
    zero_point: bool,
    version: String,
    engine: Arc<dyn QuantEngine>,
    artifact: Option<QuantizedModel>,
}

impl AwqQuantizer {
    #[must_use]
    pub fn from_args(model: &str, args: &ArgumentMap, engine: Arc<dyn QuantEngine>) -> Self {
        let common = CommonConfig::resolve(METHOD, model, args, &DEFAULTS);
        let zero_point = common.extra.get_bool("zero_point").unwrap_or(true);
        let version = common
            .extra
            .get_str("version")
            .unwrap_or(DEFAULT_VERSION)
            .to_string();
        Self {
            group_size: args.get_int("group_size").unwrap_or(DEFAULT_GROUP_SIZE),
            common,
            zero_point,
            version,
            engine,
            artifact: None,
        }
    }

    fn request(&self) -> Result<EngineRequest> {
        let bits = parse_bits(&self.common.quant_type)
            .filter(|b| ALLOWED_BITS.contains(b))
            .ok_or_else(|| QuantError::Quantization {
                method: METHOD.to_string(),
                source: EngineError::Engine(format!(
                    "only {ALLOWED_BITS:?} bits are supported, got {}",
                    self.common.quant_type
                )),
            })?;
        Ok(EngineRequest::Awq(AwqRequest {
            model: self.common.model.clone(),
            device_map: self.common.device_map,
            bits,
            group_size: self.group_size,
            zero_point: self.zero_point,
            version: self.version.clone(),
            save_tokenizer: self.common.save_tokenizer,
            output_dir: self.common.save_dir.clone(),
        }))
    }
}

impl Quantizer for AwqQuantizer {
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

/// Factory wiring an [`AwqQuantizer`] to its engine.
pub struct AwqFactory {
    engine: Arc<dyn QuantEngine>,
}

impl AwqFactory {
    #[must_use]
    pub fn new(engine: Arc<dyn QuantEngine>) -> Self {
        Self { engine }
    }
}

impl QuantizerFactory for AwqFactory {
    fn construct(&self, model: &str, args: &ArgumentMap) -> Box<dyn Quantizer> {
        Box::new(AwqQuantizer::from_args(model, args, Arc::clone(&self.engine)))
    }
}

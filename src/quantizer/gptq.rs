//! Grouped-GPTQ-style quantizer.
//!
//! Parses the bit width out of the `quant_type` tag and forwards the group
//! size and calibration batch size verbatim. Calibration text comes from a
//! dataset reference, inline samples, or the default corpus.

use super::base::{parse_bits, persist_artifact, CommonConfig, CommonDefaults, Quantizer};
use super::error::{QuantError, Result};
use crate::args::ArgumentMap;
use crate::backend::{
    CalibrationSpec, DeviceMap, EngineError, EngineRequest, GptqRequest, QuantEngine,
    QuantizedModel,
};
use crate::registry::QuantizerFactory;
use std::path::Path;
use std::sync::Arc;

const METHOD: &str = "gptq";

const DEFAULTS: CommonDefaults = CommonDefaults {
    device_map: DeviceMap::Auto,
    quant_type: "4bit",
};

const DEFAULT_GROUP_SIZE: i64 = 128;
const DEFAULT_BATCH_SIZE: i64 = 1;

pub struct GptqQuantizer {
    common: CommonConfig,
    batch_size: i64,
    group_size: i64,
    calibration: CalibrationSpec,
    engine: Arc<dyn QuantEngine>,
    artifact: Option<QuantizedModel>,
}

impl GptqQuantizer {
    #[must_use]
    pub fn from_args(model: &str, args: &ArgumentMap, engine: Arc<dyn QuantEngine>) -> Self {
        Self {
            common: CommonConfig::resolve(METHOD, model, args, &DEFAULTS),
            batch_size: args.get_int("batch_size").unwrap_or(DEFAULT_BATCH_SIZE),
            group_size: args.get_int("gptq_group_size").unwrap_or(DEFAULT_GROUP_SIZE),
            calibration: CalibrationSpec::from_arg(args.get("calib_dataset")),
            engine,
            artifact: None,
        }
    }

    fn request(&self) -> Result<EngineRequest> {
        let bits =
            parse_bits(&self.common.quant_type).ok_or_else(|| QuantError::Quantization {
                method: METHOD.to_string(),
                source: EngineError::Engine(format!(
                    "unsupported quant_type: {}",
                    self.common.quant_type
                )),
            })?;
        Ok(EngineRequest::Gptq(GptqRequest {
            model: self.common.model.clone(),
            bits,
            group_size: self.group_size,
            batch_size: self.batch_size,
            calibration: self.calibration.clone(),
            output_dir: self.common.save_dir.clone(),
        }))
    }
}

impl Quantizer for GptqQuantizer {
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

/// Factory wiring a [`GptqQuantizer`] to its engine.
pub struct GptqFactory {
    engine: Arc<dyn QuantEngine>,
}

impl GptqFactory {
    #[must_use]
    pub fn new(engine: Arc<dyn QuantEngine>) -> Self {
        Self { engine }
    }
}

impl QuantizerFactory for GptqFactory {
    fn construct(&self, model: &str, args: &ArgumentMap) -> Box<dyn Quantizer> {
        Box::new(GptqQuantizer::from_args(model, args, Arc::clone(&self.engine)))
    }
}

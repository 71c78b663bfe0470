//! Additive-codebook-style quantizer.
//!
//! The external pipeline does everything: `quantize()` spawns it with the
//! calibration and codebook parameters, blocks for completion, and records
//! the on-disk artifact it wrote. `save()` is therefore a confirmation of
//! that artifact rather than a new write.

use super::base::{persist_artifact, CommonConfig, CommonDefaults, Quantizer};
use super::error::{QuantError, Result};
use crate::args::ArgumentMap;
use crate::backend::{AqlmRequest, DeviceMap, EngineRequest, QuantEngine, QuantizedModel};
use crate::registry::QuantizerFactory;
use std::path::Path;
use std::sync::Arc;

const METHOD: &str = "aqlm";

const DEFAULTS: CommonDefaults = CommonDefaults {
    device_map: DeviceMap::Cuda,
    quant_type: "8bit",
};

const DEFAULT_NSAMPLES: i64 = 1024;
const DEFAULT_VAL_SIZE: i64 = 128;
const DEFAULT_NUM_CODEBOOKS: i64 = 1;
const DEFAULT_IN_GROUP_SIZE: i64 = 8;
const DEFAULT_LOCAL_BATCH_SIZE: i64 = 1;

pub struct AqlmQuantizer {
    common: CommonConfig,
    nsamples: i64,
    val_size: i64,
    num_codebooks: i64,
    in_group_size: i64,
    local_batch_size: i64,
    offload_activations: bool,
    dataset_path: Option<String>,
    engine: Arc<dyn QuantEngine>,
    artifact: Option<QuantizedModel>,
}

impl AqlmQuantizer {
    #[must_use]
    pub fn from_args(model: &str, args: &ArgumentMap, engine: Arc<dyn QuantEngine>) -> Self {
        Self {
            common: CommonConfig::resolve(METHOD, model, args, &DEFAULTS),
            nsamples: args.get_int("nsamples").unwrap_or(DEFAULT_NSAMPLES),
            val_size: args.get_int("val_size").unwrap_or(DEFAULT_VAL_SIZE),
            num_codebooks: args.get_int("num_codebooks").unwrap_or(DEFAULT_NUM_CODEBOOKS),
            in_group_size: args.get_int("in_group_size").unwrap_or(DEFAULT_IN_GROUP_SIZE),
            local_batch_size: args
                .get_int("local_batch_size")
                .unwrap_or(DEFAULT_LOCAL_BATCH_SIZE),
            offload_activations: args.get_bool("offload_activations").unwrap_or(false),
            dataset_path: args.get_str("dataset_path").map(String::from),
            engine,
            artifact: None,
        }
    }

    fn request(&self) -> EngineRequest {
        EngineRequest::Aqlm(AqlmRequest {
            model: self.common.model.clone(),
            nsamples: self.nsamples,
            val_size: self.val_size,
            num_codebooks: self.num_codebooks,
            in_group_size: self.in_group_size,
            local_batch_size: self.local_batch_size,
            offload_activations: self.offload_activations,
            dataset_path: self.dataset_path.clone(),
            save_dir: self.common.save_dir.clone(),
        })
    }
}

impl Quantizer for AqlmQuantizer {
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
        let model = self
            .engine
            .run(&self.request())
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

/// Factory wiring an [`AqlmQuantizer`] to its engine.
pub struct AqlmFactory {
    engine: Arc<dyn QuantEngine>,
}

impl AqlmFactory {
    #[must_use]
    pub fn new(engine: Arc<dyn QuantEngine>) -> Self {
        Self { engine }
    }
}

impl QuantizerFactory for AqlmFactory {
    fn construct(&self, model: &str, args: &ArgumentMap) -> Box<dyn Quantizer> {
        Box::new(AqlmQuantizer::from_args(model, args, Arc::clone(&self.engine)))
    }
}

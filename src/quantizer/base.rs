//! Quantizer contract and shared construction helpers.
//!
//! Every method variant satisfies [`Quantizer`] and follows the same
//! lifecycle: constructed cold, `quantize()` invokes the engine and stores
//! the resulting artifact, `save()` persists it. Saving before quantizing
//! is an illegal state; quantizing again re-runs the engine.

use super::error::{QuantError, Result};
use crate::args::ArgumentMap;
use crate::backend::{DeviceMap, QuantizedModel};
use std::path::{Path, PathBuf};

/// Polymorphic quantizer instance.
pub trait Quantizer {
    /// Registry name of the method.
    fn method(&self) -> &str;

    /// Directory `save()` targets when the caller does not override it.
    fn save_dir(&self) -> &Path;

    /// Whether a successful `quantize()` has run.
    fn is_quantized(&self) -> bool;

    /// Run the engine and store the resulting artifact. Calling this again
    /// re-invokes the engine and replaces the artifact.
    fn quantize(&mut self) -> Result<&QuantizedModel>;

    /// Persist the artifact into `dir`. Repeatable; fails with
    /// [`QuantError::IllegalState`] if `quantize()` has not succeeded yet.
    fn save(&self, dir: &Path) -> Result<()>;
}

/// Default save directory for a method: its registry name, lower-cased.
/// Callers rely on this naming (`"gptq"` saves to `./gptq`).
#[must_use]
pub fn default_save_dir(method: &str) -> PathBuf {
    PathBuf::from(method.to_ascii_lowercase())
}

/// Parse a bit width out of a `quant_type` tag (`"4bit"` → 4).
#[must_use]
pub(crate) fn parse_bits(quant_type: &str) -> Option<u8> {
    quant_type.strip_suffix("bit")?.parse().ok()
}

/// Shared `save()` body: artifact presence gates the state machine.
pub(crate) fn persist_artifact(artifact: Option<&QuantizedModel>, dir: &Path) -> Result<()> {
    let model = artifact.ok_or(QuantError::IllegalState)?;
    model.persist(dir)?;
    Ok(())
}

/// Per-method defaults applied while resolving [`CommonConfig`].
pub(crate) struct CommonDefaults {
    pub device_map: DeviceMap,
    pub quant_type: &'static str,
}

/// Configuration fields every method shares, resolved from the validated
/// argument map at construction time.
#[derive(Debug, Clone)]
pub struct CommonConfig {
    pub model: String,
    pub device_map: DeviceMap,
    pub quant_type: String,
    pub save_tokenizer: bool,
    pub save_dir: PathBuf,
    /// Supplied arguments retained verbatim; variants read their
    /// method-specific extras from here and engines may forward the rest.
    pub extra: ArgumentMap,
}

impl CommonConfig {
    pub(crate) fn resolve(
        method: &str,
        model: &str,
        args: &ArgumentMap,
        defaults: &CommonDefaults,
    ) -> Self {
        let device_map = args
            .get_str("device_map")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.device_map);
        let save_dir = args
            .get_str("save_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_save_dir(method));
        Self {
            model: model.to_string(),
            device_map,
            quant_type: args
                .get_str("quant_type")
                .unwrap_or(defaults.quant_type)
                .to_string(),
            save_tokenizer: args.get_bool("save_tokenizer").unwrap_or(true),
            save_dir,
            extra: args.clone(),
        }
    }
}

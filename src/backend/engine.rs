//! Quantization engine interface.
//!
//! Each method forwards its resolved parameters to an engine as an
//! [`EngineRequest`]; the engine performs the expensive work and returns a
//! [`QuantizedModel`] handle. Engines are long-running blocking
//! collaborators (library bindings or external processes) and the only
//! component allowed to touch models, networks, or accelerators.

use super::artifact::QuantizedModel;
use super::calibration::CalibrationSpec;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Device placement hint forwarded to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceMap {
    #[default]
    Auto,
    Cuda,
    Cpu,
}

impl FromStr for DeviceMap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(DeviceMap::Auto),
            "cuda" => Ok(DeviceMap::Cuda),
            "cpu" => Ok(DeviceMap::Cpu),
            _ => Err(format!("unknown device map: {s}. Valid: auto, cuda, cpu")),
        }
    }
}

impl fmt::Display for DeviceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceMap::Auto => "auto",
            DeviceMap::Cuda => "cuda",
            DeviceMap::Cpu => "cpu",
        };
        write!(f, "{name}")
    }
}

/// Bit-width mode for the bitsandbytes-style engine.
///
/// The 4-bit path carries its tuning knobs; the 8-bit path forwards only
/// the bit width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BnbMode {
    FourBit {
        compute_dtype: String,
        quant_flavor: String,
        double_quant: bool,
    },
    EightBit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BnbRequest {
    pub model: String,
    pub device_map: DeviceMap,
    pub mode: BnbMode,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GptqRequest {
    pub model: String,
    pub bits: u8,
    pub group_size: i64,
    pub batch_size: i64,
    pub calibration: CalibrationSpec,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AwqRequest {
    pub model: String,
    pub device_map: DeviceMap,
    pub bits: u8,
    pub group_size: i64,
    pub zero_point: bool,
    pub version: String,
    pub save_tokenizer: bool,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AqlmRequest {
    pub model: String,
    pub nsamples: i64,
    pub val_size: i64,
    pub num_codebooks: i64,
    pub in_group_size: i64,
    pub local_batch_size: i64,
    pub offload_activations: bool,
    pub dataset_path: Option<String>,
    pub save_dir: PathBuf,
}

/// A method's resolved parameters, ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineRequest {
    BitsAndBytes(BnbRequest),
    Gptq(GptqRequest),
    Awq(AwqRequest),
    Aqlm(AqlmRequest),
}

impl EngineRequest {
    /// Registry name of the method this request belongs to.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            EngineRequest::BitsAndBytes(_) => "bnb",
            EngineRequest::Gptq(_) => "gptq",
            EngineRequest::Awq(_) => "awq",
            EngineRequest::Aqlm(_) => "aqlm",
        }
    }

    /// Model identifier the request operates on.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            EngineRequest::BitsAndBytes(r) => &r.model,
            EngineRequest::Gptq(r) => &r.model,
            EngineRequest::Awq(r) => &r.model,
            EngineRequest::Aqlm(r) => &r.model,
        }
    }

    /// Directory the engine writes (or stages) its output into.
    #[must_use]
    pub fn output_dir(&self) -> &PathBuf {
        match self {
            EngineRequest::BitsAndBytes(r) => &r.output_dir,
            EngineRequest::Gptq(r) => &r.output_dir,
            EngineRequest::Awq(r) => &r.output_dir,
            EngineRequest::Aqlm(r) => &r.save_dir,
        }
    }
}

/// Engine-level failures, wrapped by the owning quantizer into
/// `QuantError::Quantization` with the method name attached.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{0}")]
    Engine(String),
}

/// External quantization engine.
pub trait QuantEngine: Send + Sync {
    /// Run quantization, blocking until the engine finishes.
    fn run(&self, request: &EngineRequest) -> Result<QuantizedModel, EngineError>;
}

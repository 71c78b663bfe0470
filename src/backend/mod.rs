//! Engine-facing collaborators
//!
//! Everything the quantizers need from the outside world: the engine
//! interface and its request types, quantized-artifact handles with an
//! explicit persistence capability, calibration data resolution, and the
//! shipped process-backed engine.

mod artifact;
mod calibration;
mod engine;
mod process;

#[cfg(test)]
pub(crate) mod test_support;

pub use artifact::{ModelStore, Persistable, PersistError, QuantizedModel};
pub use calibration::{
    CalibrationSpec, DEFAULT_CALIB_DATASET, DEFAULT_CALIB_FILE, DEFAULT_CALIB_SAMPLES,
};
pub use engine::{
    AqlmRequest, AwqRequest, BnbMode, BnbRequest, DeviceMap, EngineError, EngineRequest,
    GptqRequest, QuantEngine,
};
pub use process::ProcessEngine;

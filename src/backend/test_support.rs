//! Engine and store doubles shared by quantizer tests.

use super::artifact::{ModelStore, PersistError, QuantizedModel};
use super::engine::{EngineError, EngineRequest, QuantEngine};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Store double that drops a marker file into the save directory.
pub(crate) struct MarkerStore;

impl ModelStore for MarkerStore {
    fn persist(&self, dir: &Path) -> Result<(), PersistError> {
        std::fs::write(dir.join("model.bin"), b"quantized-weights")?;
        Ok(())
    }
}

/// Engine double that records every request and returns a writer-backed
/// artifact (or a configured failure).
pub(crate) struct StubEngine {
    seen: Mutex<Vec<EngineRequest>>,
    failure: Option<String>,
}

impl StubEngine {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            failure: None,
        })
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        })
    }

    pub(crate) fn last_request(&self) -> Option<EngineRequest> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub(crate) fn run_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl QuantEngine for StubEngine {
    fn run(&self, request: &EngineRequest) -> Result<QuantizedModel, EngineError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.failure {
            Some(message) => Err(EngineError::Engine(message.clone())),
            None => Ok(QuantizedModel::native(
                request.method(),
                Box::new(MarkerStore),
            )),
        }
    }
}

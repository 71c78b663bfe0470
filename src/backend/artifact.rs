//! Quantized model artifacts and their persistence capability.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error while saving: {0}")]
    Io(#[from] std::io::Error),

    #[error("external artifact missing at {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("model writer failed: {0}")]
    Writer(String),
}

/// Writes a model's weights and configuration into a directory.
pub trait ModelStore: Send {
    fn persist(&self, dir: &Path) -> Result<(), PersistError>;
}

/// How a quantized artifact is persisted.
///
/// The variant is fixed when the artifact is produced; `save()` dispatches
/// on it instead of probing the handle for save methods at runtime.
pub enum Persistable {
    /// Hub-style writer (`save_pretrained` shape).
    Pretrained(Box<dyn ModelStore>),
    /// Engine-native writer (third-party `save` shape).
    Native(Box<dyn ModelStore>),
    /// Already written to disk by an external process; persisting only
    /// confirms the artifact exists.
    External(PathBuf),
}

/// Handle to a quantized model, held by the quantizer after a successful
/// `quantize()` call.
pub struct QuantizedModel {
    method: String,
    persistable: Persistable,
}

impl QuantizedModel {
    #[must_use]
    pub fn pretrained(method: impl Into<String>, store: Box<dyn ModelStore>) -> Self {
        Self {
            method: method.into(),
            persistable: Persistable::Pretrained(store),
        }
    }

    #[must_use]
    pub fn native(method: impl Into<String>, store: Box<dyn ModelStore>) -> Self {
        Self {
            method: method.into(),
            persistable: Persistable::Native(store),
        }
    }

    #[must_use]
    pub fn external(method: impl Into<String>, path: PathBuf) -> Self {
        Self {
            method: method.into(),
            persistable: Persistable::External(path),
        }
    }

    /// Method that produced this artifact.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// On-disk location, for artifacts written by an external process.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        match &self.persistable {
            Persistable::External(path) => Some(path),
            _ => None,
        }
    }

    /// Persist the artifact into `dir`.
    ///
    /// Writer-backed artifacts are written out (creating `dir` if needed);
    /// external artifacts only get an existence check since the external
    /// process already wrote them.
    pub fn persist(&self, dir: &Path) -> Result<(), PersistError> {
        match &self.persistable {
            Persistable::Pretrained(store) | Persistable::Native(store) => {
                fs::create_dir_all(dir)?;
                store.persist(dir)
            }
            Persistable::External(path) => {
                if path.exists() {
                    Ok(())
                } else {
                    Err(PersistError::MissingArtifact(path.clone()))
                }
            }
        }
    }
}

impl fmt::Debug for QuantizedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.persistable {
            Persistable::Pretrained(_) => "pretrained".to_string(),
            Persistable::Native(_) => "native".to_string(),
            Persistable::External(path) => format!("external:{}", path.display()),
        };
        f.debug_struct("QuantizedModel")
            .field("method", &self.method)
            .field("persistable", &kind)
            .finish()
    }
}

//! Quantizer lifecycle error types

use crate::backend::{EngineError, PersistError};
use thiserror::Error;

/// Result type for quantizer operations
pub type Result<T> = std::result::Result<T, QuantError>;

/// Errors raised while driving a quantizer through its lifecycle
#[derive(Debug, Error)]
pub enum QuantError {
    /// `save()` was called before a successful `quantize()`.
    #[error("model is not quantized yet; call quantize() before save()")]
    IllegalState,

    /// The underlying model could not be loaded.
    #[error("failed to load model {model}: {reason}")]
    ModelLoad { model: String, reason: String },

    /// The external engine failed; the method name gives the context the
    /// caller needs for an actionable message.
    #[error("{method} quantization failed: {source}")]
    Quantization {
        method: String,
        #[source]
        source: EngineError,
    },

    /// Save-time I/O failure.
    #[error("failed to persist quantized model: {0}")]
    Persistence(#[from] PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantization_error_names_the_method() {
        let err = QuantError::Quantization {
            method: "gptq".to_string(),
            source: EngineError::Engine("out of memory".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("gptq"));
        assert!(msg.contains("quantization failed"));
    }

    #[test]
    fn test_model_load_error_display() {
        let err = QuantError::ModelLoad {
            model: "gpt2".to_string(),
            reason: "no such repository".to_string(),
        };
        assert!(err.to_string().contains("gpt2"));
    }

    #[test]
    fn test_illegal_state_mentions_quantize() {
        assert!(QuantError::IllegalState.to_string().contains("quantize()"));
    }
}

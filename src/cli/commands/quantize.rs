//! Quantize command implementation

use crate::cli::logging::{log, LogLevel};
use crate::config::QuantizeArgs;
use crate::io::TokenizerFiles;
use crate::registry::MethodRegistry;
use std::path::PathBuf;

/// Resolve the directory `save()` targets: the explicit or method-default
/// save dir, made absolute.
fn resolve_save_path(save_dir: &std::path::Path) -> Result<PathBuf, String> {
    std::path::absolute(save_dir)
        .map_err(|e| format!("Failed to resolve save directory {}: {e}", save_dir.display()))
}

/// Copy tokenizer files from a local model directory next to the model.
fn copy_tokenizer(model: &str, save_path: &std::path::Path, level: LogLevel) {
    let model_dir = PathBuf::from(model);
    if !model_dir.is_dir() {
        // Hub names have no local files to copy; the driver handles those.
        return;
    }
    match TokenizerFiles::locate(&model_dir).persist(save_path) {
        Ok(copied) => {
            for name in &copied {
                log(level, LogLevel::Verbose, &format!("  Copied {name}"));
            }
            if !copied.is_empty() {
                log(level, LogLevel::Normal, "Tokenizer files saved alongside the model");
            }
        }
        Err(e) => log(
            level,
            LogLevel::Normal,
            &format!("Warning: tokenizer copy failed: {e}"),
        ),
    }
}

pub fn run_quantize(args: QuantizeArgs, level: LogLevel) -> Result<(), String> {
    let registry = MethodRegistry::builtin();
    registry
        .check_consistency()
        .map_err(|e| format!("Registry misconfigured: {e}"))?;

    let arg_map = args.params.to_argument_map();
    registry
        .validate(&args.method, &arg_map)
        .map_err(|e| format!("Invalid arguments: {e}"))?;

    let model = args.params.resolve_model()?;
    let factory = registry
        .resolve(&args.method)
        .map_err(|e| e.to_string())?;
    let mut quantizer = factory.construct(&model, &arg_map);

    log(
        level,
        LogLevel::Normal,
        &format!("Quantizing {model} with {}", args.method),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Save dir: {}", quantizer.save_dir().display()),
    );

    quantizer.quantize().map_err(|e| e.to_string())?;
    log(
        level,
        LogLevel::Normal,
        &format!("{} quantization complete", args.method),
    );

    let save_path = resolve_save_path(quantizer.save_dir())?;
    quantizer.save(&save_path).map_err(|e| e.to_string())?;
    log(
        level,
        LogLevel::Normal,
        &format!("Quantized model saved to {}", save_path.display()),
    );

    if arg_map.get_bool("save_tokenizer").unwrap_or(false) {
        copy_tokenizer(&model, &save_path, level);
    }

    Ok(())
}

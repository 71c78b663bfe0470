//! Process-backed quantization engine.
//!
//! Drives an external program (typically a Python driver around the actual
//! quantization library), blocks until it exits, and maps failures to
//! [`EngineError`]. The child process writes the quantized artifact to the
//! request's output directory, so the returned handle is an external one
//! and a later `save()` only confirms the artifact.

use super::artifact::QuantizedModel;
use super::calibration::{
    CalibrationSpec, DEFAULT_CALIB_DATASET, DEFAULT_CALIB_FILE, DEFAULT_CALIB_SAMPLES,
};
use super::engine::{BnbMode, EngineError, EngineRequest, QuantEngine};
use std::process::Command;

/// Quantization engine that shells out to an external driver program.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    prefix_args: Vec<String>,
}

impl ProcessEngine {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    /// Arguments placed before the request-derived ones (e.g. a script
    /// path or `-m module`).
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Default driver invocation for a built-in method.
    #[must_use]
    pub fn driver(method: &str) -> Self {
        Self::new("python3").with_args(["-m".to_string(), format!("cuantizar_drivers.{method}")])
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

/// Flatten a request into driver command-line arguments.
fn command_line(request: &EngineRequest) -> Vec<String> {
    let mut args = vec![request.model().to_string()];
    match request {
        EngineRequest::BitsAndBytes(r) => {
            match &r.mode {
                BnbMode::FourBit {
                    compute_dtype,
                    quant_flavor,
                    double_quant,
                } => {
                    args.extend(["--bits".into(), "4".into()]);
                    args.extend(["--compute-dtype".into(), compute_dtype.clone()]);
                    args.extend(["--quant-flavor".into(), quant_flavor.clone()]);
                    if *double_quant {
                        args.push("--double-quant".into());
                    }
                }
                BnbMode::EightBit => args.extend(["--bits".into(), "8".into()]),
            }
            args.extend(["--device-map".into(), r.device_map.to_string()]);
            args.extend(["--output".into(), r.output_dir.display().to_string()]);
        }
        EngineRequest::Gptq(r) => {
            args.extend(["--bits".into(), r.bits.to_string()]);
            args.extend(["--group-size".into(), r.group_size.to_string()]);
            args.extend(["--batch-size".into(), r.batch_size.to_string()]);
            match &r.calibration {
                CalibrationSpec::Default => {
                    args.extend(["--calib-dataset".into(), DEFAULT_CALIB_DATASET.into()]);
                    args.extend(["--calib-file".into(), DEFAULT_CALIB_FILE.into()]);
                    args.extend(["--calib-samples".into(), DEFAULT_CALIB_SAMPLES.to_string()]);
                }
                CalibrationSpec::Dataset(name) => {
                    args.extend(["--calib-dataset".into(), name.clone()]);
                }
                CalibrationSpec::Inline(samples) => {
                    for sample in samples {
                        args.extend(["--calib-text".into(), sample.clone()]);
                    }
                }
            }
            args.extend(["--output".into(), r.output_dir.display().to_string()]);
        }
        EngineRequest::Awq(r) => {
            args.extend(["--bits".into(), r.bits.to_string()]);
            args.extend(["--group-size".into(), r.group_size.to_string()]);
            args.push(if r.zero_point {
                "--zero-point".into()
            } else {
                "--no-zero-point".into()
            });
            args.extend(["--version".into(), r.version.clone()]);
            args.extend(["--device-map".into(), r.device_map.to_string()]);
            if r.save_tokenizer {
                args.push("--save-tokenizer".into());
            }
            args.extend(["--output".into(), r.output_dir.display().to_string()]);
        }
        EngineRequest::Aqlm(r) => {
            args.push(format!("--nsamples={}", r.nsamples));
            args.push(format!("--val_size={}", r.val_size));
            args.push(format!("--num_codebooks={}", r.num_codebooks));
            args.push(format!("--in_group_size={}", r.in_group_size));
            args.push(format!("--local_batch_size={}", r.local_batch_size));
            if let Some(dataset) = &r.dataset_path {
                args.push(format!("--dataset_path={dataset}"));
            }
            args.extend(["--save".into(), r.save_dir.display().to_string()]);
            if r.offload_activations {
                args.push("--offload_activations".into());
            }
        }
    }
    args
}

fn stderr_tail(bytes: &[u8]) -> String {
    const LIMIT: usize = 2000;
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.len() <= LIMIT {
        text.to_string()
    } else {
        let cut = text.len() - LIMIT;
        // Keep the tail; the failure reason is usually last.
        let mut start = cut;
        while !text.is_char_boundary(start) {
            start += 1;
        }
        format!("...{}", &text[start..])
    }
}

impl QuantEngine for ProcessEngine {
    fn run(&self, request: &EngineRequest) -> Result<QuantizedModel, EngineError> {
        let output = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(command_line(request))
            .output()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        Ok(QuantizedModel::external(
            request.method(),
            request.output_dir().clone(),
        ))
    }
}

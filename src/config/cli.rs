//! Core CLI types - Cli, Command, and argument structs

use crate::args::{ArgValue, ArgumentMap};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cuantizar: uniform front-end over LLM quantization engines
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cuantizar")]
#[command(version)]
#[command(about = "Quantize causal LLMs with bitsandbytes, GPTQ, AWQ, or AQLM pipelines")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Quantize a model with the selected method
    Quantize(QuantizeArgs),

    /// Validate method arguments without loading anything
    Validate(ValidateArgs),

    /// List registered methods and their parameter schemas
    Methods(MethodsArgs),
}

/// Arguments for the quantize command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct QuantizeArgs {
    /// Quantization method (bnb, gptq, awq, aqlm)
    #[arg(short, long)]
    pub method: String,

    #[command(flatten)]
    pub params: MethodParams,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Quantization method (bnb, gptq, awq, aqlm)
    #[arg(short, long)]
    pub method: String,

    #[command(flatten)]
    pub params: MethodParams,
}

/// Arguments for the methods command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct MethodsArgs {
    /// Only show this method
    #[arg(value_name = "METHOD")]
    pub method: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Union of the per-method option flags. Unset flags are stripped before
/// validation; the schema decides which of the rest a method accepts.
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct MethodParams {
    /// Hub model name, e.g. gpt2
    #[arg(long)]
    pub model_name: Option<String>,

    /// Local model path
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Target precision tag, e.g. 4bit
    #[arg(long)]
    pub quant_type: Option<String>,

    /// Device placement (auto, cuda, cpu)
    #[arg(long)]
    pub device_map: Option<String>,

    /// Save the tokenizer next to the model (true/false)
    #[arg(long)]
    pub save_tokenizer: Option<bool>,

    /// Output directory (defaults to the method name)
    #[arg(long)]
    pub save_dir: Option<String>,

    /// bnb: compute dtype for the 4bit path
    #[arg(long)]
    pub bnb_4bit_compute_dtype: Option<String>,

    /// bnb: 4bit quantization flavor (nf4, fp4)
    #[arg(long)]
    pub bnb_4bit_quant_type: Option<String>,

    /// bnb: nested quantization for the 4bit path
    #[arg(long)]
    pub bnb_4bit_use_double_quant: Option<bool>,

    /// gptq: calibration batch size
    #[arg(long)]
    pub batch_size: Option<i64>,

    /// gptq: calibration dataset reference, or inline samples when
    /// repeated
    #[arg(long, num_args = 1..)]
    pub calib_dataset: Option<Vec<String>>,

    /// gptq: weights per quantization group
    #[arg(long)]
    pub gptq_group_size: Option<i64>,

    /// awq: weights per quantization group
    #[arg(long)]
    pub group_size: Option<i64>,

    /// aqlm: calibration dataset path
    #[arg(long)]
    pub dataset_path: Option<String>,

    /// aqlm: calibration sample count
    #[arg(long)]
    pub nsamples: Option<i64>,

    /// aqlm: validation set size
    #[arg(long)]
    pub val_size: Option<i64>,

    /// aqlm: number of codebooks
    #[arg(long)]
    pub num_codebooks: Option<i64>,

    /// aqlm: input group size
    #[arg(long)]
    pub in_group_size: Option<i64>,

    /// aqlm: per-device batch size
    #[arg(long)]
    pub local_batch_size: Option<i64>,

    /// aqlm: offload activations to save memory (true/false)
    #[arg(long)]
    pub offload_activations: Option<bool>,
}

impl MethodParams {
    /// Collect the flags that were actually set into an argument map.
    /// A single `--calib-dataset` value is a dataset reference (string);
    /// repeated values are inline samples (list).
    #[must_use]
    pub fn to_argument_map(&self) -> ArgumentMap {
        let mut args = ArgumentMap::new();
        if let Some(v) = &self.model_name {
            args.insert("model_name", v.as_str());
        }
        if let Some(v) = &self.model_path {
            args.insert("model_path", v.display().to_string());
        }
        if let Some(v) = &self.quant_type {
            args.insert("quant_type", v.as_str());
        }
        if let Some(v) = &self.device_map {
            args.insert("device_map", v.as_str());
        }
        if let Some(v) = self.save_tokenizer {
            args.insert("save_tokenizer", v);
        }
        if let Some(v) = &self.save_dir {
            args.insert("save_dir", v.as_str());
        }
        if let Some(v) = &self.bnb_4bit_compute_dtype {
            args.insert("bnb_4bit_compute_dtype", v.as_str());
        }
        if let Some(v) = &self.bnb_4bit_quant_type {
            args.insert("bnb_4bit_quant_type", v.as_str());
        }
        if let Some(v) = self.bnb_4bit_use_double_quant {
            args.insert("bnb_4bit_use_double_quant", v);
        }
        if let Some(v) = self.batch_size {
            args.insert("batch_size", v);
        }
        if let Some(values) = &self.calib_dataset {
            match values.as_slice() {
                [single] => args.insert("calib_dataset", single.as_str()),
                many => args.insert("calib_dataset", ArgValue::List(many.to_vec())),
            }
        }
        if let Some(v) = self.gptq_group_size {
            args.insert("gptq_group_size", v);
        }
        if let Some(v) = self.group_size {
            args.insert("group_size", v);
        }
        if let Some(v) = &self.dataset_path {
            args.insert("dataset_path", v.as_str());
        }
        if let Some(v) = self.nsamples {
            args.insert("nsamples", v);
        }
        if let Some(v) = self.val_size {
            args.insert("val_size", v);
        }
        if let Some(v) = self.num_codebooks {
            args.insert("num_codebooks", v);
        }
        if let Some(v) = self.in_group_size {
            args.insert("in_group_size", v);
        }
        if let Some(v) = self.local_batch_size {
            args.insert("local_batch_size", v);
        }
        if let Some(v) = self.offload_activations {
            args.insert("offload_activations", v);
        }
        args
    }

    /// Resolve the model identifier: an explicit local path wins over a
    /// hub name.
    pub fn resolve_model(&self) -> Result<String, String> {
        if let Some(path) = &self.model_path {
            Ok(path.display().to_string())
        } else if let Some(name) = &self.model_name {
            Ok(name.clone())
        } else {
            Err("provide at least one of --model-name or --model-path".to_string())
        }
    }
}

/// Output format for the methods command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json")),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

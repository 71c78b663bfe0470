//! Cuantizar CLI
//!
//! Single-command quantization entry point for the cuantizar library.
//!
//! # Usage
//!
//! ```bash
//! # Quantize with bitsandbytes
//! cuantizar quantize --method bnb --model-name gpt2 --quant-type 4bit
//!
//! # Quantize with GPTQ and a custom group size
//! cuantizar quantize --method gptq --model-path ./gpt2 --gptq-group-size 64
//!
//! # Check arguments without loading anything
//! cuantizar validate --method bnb --quant-type 4bit
//!
//! # Show method schemas
//! cuantizar methods --format json
//! ```

use clap::Parser;
use cuantizar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

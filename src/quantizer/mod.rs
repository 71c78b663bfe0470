//! Quantizer instances
//!
//! The polymorphic `{quantize, save}` contract and one variant per
//! supported method. Construction is cheap and side-effect free; all
//! expensive work happens in `quantize()`.

mod aqlm;
mod awq;
mod base;
mod bnb;
mod error;
mod gptq;

pub use aqlm::{AqlmFactory, AqlmQuantizer};
pub use awq::{AwqFactory, AwqQuantizer};
pub use base::{default_save_dir, CommonConfig, Quantizer};
pub use bnb::{BnbFactory, BnbQuantizer};
pub use error::{QuantError, Result};
pub use gptq::{GptqFactory, GptqQuantizer};

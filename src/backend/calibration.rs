//! Calibration data resolution.

use crate::args::ArgValue;

/// Default calibration corpus, used when no dataset is supplied.
pub const DEFAULT_CALIB_DATASET: &str = "allenai/c4";

/// Data file within the default corpus.
pub const DEFAULT_CALIB_FILE: &str = "en/c4-train.00001-of-01024.json.gz";

/// Number of samples drawn from the default corpus.
pub const DEFAULT_CALIB_SAMPLES: usize = 1024;

/// Where calibration text comes from.
///
/// A string argument is a dataset reference and a list is inline samples;
/// no further semantics are inferred from either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationSpec {
    /// Fall back to [`DEFAULT_CALIB_DATASET`] with [`DEFAULT_CALIB_SAMPLES`]
    /// samples.
    Default,
    /// A named dataset reference.
    Dataset(String),
    /// Inline text samples supplied directly.
    Inline(Vec<String>),
}

impl CalibrationSpec {
    /// Resolve the spec from an optional `calib_dataset` argument value.
    #[must_use]
    pub fn from_arg(value: Option<&ArgValue>) -> Self {
        match value {
            None => CalibrationSpec::Default,
            Some(ArgValue::Str(name)) => CalibrationSpec::Dataset(name.clone()),
            Some(ArgValue::List(samples)) => CalibrationSpec::Inline(samples.clone()),
            // Non-string shapes never get past validation; treat them as
            // absent rather than guessing.
            Some(_) => CalibrationSpec::Default,
        }
    }
}

//! Tokenizer file copying.
//!
//! Local model directories carry their tokenizer as a handful of
//! well-known files; persisting next to the quantized model means copying
//! whichever of those files exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files that make up a tokenizer in a local model directory.
pub const TOKENIZER_FILES: [&str; 6] = [
    "tokenizer.json",
    "tokenizer.model",
    "tokenizer_config.json",
    "vocab.json",
    "merges.txt",
    "special_tokens_map.json",
];

/// Tokenizer handle backed by the files of a local model directory.
#[derive(Debug, Clone)]
pub struct TokenizerFiles {
    src: PathBuf,
}

impl TokenizerFiles {
    #[must_use]
    pub fn locate(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            src: model_dir.into(),
        }
    }

    /// Copy the tokenizer files that exist into `dir`, returning the names
    /// of the files copied. Absent files are skipped silently.
    pub fn persist(&self, dir: &Path) -> io::Result<Vec<String>> {
        fs::create_dir_all(dir)?;
        let mut copied = Vec::new();
        for name in TOKENIZER_FILES {
            let src_file = self.src.join(name);
            if src_file.exists() {
                fs::copy(&src_file, dir.join(name))?;
                copied.push(name.to_string());
            }
        }
        Ok(copied)
    }
}

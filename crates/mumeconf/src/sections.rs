//! The three config sections and their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the corpus lives and how it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding MIDI files and event logs.
    /// Default: ./data
    #[serde(default = "CorpusConfig::default_dir")]
    pub dir: PathBuf,

    /// Descend into subdirectories.
    #[serde(default)]
    pub recursive: bool,

    /// File-name regex marking harmony-bearing works.
    #[serde(default = "CorpusConfig::default_harmony_pattern")]
    pub harmony_pattern: String,
}

impl CorpusConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from("./data")
    }

    fn default_harmony_pattern() -> String {
        r"^H[0-9]+\.(mid|midi|txt)$".to_string()
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            recursive: false,
            harmony_pattern: Self::default_harmony_pattern(),
        }
    }
}

/// How the pattern tables are filled and sampled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// `anchored` or `all_pairs`.
    #[serde(default = "ModelConfig::default_harmony_pairing")]
    pub harmony_pairing: String,

    /// Detect a key for files without a key signature instead of assuming C.
    #[serde(default)]
    pub infer_missing_key: bool,

    /// Fixed RNG seed for sampling; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ModelConfig {
    fn default_harmony_pairing() -> String {
        "anchored".to_string()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            harmony_pairing: Self::default_harmony_pairing(),
            infer_missing_key: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive.
    /// Default: info
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Lower the filter to debug.
    #[serde(default)]
    pub verbose: bool,

    /// Also write plain log lines here.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            verbose: false,
            file: None,
        }
    }
}

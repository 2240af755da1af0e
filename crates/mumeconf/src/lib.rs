//! Configuration loading for mume.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mumeconf::MumeConfig;
//!
//! let config = MumeConfig::load().expect("Failed to load config");
//! println!("corpus: {}", config.corpus.dir.display());
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/mume/config.toml` (system)
//! 2. `~/.config/mume/config.toml` (user)
//! 3. `./mume.toml` (local override), or the path given with `--config`
//! 4. Environment variables (`MUME_*`, `RUST_LOG`)
//!
//! A file only overrides the keys it sets.
//!
//! # Example Config
//!
//! ```toml
//! [corpus]
//! dir = "~/music/chorales"
//! recursive = true
//! harmony_pattern = '^H[0-9]+\.(mid|midi|txt)$'
//!
//! [model]
//! harmony_pairing = "all_pairs"
//! infer_missing_key = true
//! seed = 42
//!
//! [logging]
//! level = "info"
//! file = "output.txt"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, expand_path, ConfigSources};
pub use sections::{CorpusConfig, LoggingConfig, ModelConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete mume configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MumeConfig {
    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MumeConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/mume/config.toml`
    /// 3. `~/.config/mume/config.toml`
    /// 4. `./mume.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration with `config_path` standing in for `./mume.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = MumeConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::apply_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# mume configuration\n\n");

        output.push_str("[corpus]\n");
        output.push_str(&format!("dir = {}\n", quote(&self.corpus.dir.display().to_string())));
        output.push_str(&format!("recursive = {}\n", self.corpus.recursive));
        output.push_str(&format!(
            "harmony_pattern = {}\n",
            quote(&self.corpus.harmony_pattern)
        ));

        output.push_str("\n[model]\n");
        output.push_str(&format!(
            "harmony_pairing = {}\n",
            quote(&self.model.harmony_pairing)
        ));
        output.push_str(&format!(
            "infer_missing_key = {}\n",
            self.model.infer_missing_key
        ));
        match self.model.seed {
            Some(seed) => output.push_str(&format!("seed = {}\n", seed)),
            None => output.push_str("# seed = 42\n"),
        }

        output.push_str("\n[logging]\n");
        output.push_str(&format!("level = {}\n", quote(&self.logging.level)));
        output.push_str(&format!("verbose = {}\n", self.logging.verbose));
        match &self.logging.file {
            Some(file) => output.push_str(&format!("file = {}\n", quote(&file.display().to_string()))),
            None => output.push_str("# file = \"output.txt\"\n"),
        }

        output
    }
}

/// A TOML string literal, escaped.
fn quote(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

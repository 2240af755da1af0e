//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, MumeConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// System and user files are returned only if they exist. A CLI path
/// replaces `./mume.toml` and is returned unconditionally, so a missing
/// file surfaces as a read error.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/mume/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("mume/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("mume.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Overlay the keys set in the TOML file at `path` onto `config`.
pub fn apply_file(config: &mut MumeConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Overlay the keys set in `contents` onto `config`.
fn apply_toml(config: &mut MumeConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(corpus) = table.get("corpus").and_then(|v| v.as_table()) {
        if let Some(v) = corpus.get("dir").and_then(|v| v.as_str()) {
            config.corpus.dir = expand_path(v);
        }
        if let Some(v) = corpus.get("recursive").and_then(|v| v.as_bool()) {
            config.corpus.recursive = v;
        }
        if let Some(v) = corpus.get("harmony_pattern").and_then(|v| v.as_str()) {
            config.corpus.harmony_pattern = v.to_string();
        }
    }

    if let Some(model) = table.get("model").and_then(|v| v.as_table()) {
        if let Some(v) = model.get("harmony_pairing").and_then(|v| v.as_str()) {
            config.model.harmony_pairing = v.to_string();
        }
        if let Some(v) = model.get("infer_missing_key").and_then(|v| v.as_bool()) {
            config.model.infer_missing_key = v;
        }
        if let Some(v) = model.get("seed").and_then(|v| v.as_integer()) {
            let seed = u64::try_from(v).map_err(|_| ConfigError::Parse {
                path: path.to_path_buf(),
                message: format!("model.seed must be non-negative, got {v}"),
            })?;
            config.model.seed = Some(seed);
        }
    }

    if let Some(logging) = table.get("logging").and_then(|v| v.as_table()) {
        if let Some(v) = logging.get("level").and_then(|v| v.as_str()) {
            config.logging.level = v.to_string();
        }
        if let Some(v) = logging.get("verbose").and_then(|v| v.as_bool()) {
            config.logging.verbose = v;
        }
        if let Some(v) = logging.get("file").and_then(|v| v.as_str()) {
            config.logging.file = Some(expand_path(v));
        }
    }

    Ok(())
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut MumeConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |key| env::var(key).ok());
}

fn apply_overrides_from(
    config: &mut MumeConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("MUME_CORPUS_DIR") {
        config.corpus.dir = expand_path(&v);
        sources.env_overrides.push("MUME_CORPUS_DIR".to_string());
    }
    if let Some(v) = lookup("MUME_HARMONY_PATTERN") {
        config.corpus.harmony_pattern = v;
        sources.env_overrides.push("MUME_HARMONY_PATTERN".to_string());
    }
    if let Some(v) = lookup("MUME_SEED") {
        if let Ok(seed) = v.parse() {
            config.model.seed = Some(seed);
            sources.env_overrides.push("MUME_SEED".to_string());
        }
    }
    if let Some(v) = lookup("MUME_LOG_LEVEL") {
        config.logging.level = v;
        sources.env_overrides.push("MUME_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = lookup("RUST_LOG") {
        config.logging.level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
    if let Some(v) = lookup("MUME_LOG_FILE") {
        config.logging.file = Some(expand_path(&v));
        sources.env_overrides.push("MUME_LOG_FILE".to_string());
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}

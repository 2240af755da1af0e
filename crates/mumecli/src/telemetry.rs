//! Log output: stderr with elapsed-time stamps, optionally appended to a file.

use anyhow::{Context, Result};
use mumeconf::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::uptime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(config: &LoggingConfig) -> Result<()> {
    let directive = if config.verbose {
        "debug"
    } else {
        config.level.as_str()
    };
    let env_filter = EnvFilter::try_new(directive)
        .with_context(|| format!("Invalid log filter '{}'", directive))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(uptime())
        .with_target(false);

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_timer(uptime())
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}

//! mumecli - build and sample mume pattern databases
//!
//! Subcommands:
//! - `mumecli build` - Analyze a corpus and report the pattern tables
//! - `mumecli sample` - Analyze a corpus and draw pitches from it
//! - `mumecli config` - Show the effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mumeconf::MumeConfig;
use std::path::PathBuf;

mod commands;
mod progress;
mod report;
mod telemetry;

#[derive(Parser)]
#[command(name = "mumecli")]
#[command(about = "Pitch-class pattern database over a MIDI corpus")]
#[command(version)]
struct Cli {
    /// Config file, used instead of ./mume.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a corpus and print a summary of every table
    Build {
        /// Corpus directory (overrides config)
        #[arg(short, long)]
        corpus: Option<PathBuf>,

        /// Patterns listed per table
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Write the database as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Analyze a corpus and draw pitch keys from its note distribution
    Sample {
        /// Corpus directory (overrides config)
        #[arg(short, long)]
        corpus: Option<PathBuf>,

        /// Number of draws
        #[arg(short = 'n', long, default_value = "16")]
        count: usize,

        /// RNG seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = MumeConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if cli.verbose {
        config.logging.verbose = true;
    }
    if let Some(path) = cli.log_file {
        config.logging.file = Some(path);
    }

    match cli.command {
        Commands::Build { corpus, top, json } => {
            telemetry::init(&config.logging)?;
            if let Some(dir) = corpus {
                config.corpus.dir = dir;
            }
            commands::build(&config, top, json.as_deref())?;
        }
        Commands::Sample {
            corpus,
            count,
            seed,
        } => {
            telemetry::init(&config.logging)?;
            if let Some(dir) = corpus {
                config.corpus.dir = dir;
            }
            if seed.is_some() {
                config.model.seed = seed;
            }
            commands::sample(&config, count)?;
        }
        Commands::Config => {
            print!("{}", config.to_toml());
        }
    }

    Ok(())
}

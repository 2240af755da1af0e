use crate::progress::BarProgress;
use crate::report;
use anyhow::{bail, Context, Result};
use mume::{CorpusModel, CorpusSession, HarmonyPairing, Progress, SessionOptions, Work};
use mumeconf::MumeConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use score_ingest::{discover, load_entry, HarmonyClassifier, Loaded, ReadOptions};
use std::io::IsTerminal;
use std::path::Path;
use tracing::{error, info, warn};

/// Read the configured corpus and run it through one session.
///
/// Files that fail to read are logged and left out; an error from the
/// pattern database aborts the whole pass.
pub fn analyze(config: &MumeConfig) -> Result<CorpusModel> {
    let classifier = HarmonyClassifier::new(&config.corpus.harmony_pattern)
        .context("Invalid corpus.harmony_pattern")?;
    let pairing: HarmonyPairing = config
        .model
        .harmony_pairing
        .parse()
        .context("Invalid model.harmony_pairing")?;
    let options = ReadOptions {
        infer_missing_key: config.model.infer_missing_key,
    };

    let dir = &config.corpus.dir;
    let entries = discover(dir, config.corpus.recursive, &classifier)
        .with_context(|| format!("Failed to scan corpus {}", dir.display()))?;
    if entries.is_empty() {
        warn!(dir = %dir.display(), "no MIDI files found");
    }
    info!(dir = %dir.display(), files = entries.len(), "reading corpus");

    let progress = BarProgress::new();
    let mut works: Vec<Work> = Vec::new();
    let mut event_logs = Vec::new();
    let mut unreadable = 0;
    for (i, entry) in entries.iter().enumerate() {
        match load_entry(entry, &options) {
            Ok(Loaded::Work(work)) => works.push(work),
            Ok(Loaded::EventLog { name, text }) => event_logs.push((name, text)),
            Err(e) => {
                error!(file = %entry.path.display(), "{}", e);
                unreadable += 1;
            }
        }
        progress.progress("Reading MIDI files", i + 1, entries.len());
    }
    progress.finish();
    if unreadable > 0 {
        warn!(unreadable, "some corpus files were skipped");
    }

    let mut session = CorpusSession::new(SessionOptions { pairing });
    session
        .ingest_corpus(&works, &progress)
        .context("Corpus analysis failed")?;
    progress.finish();

    for (name, text) in &event_logs {
        session
            .ingest_event_log(name, text)
            .with_context(|| format!("Failed to analyze event log {}", name))?;
    }

    Ok(session.finish())
}

pub fn build(config: &MumeConfig, top: usize, json: Option<&Path>) -> Result<()> {
    let model = analyze(config)?;

    let styled = std::io::stdout().is_terminal();
    print!("{}", report::summary(&model, top, styled));

    if let Some(path) = json {
        report::write_snapshot(path, &model)?;
        info!(path = %path.display(), "wrote database snapshot");
    }

    Ok(())
}

pub fn sample(config: &MumeConfig, count: usize) -> Result<()> {
    let model = analyze(config)?;
    if model.sampler.is_empty() {
        bail!(
            "Corpus {} produced no notes to sample",
            config.corpus.dir.display()
        );
    }

    let mut rng = match config.model.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for _ in 0..count {
        if let Some(pitch) = model.sampler.draw_pitch(&mut rng) {
            println!("{}", pitch.key());
        }
    }

    Ok(())
}

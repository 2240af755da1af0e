//! Corpus discovery and conversion of parsed scores into [`mume::Work`]s.

use crate::key::{detect_key, KeySignature};
use crate::midi::{parse_smf, ParsedScore};
use crate::{Error, Result};
use mume::{Observation, Part, PitchClass, Work};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Default file-name pattern for harmony-bearing works ("H12.mid").
pub const DEFAULT_HARMONY_PATTERN: &str = r"^H[0-9]+\.(mid|midi|txt)$";

/// How a corpus file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Midi,
    /// Textual event dump, only mined for harmonies.
    EventLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub harmonic: bool,
}

impl CorpusEntry {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Decides from a file name whether a work is mined for harmonies.
#[derive(Debug, Clone)]
pub struct HarmonyClassifier {
    pattern: Regex,
}

impl HarmonyClassifier {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn is_harmonic(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.pattern.is_match(name))
    }
}

impl Default for HarmonyClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_HARMONY_PATTERN).expect("default harmony pattern is valid")
    }
}

/// Options for turning a MIDI file into a [`Work`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Detect the key from the notes when the file has no key signature,
    /// instead of assuming C major.
    pub infer_missing_key: bool,
}

/// A loaded corpus entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Work(Work),
    EventLog { name: String, text: String },
}

/// List corpus files under `dir`, ordered by path.
///
/// `.mid`/`.midi` files are scores; `.txt` files are event logs and are
/// only kept when the classifier marks them harmonic.
pub fn discover(dir: &Path, recursive: bool, classifier: &HarmonyClassifier) -> Result<Vec<CorpusEntry>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).max_depth(max_depth).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let harmonic = classifier.is_harmonic(&path);

        let kind = match extension.as_deref() {
            Some("mid") | Some("midi") => EntryKind::Midi,
            Some("txt") if harmonic => EntryKind::EventLog,
            _ => {
                debug!(path = %path.display(), "skipping non-score file");
                continue;
            }
        };
        entries.push(CorpusEntry {
            path,
            kind,
            harmonic,
        });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// Read one corpus entry from disk.
pub fn load_entry(entry: &CorpusEntry, options: &ReadOptions) -> Result<Loaded> {
    match entry.kind {
        EntryKind::Midi => read_work(&entry.path, entry.harmonic, options).map(Loaded::Work),
        EntryKind::EventLog => {
            let text = std::fs::read_to_string(&entry.path).map_err(|source| Error::Io {
                path: entry.path.clone(),
                source,
            })?;
            Ok(Loaded::EventLog {
                name: entry.name(),
                text,
            })
        }
    }
}

/// Parse a MIDI file and resolve it into a [`Work`].
pub fn read_work(path: &Path, harmonic: bool, options: &ReadOptions) -> Result<Work> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let score = parse_smf(&bytes).map_err(|e| Error::MidiParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(to_work(&score, name, harmonic, options))
}

/// Resolve every note of `score` against its governing key and meter.
pub fn to_work(score: &ParsedScore, name: String, harmonic: bool, options: &ReadOptions) -> Work {
    let fallback = if score.key_signatures.is_empty() {
        if options.infer_missing_key {
            let notes: Vec<_> = score.all_notes().cloned().collect();
            let detected = detect_key(&notes);
            debug!(work = %name, sharps = detected.sharps, mode = ?detected.mode, "inferred key");
            detected
        } else {
            warn!(work = %name, "no key signature, assuming C major");
            KeySignature::c_major()
        }
    } else {
        // Notes before the first signature read in the first signature's key.
        let mut first = score.key_signatures[0];
        first.tick = 0;
        first
    };

    let parts = score
        .tracks
        .iter()
        .map(|track| {
            let observations = track
                .notes
                .iter()
                .map(|note| {
                    let key = score.key_at(note.onset).unwrap_or(&fallback);
                    let pitch_class = PitchClass::from_midi_relative(note.pitch, key.tonic());
                    Observation {
                        pitch_class,
                        scale_degree: key.scale_degree(pitch_class),
                        tick: note.onset,
                        beat: score.beat_at(note.onset),
                    }
                })
                .collect();
            Part {
                name: track
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Track {}", track.index)),
                observations,
            }
        })
        .collect();

    Work {
        name,
        harmonic,
        parts,
        key_signatures: score.distinct_keys(),
        time_signatures: score.distinct_meters(),
    }
}

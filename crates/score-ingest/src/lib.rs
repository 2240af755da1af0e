//! Score ingestion for the mume pattern database.
//!
//! Finds MIDI files (and legacy textual event logs) in a corpus directory,
//! parses them with `midly`, resolves every note against the key and time
//! signature governing it, and hands the result over as [`mume::Work`]s.

pub mod corpus;
pub mod key;
pub mod midi;

pub use corpus::{
    discover, load_entry, read_work, to_work, CorpusEntry, EntryKind, HarmonyClassifier, Loaded,
    ReadOptions, DEFAULT_HARMONY_PATTERN,
};
pub use key::{detect_key, KeyMode, KeySignature};
pub use midi::{parse_smf, ParsedScore, TimeSignature, TimedNote, Track};

use std::path::PathBuf;

/// Errors from corpus discovery and score parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("MIDI parse error in {path}: {message}")]
    MidiParse { path: PathBuf, message: String },

    #[error("corpus walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid harmony file pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

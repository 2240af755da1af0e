//! Statistical pattern database over melodic pitch-class sequences.
//!
//! A corpus is fed through a [`CorpusSession`]: each part's melody is cut
//! into overlapping windows ("mumes") of one to four notes, and notes that
//! sound together are paired into harmonies. Every window and pair becomes a
//! [`PatternKey`] counted in one of five [`FrequencyTable`]s. Once the corpus
//! is exhausted the session is consumed into a [`CorpusModel`], whose
//! [`WeightedSampler`] reproduces the corpus's single-note distribution.
//!
//! # Example
//!
//! ```
//! use mume::{PatternDatabase, PitchClass, WindowSize};
//!
//! let melody: Vec<_> = [0, 4, 7, 0, 4, 7]
//!     .into_iter()
//!     .map(|p| PitchClass::new(p).map(|pc| pc.key()))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let mut db = PatternDatabase::new();
//! db.accumulate(&melody, WindowSize::Three).unwrap();
//! assert_eq!(db.table(WindowSize::Three.table()).get("000407"), 2);
//! assert_eq!(db.table(WindowSize::Three.table()).total(), 4);
//! ```

pub mod database;
pub mod event_log;
pub mod harmony;
pub mod ngram;
pub mod pitch;
pub mod progress;
pub mod sampler;
pub mod score;
pub mod session;
pub mod sort;
pub mod table;

pub use database::{PatternDatabase, TableKind};
pub use harmony::{group_moments, HarmonyPairing, Moment};
pub use ngram::WindowSize;
pub use pitch::{harmony_keys, PatternKey, PitchClass, PitchKey};
pub use progress::{NoProgress, Progress};
pub use sampler::WeightedSampler;
pub use score::{Observation, Part, Work};
pub use session::{CorpusModel, CorpusSession, SessionOptions, SessionStats, WorkSummary};
pub use sort::{LessOrEqual, PivotStrategy};
pub use table::{FrequencyTable, PatternCount};

/// Errors raised by the pattern database and its accumulators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A sequence is shorter than the window it was asked to fill.
    #[error("incomplete mume: sequence of {len} notes cannot fill a window of {window}")]
    IncompletePattern { len: usize, window: usize },

    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A pitch class outside 0..=11, or text that does not decode to one.
    #[error("malformed observation: {0}")]
    MalformedObservation(String),

    #[error("unknown harmony pairing: {0}")]
    UnknownPairing(String),
}

pub type Result<T> = std::result::Result<T, Error>;

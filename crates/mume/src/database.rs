//! The five frequency tables of one corpus run.

use crate::harmony::{self, HarmonyPairing, Moment};
use crate::ngram::{self, WindowSize};
use crate::pitch::{PatternKey, PitchKey};
use crate::sampler::WeightedSampler;
use crate::table::FrequencyTable;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Identity of one table in a [`PatternDatabase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    OneNote,
    TwoNote,
    ThreeNote,
    FourNote,
    Harmony,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::OneNote,
        TableKind::TwoNote,
        TableKind::ThreeNote,
        TableKind::FourNote,
        TableKind::Harmony,
    ];

    /// Window width feeding this table, `None` for harmonies.
    pub fn window(self) -> Option<WindowSize> {
        match self {
            TableKind::OneNote => Some(WindowSize::One),
            TableKind::TwoNote => Some(WindowSize::Two),
            TableKind::ThreeNote => Some(WindowSize::Three),
            TableKind::FourNote => Some(WindowSize::Four),
            TableKind::Harmony => None,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::OneNote => write!(f, "1-note"),
            TableKind::TwoNote => write!(f, "2-note"),
            TableKind::ThreeNote => write!(f, "3-note"),
            TableKind::FourNote => write!(f, "4-note"),
            TableKind::Harmony => write!(f, "harmony"),
        }
    }
}

impl FromStr for TableKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "one" | "one_note" | "1-note" => Ok(TableKind::OneNote),
            "2" | "two" | "two_note" | "2-note" => Ok(TableKind::TwoNote),
            "3" | "three" | "three_note" | "3-note" => Ok(TableKind::ThreeNote),
            "4" | "four" | "four_note" | "4-note" => Ok(TableKind::FourNote),
            "harmony" | "harmonies" => Ok(TableKind::Harmony),
            _ => Err(Error::UnknownTable(s.to_string())),
        }
    }
}

/// One-, two-, three- and four-note pattern tables plus harmony pairs.
///
/// Owned by a single ingestion run; `&mut self` on every mutator keeps
/// each count/total update exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternDatabase {
    one_note: FrequencyTable,
    two_note: FrequencyTable,
    three_note: FrequencyTable,
    four_note: FrequencyTable,
    harmony: FrequencyTable,
}

impl PatternDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, kind: TableKind) -> &FrequencyTable {
        match kind {
            TableKind::OneNote => &self.one_note,
            TableKind::TwoNote => &self.two_note,
            TableKind::ThreeNote => &self.three_note,
            TableKind::FourNote => &self.four_note,
            TableKind::Harmony => &self.harmony,
        }
    }

    fn table_mut(&mut self, kind: TableKind) -> &mut FrequencyTable {
        match kind {
            TableKind::OneNote => &mut self.one_note,
            TableKind::TwoNote => &mut self.two_note,
            TableKind::ThreeNote => &mut self.three_note,
            TableKind::FourNote => &mut self.four_note,
            TableKind::Harmony => &mut self.harmony,
        }
    }

    pub fn get(&self, kind: TableKind, key: &str) -> u64 {
        self.table(kind).get(key)
    }

    pub fn total(&self, kind: TableKind) -> u64 {
        self.table(kind).total()
    }

    pub fn insert(&mut self, kind: TableKind, key: PatternKey) {
        trace!(table = %kind, key = %key, "insert");
        self.table_mut(kind).insert(key);
    }

    /// Count every window of `window` notes in `sequence`.
    ///
    /// Fails with [`Error::IncompletePattern`] when the sequence is shorter
    /// than the window; the table is untouched in that case.
    pub fn accumulate(&mut self, sequence: &[PitchKey], window: WindowSize) -> Result<()> {
        let keys = ngram::windows(sequence, window)?;
        let table = self.table_mut(window.table());
        for key in keys {
            table.insert(key);
        }
        Ok(())
    }

    /// Feed one part's melody into all four n-gram tables.
    ///
    /// The length check covers the widest window before anything is
    /// written, so a short melody leaves every table as it was.
    pub fn accumulate_all(&mut self, sequence: &[PitchKey]) -> Result<()> {
        let widest = WindowSize::Four.len();
        if sequence.len() < widest {
            return Err(Error::IncompletePattern {
                len: sequence.len(),
                window: widest,
            });
        }
        for window in WindowSize::ALL {
            self.accumulate(sequence, window)?;
        }
        Ok(())
    }

    /// Count co-sounding pairs from each moment; returns keys emitted.
    ///
    /// Moments with fewer than two pitches are skipped.
    pub fn accumulate_harmony<'a>(
        &mut self,
        moments: impl IntoIterator<Item = &'a Moment>,
        pairing: HarmonyPairing,
    ) -> usize {
        let mut emitted = 0;
        for moment in moments {
            for key in harmony::pair_keys(moment, pairing) {
                self.harmony.insert(key);
                emitted += 1;
            }
        }
        emitted
    }

    /// Repetition-expanded sequence over the one-note table.
    pub fn weighted_sampler(&self) -> WeightedSampler {
        WeightedSampler::build(&self.one_note)
    }
}

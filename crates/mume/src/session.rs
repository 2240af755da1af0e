//! One pass over a corpus: works in, finished model out.

use crate::database::{PatternDatabase, TableKind};
use crate::event_log;
use crate::harmony::HarmonyPairing;
use crate::ngram::WindowSize;
use crate::progress::Progress;
use crate::sampler::WeightedSampler;
use crate::score::Work;
use crate::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Knobs for a [`CorpusSession`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub pairing: HarmonyPairing,
}

/// Running counts of what a session has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub works: usize,
    pub parts_analyzed: usize,
    pub parts_skipped: usize,
    pub harmony_moments: usize,
}

/// What a single work contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkSummary {
    pub parts_analyzed: usize,
    pub parts_skipped: usize,
    pub harmony_keys: usize,
}

/// Accumulates a corpus into a [`PatternDatabase`].
///
/// Parts too short for a four-note window are logged and skipped. Any
/// core error aborts the pass; whatever was counted up to that point
/// should be discarded together with the session.
#[derive(Debug, Default)]
pub struct CorpusSession {
    database: PatternDatabase,
    options: SessionOptions,
    stats: SessionStats,
}

impl CorpusSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            database: PatternDatabase::new(),
            options,
            stats: SessionStats::default(),
        }
    }

    pub fn database(&self) -> &PatternDatabase {
        &self.database
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn ingest_work(&mut self, work: &Work) -> Result<WorkSummary> {
        let mut summary = WorkSummary::default();
        self.stats.works += 1;
        debug!(
            work = %work.name,
            parts = work.parts.len(),
            notes = work.note_count(),
            "ingesting work"
        );

        if work.key_signatures > 1 {
            warn!(work = %work.name, count = work.key_signatures, "more than one key signature");
        }
        if work.time_signatures > 1 {
            warn!(work = %work.name, count = work.time_signatures, "more than one time signature");
        }

        for part in &work.parts {
            let (melody, chords) = part.melody();
            if chords > 0 {
                warn!(work = %work.name, part = %part.name, chords, "chords reduced to their first note");
            }

            if melody.len() < WindowSize::Four.len() {
                warn!(
                    work = %work.name,
                    part = %part.name,
                    notes = melody.len(),
                    "unable to analyze mume in part"
                );
                summary.parts_skipped += 1;
                continue;
            }

            self.database.accumulate_all(&melody)?;
            debug!(work = %work.name, part = %part.name, notes = melody.len(), "part analyzed");
            summary.parts_analyzed += 1;
        }

        if work.harmonic {
            let moments = work.moments();
            let harmonic = moments.iter().filter(|m| m.is_harmonic()).count();
            if harmonic == 0 {
                warn!(work = %work.name, "harmony work has no harmonies");
            }
            summary.harmony_keys = self
                .database
                .accumulate_harmony(&moments, self.options.pairing);
            self.stats.harmony_moments += harmonic;
        }

        self.stats.parts_analyzed += summary.parts_analyzed;
        self.stats.parts_skipped += summary.parts_skipped;
        Ok(summary)
    }

    /// Feed a textual event dump through the harmony table.
    pub fn ingest_event_log(&mut self, name: &str, text: &str) -> Result<usize> {
        let moments = event_log::moments_from_event_log(text)?;
        if moments.is_empty() {
            warn!(work = name, "harmony log has no harmonies");
        }
        self.stats.works += 1;
        self.stats.harmony_moments += moments.len();
        Ok(self
            .database
            .accumulate_harmony(&moments, self.options.pairing))
    }

    pub fn ingest_corpus<'a>(
        &mut self,
        works: impl IntoIterator<Item = &'a Work>,
        progress: &dyn Progress,
    ) -> Result<()> {
        let works: Vec<&Work> = works.into_iter().collect();
        let total = works.len();
        for (i, work) in works.into_iter().enumerate() {
            self.ingest_work(work)?;
            progress.progress("Analyzing mumes", i + 1, total);
        }
        Ok(())
    }

    /// Close the pass and derive the sampler from the finished tables.
    pub fn finish(self) -> CorpusModel {
        let sampler = self.database.weighted_sampler();
        info!(
            works = self.stats.works,
            parts = self.stats.parts_analyzed,
            skipped = self.stats.parts_skipped,
            notes = self.database.total(TableKind::OneNote),
            harmonies = self.database.total(TableKind::Harmony),
            "corpus analyzed"
        );
        CorpusModel {
            database: self.database,
            sampler,
            stats: self.stats,
        }
    }
}

/// Read-only result of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusModel {
    pub database: PatternDatabase,
    #[serde(skip)]
    pub sampler: WeightedSampler,
    pub stats: SessionStats,
}

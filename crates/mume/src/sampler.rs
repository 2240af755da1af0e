use crate::pitch::{PatternKey, PitchClass};
use crate::table::FrequencyTable;
use rand::Rng;
use serde::Serialize;

/// Flat sequence where each key appears as often as it was counted.
///
/// A uniform draw over the sequence picks a key with probability
/// proportional to its frequency. Built once from a finished table; the
/// order follows the table's key order, so equal tables give equal
/// sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeightedSampler {
    sequence: Vec<PatternKey>,
}

impl WeightedSampler {
    pub fn build(table: &FrequencyTable) -> Self {
        let mut sequence = Vec::with_capacity(table.total() as usize);
        for (key, count) in table.iter() {
            sequence.extend(std::iter::repeat(key.clone()).take(count as usize));
        }
        Self { sequence }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn keys(&self) -> &[PatternKey] {
        &self.sequence
    }

    /// Uniform draw; `None` when nothing was counted.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&PatternKey> {
        if self.sequence.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.sequence.len());
        self.sequence.get(index)
    }

    /// Draw and decode a single pitch class.
    pub fn draw_pitch<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PitchClass> {
        let key = self.draw(rng)?;
        key.pitch_classes().ok()?.first().copied()
    }
}

//! Parsed scores as handed over by ingestion: works, parts, observations.

use crate::harmony::{group_moments, Moment};
use crate::pitch::{PitchClass, PitchKey};
use serde::{Deserialize, Serialize};

/// One sounded note, already resolved against its key and meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Half-steps above the governing tonic.
    pub pitch_class: PitchClass,
    /// 1-based diatonic degree, `None` for chromatic notes.
    pub scale_degree: Option<u8>,
    /// Absolute onset in source ticks; equal ticks mean simultaneous.
    pub tick: u64,
    /// Beats since the start of the work.
    pub beat: f64,
}

/// A part's observations in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub observations: Vec<Observation>,
}

impl Part {
    /// The part's melodic line as encoded keys.
    ///
    /// Notes sharing an onset are a chord within the part; only the first
    /// is kept. Returns the keys and how many chords were reduced.
    pub fn melody(&self) -> (Vec<PitchKey>, usize) {
        let mut keys = Vec::with_capacity(self.observations.len());
        let mut chords = 0;
        let mut last_tick = None;
        let mut in_chord = false;

        for obs in &self.observations {
            if last_tick == Some(obs.tick) {
                if !in_chord {
                    chords += 1;
                    in_chord = true;
                }
                continue;
            }
            in_chord = false;
            last_tick = Some(obs.tick);
            keys.push(obs.pitch_class.key());
        }
        (keys, chords)
    }
}

/// One score from the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub name: String,
    /// Whether the work is mined for harmonies as well as melodies.
    pub harmonic: bool,
    pub parts: Vec<Part>,
    /// Distinct key signatures found in the source.
    pub key_signatures: usize,
    /// Distinct time signatures found in the source.
    pub time_signatures: usize,
}

impl Work {
    pub fn moments(&self) -> Vec<Moment> {
        group_moments(&self.parts)
    }

    pub fn note_count(&self) -> usize {
        self.parts.iter().map(|p| p.observations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn obs(tick: u64, pc: i64) -> Observation {
        Observation {
            pitch_class: PitchClass::new(pc).unwrap(),
            scale_degree: None,
            tick,
            beat: tick as f64 / 480.0,
        }
    }

    #[test]
    fn melody_keeps_first_note_of_each_chord() {
        let part = Part {
            name: "piano".into(),
            observations: vec![
                obs(0, 0),
                obs(0, 4),
                obs(0, 7),
                obs(480, 2),
                obs(960, 5),
                obs(960, 9),
            ],
        };
        let (keys, chords) = part.melody();
        let codes: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(codes, vec!["00", "02", "05"]);
        assert_eq!(chords, 2);
    }

    #[test]
    fn monophonic_melody_is_untouched() {
        let part = Part {
            name: "flute".into(),
            observations: vec![obs(0, 11), obs(240, 0), obs(480, 11)],
        };
        let (keys, chords) = part.melody();
        assert_eq!(keys.len(), 3);
        assert_eq!(chords, 0);
    }

    #[test]
    fn note_count_includes_chord_tones() {
        let work = Work {
            name: "H2".into(),
            harmonic: true,
            parts: vec![
                Part {
                    name: "upper".into(),
                    observations: vec![obs(0, 7), obs(0, 4), obs(480, 5)],
                },
                Part {
                    name: "lower".into(),
                    observations: vec![obs(0, 0), obs(480, 2)],
                },
            ],
            key_signatures: 1,
            time_signatures: 1,
        };
        assert_eq!(work.note_count(), 5);
    }
}

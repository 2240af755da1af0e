use crate::key::{KeyMode, KeySignature};
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// General MIDI percussion channel (10, zero-based 9).
const PERCUSSION_CHANNEL: u8 = 9;

/// A single MIDI note with absolute tick timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedNote {
    pub track: usize,
    pub channel: u8,
    pub pitch: u8,
    pub onset: u64,
    pub offset: u64,
}

impl TimedNote {
    pub fn duration_ticks(&self) -> u64 {
        self.offset.saturating_sub(self.onset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub tick: u64,
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    pub fn common_time() -> Self {
        Self {
            tick: 0,
            numerator: 4,
            denominator: 4,
        }
    }

    /// Ticks per beat, where the beat is the signature's denominator.
    fn ticks_per_beat(&self, ppq: u16) -> f64 {
        ppq as f64 * 4.0 / self.denominator.max(1) as f64
    }
}

/// One MIDI track that carried pitched notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub index: usize,
    pub name: Option<String>,
    /// Ordered by onset, then pitch.
    pub notes: Vec<TimedNote>,
}

/// A parsed Standard MIDI File reduced to what pattern mining needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedScore {
    pub ppq: u16,
    pub tracks: Vec<Track>,
    /// Sorted by tick, from every track.
    pub key_signatures: Vec<KeySignature>,
    /// Sorted by tick, from every track.
    pub time_signatures: Vec<TimeSignature>,
}

impl ParsedScore {
    /// Key governing `tick`: the last signature at or before it.
    pub fn key_at(&self, tick: u64) -> Option<&KeySignature> {
        self.key_signatures.iter().take_while(|k| k.tick <= tick).last()
    }

    /// Beats elapsed before `tick`, accumulated across meter changes.
    ///
    /// Anything before the first time signature is read as 4/4.
    pub fn beat_at(&self, tick: u64) -> f64 {
        let common = TimeSignature::common_time();
        let mut current = &common;
        let mut beats = 0.0;
        for next in &self.time_signatures {
            if next.tick > tick {
                break;
            }
            beats += (next.tick - current.tick) as f64 / current.ticks_per_beat(self.ppq);
            current = next;
        }
        beats + (tick - current.tick) as f64 / current.ticks_per_beat(self.ppq)
    }

    /// Number of distinct key signatures (by sharps and mode).
    pub fn distinct_keys(&self) -> usize {
        let mut seen: Vec<(i8, KeyMode)> = Vec::new();
        for k in &self.key_signatures {
            if !seen.contains(&(k.sharps, k.mode)) {
                seen.push((k.sharps, k.mode));
            }
        }
        seen.len()
    }

    /// Number of distinct time signatures (by numerator and denominator).
    pub fn distinct_meters(&self) -> usize {
        let mut seen: Vec<(u8, u8)> = Vec::new();
        for t in &self.time_signatures {
            if !seen.contains(&(t.numerator, t.denominator)) {
                seen.push((t.numerator, t.denominator));
            }
        }
        seen.len()
    }

    pub fn all_notes(&self) -> impl Iterator<Item = &TimedNote> {
        self.tracks.iter().flat_map(|t| t.notes.iter())
    }
}

/// Parse SMF bytes, pairing note-on/note-off events per track.
///
/// Percussion notes are dropped; tracks left without notes are omitted.
pub fn parse_smf(bytes: &[u8]) -> Result<ParsedScore, midly::Error> {
    let smf = Smf::parse(bytes)?;

    let ppq = match smf.header.timing {
        midly::Timing::Metrical(ticks) => ticks.as_int(),
        midly::Timing::Timecode(_, _) => 480,
    };

    let mut tracks = Vec::new();
    let mut key_signatures = Vec::new();
    let mut time_signatures = Vec::new();

    for (index, track) in smf.tracks.iter().enumerate() {
        let mut current_tick: u64 = 0;
        let mut name = None;
        let mut notes = Vec::new();
        // Map (channel, pitch) → onset ticks, stacked for overlapping repeats
        let mut pending: HashMap<(u8, u8), Vec<u64>> = HashMap::new();

        for event in track {
            current_tick += event.delta.as_int() as u64;

            match event.kind {
                TrackEventKind::Meta(MetaMessage::TrackName(bytes)) => {
                    name = String::from_utf8(bytes.to_vec()).ok();
                }
                TrackEventKind::Meta(MetaMessage::KeySignature(sharps, minor)) => {
                    key_signatures.push(KeySignature {
                        tick: current_tick,
                        sharps,
                        mode: if minor { KeyMode::Minor } else { KeyMode::Major },
                    });
                }
                TrackEventKind::Meta(MetaMessage::TimeSignature(num, denom_pow, _, _)) => {
                    time_signatures.push(TimeSignature {
                        tick: current_tick,
                        numerator: num,
                        denominator: 1u8 << denom_pow.min(7),
                    });
                }
                TrackEventKind::Midi { channel, message } => {
                    let ch = channel.as_int();
                    if ch == PERCUSSION_CHANNEL {
                        continue;
                    }
                    match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            pending
                                .entry((ch, key.as_int()))
                                .or_default()
                                .push(current_tick);
                        }
                        MidiMessage::NoteOff { key, .. } | MidiMessage::NoteOn { key, .. } => {
                            // vel=0 NoteOn is NoteOff
                            let slot = (ch, key.as_int());
                            if let Some(onset) = pending.get_mut(&slot).and_then(|s| s.pop()) {
                                notes.push(TimedNote {
                                    track: index,
                                    channel: ch,
                                    pitch: slot.1,
                                    onset,
                                    offset: current_tick,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Close any unclosed notes at the track's final tick
        for ((ch, pitch), onsets) in pending {
            for onset in onsets {
                notes.push(TimedNote {
                    track: index,
                    channel: ch,
                    pitch,
                    onset,
                    offset: current_tick,
                });
            }
        }

        if notes.is_empty() {
            continue;
        }
        notes.sort_by(|a, b| a.onset.cmp(&b.onset).then(a.pitch.cmp(&b.pitch)));
        tracks.push(Track { index, name, notes });
    }

    key_signatures.sort_by_key(|k| k.tick);
    key_signatures.dedup_by(|a, b| a.tick == b.tick && a.sharps == b.sharps && a.mode == b.mode);
    time_signatures.sort_by_key(|t| t.tick);
    time_signatures.dedup_by(|a, b| a.tick == b.tick);

    Ok(ParsedScore {
        ppq,
        tracks,
        key_signatures,
        time_signatures,
    })
}

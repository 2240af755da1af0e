//! Harmony moments from textual MIDI event dumps.
//!
//! Older corpora were exported as textual dumps of their MIDI tracks:
//!
//! ```text
//! midi.NoteOnEvent(tick=96, channel=0, data=[67, 80]),
//! midi.NoteOnEvent(tick=0, channel=0, data=[60, 80]),
//! ```
//!
//! Ticks are deltas from the previous event of the same track, so a NoteOn
//! with `tick=0` directly after another sounding NoteOn starts at the same
//! instant. Each such run becomes one [`Moment`]; the harmony table is then
//! fed exactly as for parsed scores. A run only continues across a bare
//! `,` separator; a new `midi.Track(` restarts the clock.

use crate::harmony::Moment;
use crate::pitch::{PitchClass, PitchKey};
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

fn event_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"midi\.(?P<kind>\w+)\(tick=(?P<tick>[0-9]+)(?:, channel=[0-9]+)?, data=\[(?P<data>[^\]]*)\]\)",
        )
        .expect("event pattern is valid")
    })
}

/// Simultaneous-onset runs of two or more notes found in `text`.
pub fn moments_from_event_log(text: &str) -> Result<Vec<Moment>> {
    let mut moments = Vec::new();
    let mut absolute: u64 = 0;
    let mut run: Vec<PitchKey> = Vec::new();
    let mut run_start = 0;
    let mut previous_end = 0;

    for caps in event_pattern().captures_iter(text) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let gap = &text[previous_end..whole.start];
        previous_end = whole.end;

        if gap.contains("midi.Track(") {
            flush(&mut run, run_start, &mut moments);
            absolute = 0;
        }
        let adjacent = gap.trim_start().trim_start_matches(',').trim().is_empty();

        let delta: u64 = caps["tick"]
            .parse()
            .map_err(|_| Error::MalformedObservation(format!("bad tick '{}'", &caps["tick"])))?;
        absolute += delta;

        let sounding = if &caps["kind"] == "NoteOnEvent" {
            parse_note_on(&caps["data"])?
        } else {
            None
        };

        match sounding {
            Some(key) if adjacent && delta == 0 && !run.is_empty() => run.push(key),
            Some(key) => {
                flush(&mut run, run_start, &mut moments);
                run_start = absolute;
                run.push(key);
            }
            None => flush(&mut run, run_start, &mut moments),
        }
    }
    flush(&mut run, run_start, &mut moments);

    Ok(moments)
}

/// Pitch of a NoteOn with non-zero velocity; `None` for a disguised NoteOff.
fn parse_note_on(data: &str) -> Result<Option<PitchKey>> {
    let mut fields = data.split(',').map(str::trim);
    let (Some(note), Some(velocity)) = (fields.next(), fields.next()) else {
        return Err(Error::MalformedObservation(format!(
            "NoteOn data [{data}] lacks note and velocity"
        )));
    };

    let note: u8 = note
        .parse()
        .ok()
        .filter(|n| *n <= 127)
        .ok_or_else(|| Error::MalformedObservation(format!("note number '{note}'")))?;
    let velocity: u8 = velocity
        .parse()
        .map_err(|_| Error::MalformedObservation(format!("velocity '{velocity}'")))?;

    if velocity == 0 {
        return Ok(None);
    }
    Ok(Some(PitchClass::from_midi(note).key()))
}

fn flush(run: &mut Vec<PitchKey>, start: u64, moments: &mut Vec<Moment>) {
    if run.len() >= 2 {
        moments.push(Moment::new(Some(start), std::mem::take(run)));
    } else {
        run.clear();
    }
}

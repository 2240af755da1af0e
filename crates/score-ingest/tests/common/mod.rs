//! Hand-assembled Standard MIDI Files for tests.

#![allow(dead_code)]

use std::path::Path;

/// One MTrk chunk under construction, events at absolute ticks.
#[derive(Default)]
pub struct TrackBuilder {
    events: Vec<(u64, Vec<u8>)>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        let mut event = vec![0xFF, 0x03];
        write_vlq(&mut event, name.len() as u32);
        event.extend_from_slice(name.as_bytes());
        self.events.push((0, event));
        self
    }

    pub fn key_signature(mut self, tick: u64, sharps: i8, minor: bool) -> Self {
        self.events
            .push((tick, vec![0xFF, 0x59, 0x02, sharps as u8, minor as u8]));
        self
    }

    /// `denom_pow` is the power of two of the denominator (2 = quarter).
    pub fn time_signature(mut self, tick: u64, numerator: u8, denom_pow: u8) -> Self {
        self.events
            .push((tick, vec![0xFF, 0x58, 0x04, numerator, denom_pow, 24, 8]));
        self
    }

    pub fn note(mut self, onset: u64, duration: u64, pitch: u8, channel: u8) -> Self {
        self.events
            .push((onset, vec![0x90 | (channel & 0x0F), pitch, 100]));
        self.events
            .push((onset + duration, vec![0x80 | (channel & 0x0F), pitch, 0]));
        self
    }

    /// Arbitrary channel or meta event bytes at `tick`.
    pub fn raw(mut self, tick: u64, bytes: &[u8]) -> Self {
        self.events.push((tick, bytes.to_vec()));
        self
    }

    /// Consecutive notes of `duration` ticks starting at tick 0.
    pub fn melody(self, pitches: &[u8], duration: u64, channel: u8) -> Self {
        pitches
            .iter()
            .enumerate()
            .fold(self, |t, (i, &p)| t.note(i as u64 * duration, duration, p, channel))
    }

    fn build(mut self) -> Vec<u8> {
        // Note-offs before anything else at the same tick
        self.events.sort_by_key(|(tick, data)| {
            let is_off = data.first().is_some_and(|b| b & 0xF0 == 0x80);
            (*tick, !is_off)
        });

        let mut data = Vec::new();
        let mut last_tick = 0u64;
        for (tick, bytes) in self.events {
            write_vlq(&mut data, (tick - last_tick) as u32);
            data.extend_from_slice(&bytes);
            last_tick = tick;
        }
        write_vlq(&mut data, 0);
        data.extend_from_slice(&[0xFF, 0x2F, 0x00]);
        data
    }
}

/// Assemble a format-1 file from tracks.
pub fn smf(ppq: u16, tracks: Vec<TrackBuilder>) -> Vec<u8> {
    let chunks: Vec<Vec<u8>> = tracks.into_iter().map(TrackBuilder::build).collect();

    let mut buf = Vec::new();
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&(chunks.len() as u16).to_be_bytes());
    buf.extend_from_slice(&ppq.to_be_bytes());

    for chunk in chunks {
        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(chunk.len() as u32).to_be_bytes());
        buf.extend_from_slice(&chunk);
    }
    buf
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    std::fs::write(path, bytes).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
}

fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    buf.extend_from_slice(&bytes);
}

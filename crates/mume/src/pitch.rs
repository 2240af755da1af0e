//! Pitch-class encoding: the 2-digit codes that pattern keys are built from.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Semitone offset within an octave, 0..=11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    pub const COUNT: u8 = 12;

    /// Validate an integer pitch class. Values outside 0..=11 are rejected,
    /// never wrapped or clamped.
    pub fn new(value: i64) -> Result<Self> {
        if (0..Self::COUNT as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::MalformedObservation(format!(
                "pitch class {value} is outside 0..=11"
            )))
        }
    }

    /// Octave-independent class of a MIDI note number (C = 0).
    pub fn from_midi(note: u8) -> Self {
        Self(note % Self::COUNT)
    }

    /// Half-steps a MIDI note lies above `tonic`, folded into one octave.
    pub fn from_midi_relative(note: u8, tonic: PitchClass) -> Self {
        let pc = note % Self::COUNT;
        Self((pc + Self::COUNT - tonic.0) % Self::COUNT)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn key(self) -> PitchKey {
        PitchKey(self)
    }
}

impl TryFrom<i64> for PitchClass {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pitch class in its 2-digit zero-padded encoding ("00".."11").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PitchKey(PitchClass);

impl PitchKey {
    /// Decode a 2-digit code back into a key.
    pub fn parse(code: &str) -> Result<Self> {
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedObservation(format!(
                "'{code}' is not a 2-digit pitch code"
            )));
        }
        let value: i64 = code
            .parse()
            .map_err(|_| Error::MalformedObservation(format!("'{code}' is not numeric")))?;
        Ok(Self(PitchClass::new(value)?))
    }

    pub fn pitch_class(self) -> PitchClass {
        self.0
    }
}

impl TryFrom<String> for PitchKey {
    type Error = Error;

    fn try_from(code: String) -> Result<Self> {
        Self::parse(&code)
    }
}

impl From<PitchKey> for String {
    fn from(key: PitchKey) -> String {
        key.to_string()
    }
}

impl fmt::Display for PitchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0 .0)
    }
}

/// Concatenated pitch codes identifying one window or harmony pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternKey(String);

impl PatternKey {
    pub fn from_keys(keys: &[PitchKey]) -> Self {
        let mut code = String::with_capacity(keys.len() * 2);
        for key in keys {
            code.push_str(&key.to_string());
        }
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of pitch codes in the key.
    pub fn width(&self) -> usize {
        self.0.len() / 2
    }

    /// Split the key back into its pitch classes.
    pub fn pitch_classes(&self) -> Result<Vec<PitchClass>> {
        if self.0.len() % 2 != 0 || !self.0.is_ascii() {
            return Err(Error::MalformedObservation(format!(
                "pattern key '{}' is not a run of 2-digit codes",
                self.0
            )));
        }
        (0..self.0.len())
            .step_by(2)
            .map(|i| PitchKey::parse(&self.0[i..i + 2]).map(PitchKey::pitch_class))
            .collect()
    }
}

impl From<PitchKey> for PatternKey {
    fn from(key: PitchKey) -> Self {
        Self(key.to_string())
    }
}

impl Borrow<str> for PatternKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys for a co-sounding pair: both orderings, or one when the pitches match.
pub fn harmony_keys(a: PitchKey, b: PitchKey) -> Vec<PatternKey> {
    if a == b {
        vec![PatternKey::from_keys(&[a, b])]
    } else {
        vec![PatternKey::from_keys(&[a, b]), PatternKey::from_keys(&[b, a])]
    }
}

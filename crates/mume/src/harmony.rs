//! Harmonies: pitch classes sounding at the same instant.

use crate::pitch::{harmony_keys, PatternKey, PitchKey};
use crate::score::Part;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Every pitch observed at one temporal position, across all parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
    /// Tick of the onset, when the source knows it.
    pub position: Option<u64>,
    pub pitches: Vec<PitchKey>,
}

impl Moment {
    pub fn new(position: Option<u64>, pitches: Vec<PitchKey>) -> Self {
        Self { position, pitches }
    }

    /// A moment needs two pitches to say anything about harmony.
    pub fn is_harmonic(&self) -> bool {
        self.pitches.len() >= 2
    }
}

/// Which pitches in a moment get paired with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyPairing {
    /// The first pitch paired with each later one.
    #[default]
    Anchored,
    /// Every unordered pair in the moment.
    AllPairs,
}

impl fmt::Display for HarmonyPairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarmonyPairing::Anchored => write!(f, "anchored"),
            HarmonyPairing::AllPairs => write!(f, "all_pairs"),
        }
    }
}

impl FromStr for HarmonyPairing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "anchored" | "first" => Ok(HarmonyPairing::Anchored),
            "all_pairs" | "all" => Ok(HarmonyPairing::AllPairs),
            _ => Err(Error::UnknownPairing(s.to_string())),
        }
    }
}

/// Harmony keys a moment contributes, both orderings per pair.
pub fn pair_keys(moment: &Moment, pairing: HarmonyPairing) -> Vec<PatternKey> {
    let pitches = &moment.pitches;
    if !moment.is_harmonic() {
        return Vec::new();
    }

    let mut keys = Vec::new();
    match pairing {
        HarmonyPairing::Anchored => {
            let first = pitches[0];
            for &other in &pitches[1..] {
                keys.extend(harmony_keys(first, other));
            }
        }
        HarmonyPairing::AllPairs => {
            for (i, &a) in pitches.iter().enumerate() {
                for &b in &pitches[i + 1..] {
                    keys.extend(harmony_keys(a, b));
                }
            }
        }
    }
    keys
}

/// Group the observations of `parts` by exact onset tick.
///
/// Each observation lands in its moment once, in part order. Moments come
/// back ordered by tick; single-note moments are kept so callers can count
/// them.
pub fn group_moments(parts: &[Part]) -> Vec<Moment> {
    let mut by_tick: BTreeMap<u64, Vec<PitchKey>> = BTreeMap::new();
    for part in parts {
        for obs in &part.observations {
            by_tick.entry(obs.tick).or_default().push(obs.pitch_class.key());
        }
    }
    by_tick
        .into_iter()
        .map(|(tick, pitches)| Moment::new(Some(tick), pitches))
        .collect()
}

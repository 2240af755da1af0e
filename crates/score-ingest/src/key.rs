use crate::midi::TimedNote;
use mume::PitchClass;
use serde::{Deserialize, Serialize};

/// Krumhansl-Kessler major key profile (duration-weighted perception studies).
const MAJOR_PROFILE: [f64; 12] = [6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88];

/// Krumhansl-Kessler minor key profile.
const MINOR_PROFILE: [f64; 12] = [6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17];

/// Half-steps above the tonic of each diatonic degree.
const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_STEPS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    Major,
    Minor,
}

/// A key signature event: sharps (positive) or flats (negative) and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature {
    pub tick: u64,
    pub sharps: i8,
    pub mode: KeyMode,
}

impl KeySignature {
    /// C major, assumed when a score carries no signature.
    pub fn c_major() -> Self {
        Self {
            tick: 0,
            sharps: 0,
            mode: KeyMode::Major,
        }
    }

    /// Key signature whose tonic is `tonic` in `mode`.
    pub fn from_tonic(tonic: PitchClass, mode: KeyMode) -> Self {
        let major_tonic = match mode {
            KeyMode::Major => tonic.value(),
            KeyMode::Minor => (tonic.value() + 3) % 12,
        };
        // Each sharp moves the tonic up a fifth; 7 is its own inverse mod 12.
        let sharps = (major_tonic as i8 * 7).rem_euclid(12);
        let sharps = if sharps > 6 { sharps - 12 } else { sharps };
        Self {
            tick: 0,
            sharps,
            mode,
        }
    }

    pub fn tonic(&self) -> PitchClass {
        let major_tonic = (self.sharps as i32 * 7).rem_euclid(12) as u8;
        let tonic = match self.mode {
            KeyMode::Major => major_tonic,
            KeyMode::Minor => (major_tonic + 9) % 12,
        };
        PitchClass::from_midi(tonic)
    }

    /// 1-based scale degree of a tonic-relative pitch class, if diatonic.
    pub fn scale_degree(&self, relative: PitchClass) -> Option<u8> {
        let steps = match self.mode {
            KeyMode::Major => &MAJOR_STEPS,
            KeyMode::Minor => &MINOR_STEPS,
        };
        steps
            .iter()
            .position(|&s| s == relative.value())
            .map(|i| i as u8 + 1)
    }
}

/// Detect a key with the Krumhansl-Schmuckler algorithm.
///
/// Builds a duration-weighted pitch-class histogram and correlates it
/// against all 24 major/minor key profiles. Falls back to C major when
/// there is nothing to weigh.
pub fn detect_key(notes: &[TimedNote]) -> KeySignature {
    let mut histogram = [0.0_f64; 12];
    for note in notes {
        let pc = (note.pitch % 12) as usize;
        histogram[pc] += note.duration_ticks().max(1) as f64;
    }

    let total: f64 = histogram.iter().sum();
    if total == 0.0 {
        return KeySignature::c_major();
    }
    for h in &mut histogram {
        *h /= total;
    }

    let mut best_root: u8 = 0;
    let mut best_mode = KeyMode::Major;
    let mut best_corr = -1.0_f64;

    for root in 0..12u8 {
        let mut rotated = [0.0; 12];
        for (i, slot) in rotated.iter_mut().enumerate() {
            *slot = histogram[(i + root as usize) % 12];
        }

        let major_corr = pearson(&rotated, &MAJOR_PROFILE);
        if major_corr > best_corr {
            best_corr = major_corr;
            best_root = root;
            best_mode = KeyMode::Major;
        }

        let minor_corr = pearson(&rotated, &MINOR_PROFILE);
        if minor_corr > best_corr {
            best_corr = minor_corr;
            best_root = root;
            best_mode = KeyMode::Minor;
        }
    }

    KeySignature::from_tonic(PitchClass::from_midi(best_root), best_mode)
}

/// Pearson correlation coefficient between two 12-element arrays.
fn pearson(x: &[f64; 12], y: &[f64; 12]) -> f64 {
    let x_mean: f64 = x.iter().sum::<f64>() / 12.0;
    let y_mean: f64 = y.iter().sum::<f64>() / 12.0;

    let mut num = 0.0;
    let mut x_sq = 0.0;
    let mut y_sq = 0.0;

    for i in 0..12 {
        let xd = x[i] - x_mean;
        let yd = y[i] - y_mean;
        num += xd * yd;
        x_sq += xd * xd;
        y_sq += yd * yd;
    }

    let denom = (x_sq * y_sq).sqrt();
    if denom < 1e-10 {
        return 0.0;
    }
    num / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note(pitch: u8, i: u64) -> TimedNote {
        TimedNote {
            track: 0,
            channel: 0,
            pitch,
            onset: i * 480,
            offset: (i + 1) * 480,
        }
    }

    fn sig(sharps: i8, mode: KeyMode) -> KeySignature {
        KeySignature {
            tick: 0,
            sharps,
            mode,
        }
    }

    #[test]
    fn tonics_from_signatures() {
        assert_eq!(sig(0, KeyMode::Major).tonic().value(), 0);
        assert_eq!(sig(1, KeyMode::Major).tonic().value(), 7); // G
        assert_eq!(sig(2, KeyMode::Major).tonic().value(), 2); // D
        assert_eq!(sig(-1, KeyMode::Major).tonic().value(), 5); // F
        assert_eq!(sig(-3, KeyMode::Major).tonic().value(), 3); // Eb
        assert_eq!(sig(0, KeyMode::Minor).tonic().value(), 9); // A minor
        assert_eq!(sig(1, KeyMode::Minor).tonic().value(), 4); // E minor
        assert_eq!(sig(-1, KeyMode::Minor).tonic().value(), 2); // D minor
    }

    #[test]
    fn from_tonic_inverts_tonic() {
        for pc in 0..12u8 {
            for mode in [KeyMode::Major, KeyMode::Minor] {
                let tonic = PitchClass::from_midi(pc);
                let key = KeySignature::from_tonic(tonic, mode);
                assert_eq!(key.tonic(), tonic, "{pc} {mode:?}");
                assert!((-6..=6).contains(&key.sharps));
            }
        }
    }

    #[test]
    fn scale_degrees() {
        let major = sig(0, KeyMode::Major);
        assert_eq!(major.scale_degree(PitchClass::from_midi(0)), Some(1));
        assert_eq!(major.scale_degree(PitchClass::from_midi(7)), Some(5));
        assert_eq!(major.scale_degree(PitchClass::from_midi(6)), None);

        let minor = sig(0, KeyMode::Minor);
        assert_eq!(minor.scale_degree(PitchClass::from_midi(3)), Some(3));
        assert_eq!(minor.scale_degree(PitchClass::from_midi(4)), None);
    }

    #[test]
    fn empty_notes_detect_c_major() {
        assert_eq!(detect_key(&[]), KeySignature::c_major());
    }

    #[test]
    fn g_major_scale_detected() {
        let notes: Vec<_> = [67, 69, 71, 72, 74, 76, 78, 79, 74, 67]
            .iter()
            .enumerate()
            .map(|(i, &p)| note(p, i as u64))
            .collect();
        let key = detect_key(&notes);
        assert_eq!(key.tonic().value(), 7);
        assert_eq!(key.mode, KeyMode::Major);
        assert_eq!(key.sharps, 1);
    }

    #[test]
    fn pearson_identical_arrays() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let r = pearson(&a, &a);
        assert!((r - 1.0).abs() < 1e-10, "self-correlation should be 1.0, got {}", r);
    }
}

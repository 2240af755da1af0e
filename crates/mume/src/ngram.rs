//! Overlapping fixed-width windows over a part's melody.

use crate::database::TableKind;
use crate::pitch::{PatternKey, PitchKey};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Width of an n-gram window; each width has its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum WindowSize {
    One,
    Two,
    Three,
    Four,
}

impl WindowSize {
    /// Largest first, the order callers feed a part through.
    pub const ALL: [WindowSize; 4] = [
        WindowSize::Four,
        WindowSize::Three,
        WindowSize::Two,
        WindowSize::One,
    ];

    pub fn len(self) -> usize {
        match self {
            WindowSize::One => 1,
            WindowSize::Two => 2,
            WindowSize::Three => 3,
            WindowSize::Four => 4,
        }
    }

    pub fn table(self) -> TableKind {
        match self {
            WindowSize::One => TableKind::OneNote,
            WindowSize::Two => TableKind::TwoNote,
            WindowSize::Three => TableKind::ThreeNote,
            WindowSize::Four => TableKind::FourNote,
        }
    }
}

impl TryFrom<usize> for WindowSize {
    type Error = Error;

    fn try_from(size: usize) -> Result<Self> {
        match size {
            1 => Ok(WindowSize::One),
            2 => Ok(WindowSize::Two),
            3 => Ok(WindowSize::Three),
            4 => Ok(WindowSize::Four),
            other => Err(Error::UnknownTable(format!("no {other}-note table"))),
        }
    }
}

impl From<WindowSize> for usize {
    fn from(size: WindowSize) -> usize {
        size.len()
    }
}

/// Composite keys for every window of `size` in `sequence`, in order.
///
/// Windows overlap by `size - 1`, so a sequence of length L yields
/// `L - size + 1` keys. A shorter sequence is an incomplete pattern.
pub fn windows(sequence: &[PitchKey], size: WindowSize) -> Result<Vec<PatternKey>> {
    let width = size.len();
    if sequence.len() < width {
        return Err(Error::IncompletePattern {
            len: sequence.len(),
            window: width,
        });
    }
    Ok(sequence.windows(width).map(PatternKey::from_keys).collect())
}

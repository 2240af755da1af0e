use crate::pitch::PatternKey;
use crate::sort::{self, LessOrEqual};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pattern counts plus a running total of every increment.
///
/// Counts and total move together in [`insert`](Self::insert), so
/// `total == counts.values().sum()` holds after every call. Entries are
/// never decremented or removed. Iteration is in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    counts: BTreeMap<PatternKey, u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PatternKey) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    /// Count for `key`, zero when never inserted.
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PatternKey, u64)> {
        self.counts.iter().map(|(k, c)| (k, *c))
    }

    /// Patterns ordered most frequent first, ties by key.
    pub fn ranked(&self) -> Vec<PatternCount> {
        let mut ranked: Vec<PatternCount> = self
            .iter()
            .map(|(key, count)| PatternCount {
                key: key.clone(),
                count,
            })
            .collect();
        sort::sort(&mut ranked);
        ranked
    }
}

/// A key with its count, ordered for frequency reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCount {
    pub key: PatternKey,
    pub count: u64,
}

impl LessOrEqual for PatternCount {
    fn less_or_equal(&self, other: &Self) -> bool {
        self.count > other.count || (self.count == other.count && self.key <= other.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchKey;
    use pretty_assertions::assert_eq;

    fn pk(code: &str) -> PatternKey {
        let keys: Vec<PitchKey> = (0..code.len())
            .step_by(2)
            .map(|i| PitchKey::parse(&code[i..i + 2]).unwrap())
            .collect();
        PatternKey::from_keys(&keys)
    }

    #[test]
    fn empty_table() {
        let table = FrequencyTable::new();
        assert_eq!(table.total(), 0);
        assert_eq!(table.get("00"), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn total_tracks_sum_of_counts() {
        let mut table = FrequencyTable::new();
        for code in ["00", "04", "00", "07", "00", "04"] {
            table.insert(pk(code));
            let sum: u64 = table.iter().map(|(_, c)| c).sum();
            assert_eq!(table.total(), sum);
        }
        assert_eq!(table.get("00"), 3);
        assert_eq!(table.get("04"), 2);
        assert_eq!(table.get("07"), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn ranked_by_count_then_key() {
        let mut table = FrequencyTable::new();
        for code in ["07", "04", "04", "00", "07", "11", "04"] {
            table.insert(pk(code));
        }
        let ranked: Vec<(String, u64)> = table
            .ranked()
            .into_iter()
            .map(|pc| (pc.key.to_string(), pc.count))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("04".to_string(), 3),
                ("07".to_string(), 2),
                ("00".to_string(), 1),
                ("11".to_string(), 1),
            ]
        );
    }
}

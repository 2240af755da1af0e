//! In-place partition-exchange sort over a caller-supplied total order.
//!
//! Elements are partitioned around a pivot taken from the last slot
//! (Lomuto scheme). Average O(n log n); O(n²) on already-ordered input with
//! [`PivotStrategy::Last`], which [`PivotStrategy::Random`] avoids. Not stable.

use rand::Rng;

/// Total-order comparison used by [`sort`].
pub trait LessOrEqual {
    fn less_or_equal(&self, other: &Self) -> bool;
}

impl<T: Ord> LessOrEqual for T {
    fn less_or_equal(&self, other: &Self) -> bool {
        self <= other
    }
}

/// Where the partition pivot comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotStrategy {
    /// Always the last element of the range.
    #[default]
    Last,
    /// A uniformly chosen element, swapped into the last slot first.
    Random,
}

/// Sort ascending with the last element as pivot.
pub fn sort<T: LessOrEqual>(items: &mut [T]) {
    quick_sort(items, &mut |len| len - 1);
}

/// Sort ascending with an explicit pivot strategy.
///
/// `rng` is only drawn from for [`PivotStrategy::Random`].
pub fn sort_with<T: LessOrEqual, R: Rng + ?Sized>(
    items: &mut [T],
    strategy: PivotStrategy,
    rng: &mut R,
) {
    match strategy {
        PivotStrategy::Last => sort(items),
        PivotStrategy::Random => quick_sort(items, &mut |len| rng.gen_range(0..len)),
    }
}

/// `choose_pivot` maps a range length to the index of its pivot.
fn quick_sort<T: LessOrEqual>(mut items: &mut [T], choose_pivot: &mut dyn FnMut(usize) -> usize) {
    // Recurse into the smaller side, loop on the larger.
    while items.len() > 1 {
        let slice = std::mem::take(&mut items);
        let chosen = choose_pivot(slice.len());
        slice.swap(chosen, slice.len() - 1);
        let pivot = partition(slice);
        let (left, rest) = slice.split_at_mut(pivot);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            quick_sort(left, choose_pivot);
            items = right;
        } else {
            quick_sort(right, choose_pivot);
            items = left;
        }
    }
}

/// Lomuto partition around the last element, returning the pivot's final index.
fn partition<T: LessOrEqual>(items: &mut [T]) -> usize {
    let high = items.len() - 1;
    let mut store = 0;
    for j in 0..high {
        if items[j].less_or_equal(&items[high]) {
            items.swap(store, j);
            store += 1;
        }
    }
    items.swap(store, high);
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_ordered<T: LessOrEqual>(items: &[T]) -> bool {
        items.windows(2).all(|w| w[0].less_or_equal(&w[1]))
    }

    #[test]
    fn empty_and_single_are_unchanged() {
        let mut empty: Vec<i32> = vec![];
        sort(&mut empty);
        assert!(empty.is_empty());

        let mut one = vec![42];
        sort(&mut one);
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn sorts_ascending() {
        let mut items = vec![5, 3, 9, 1, 1, 8, -2, 7, 3];
        sort(&mut items);
        assert_eq!(items, vec![-2, 1, 1, 3, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn idempotent() {
        let mut items = vec![10, 4, 7, 4, 0, 12, 3];
        sort(&mut items);
        let once = items.clone();
        sort(&mut items);
        assert_eq!(items, once);
        assert!(is_ordered(&items));
    }

    #[test]
    fn already_sorted_and_reversed() {
        let mut ascending: Vec<u32> = (0..500).collect();
        sort(&mut ascending);
        assert_eq!(ascending, (0..500).collect::<Vec<_>>());

        let mut descending: Vec<u32> = (0..500).rev().collect();
        sort(&mut descending);
        assert_eq!(descending, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn random_pivot_matches_fixed_pivot() {
        let mut rng = StdRng::seed_from_u64(7);
        let original: Vec<i64> = (0..200).map(|_| rng.gen_range(-50..50)).collect();

        let mut fixed = original.clone();
        sort(&mut fixed);

        let mut randomized = original;
        sort_with(&mut randomized, PivotStrategy::Random, &mut rng);

        assert_eq!(fixed, randomized);
    }

    #[test]
    fn fixed_pivot_leaves_the_rng_alone() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut items = vec![4, 1, 3, 9, 0, 2];
        sort_with(&mut items, PivotStrategy::Last, &mut rng);
        assert_eq!(items, vec![0, 1, 2, 3, 4, 9]);

        let mut untouched = StdRng::seed_from_u64(3);
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Interval(u8, u8);

    impl LessOrEqual for Interval {
        fn less_or_equal(&self, other: &Self) -> bool {
            (self.1 - self.0) <= (other.1 - other.0)
        }
    }

    #[test]
    fn custom_order_on_non_ord_type() {
        let mut items = vec![Interval(0, 7), Interval(2, 3), Interval(4, 9), Interval(0, 0)];
        sort(&mut items);
        assert!(is_ordered(&items));
        assert_eq!(items.first(), Some(&Interval(0, 0)));
        assert_eq!(items.last(), Some(&Interval(0, 7)));
    }
}

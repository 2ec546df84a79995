//! Occurrence counting.
//!
//! Equality is value equality (`PartialEq`), never identity: two records with
//! equal fields are the same element for counting purposes. All functions are
//! single-pass and leave their input untouched.

use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;

/// Count elements equal to `target`.
///
/// ```rust
/// use drillbook::counter::count_occurrences;
///
/// assert_eq!(count_occurrences(&[1, 2, 3, 4, 1, 1, 3, 1, 5], &1), 4);
/// assert_eq!(count_occurrences::<i32>(&[], &1), 0);
/// ```
pub fn count_occurrences<T: PartialEq>(items: &[T], target: &T) -> usize {
    count_matching(items, |item| item == target)
}

/// Count elements satisfying `predicate`.
pub fn count_matching<T, P>(items: &[T], predicate: P) -> usize
where
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(item)).count()
}

/// Parallel variant of [`count_occurrences`] for large inputs.
///
/// Counting is order-independent, so splitting the slice across threads
/// gives the same result as the sequential pass.
pub fn count_occurrences_par<T>(items: &[T], target: &T) -> usize
where
    T: PartialEq + Sync,
{
    items.par_iter().filter(|item| *item == target).count()
}

/// Frequency of every distinct element.
pub fn tally<T>(items: &[T]) -> HashMap<T, usize>
where
    T: Eq + Hash + Clone,
{
    items.iter().fold(HashMap::new(), |mut counts, item| {
        *counts.entry(item.clone()).or_insert(0) += 1;
        counts
    })
}

/// Frequencies sorted by descending count, ties broken by key.
pub fn tally_sorted<T>(items: &[T]) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone + Ord,
{
    let mut entries: Vec<(T, usize)> = tally(items).into_iter().collect();
    entries.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    entries
}

//! Bounded top-K selection over aggregated popularity counts.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::models::{AggregatedMap, CountPair};

/// Heap entry ranked by count, then by package name ascending among equal
/// counts, so that selection and output order are reproducible.
#[derive(PartialEq, Eq)]
struct Ranked(CountPair);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .count
            .cmp(&other.0.count)
            .then_with(|| other.0.package.cmp(&self.0.package))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keep the `k` most frequent packages, ordered by count descending.
///
/// Uses a min-heap of size `k`, so memory stays bounded by `k` regardless of
/// how many distinct packages were aggregated.
pub fn select_top_k(counts: AggregatedMap, k: usize) -> Vec<CountPair> {
    if k == 0 {
        return vec![];
    }
    let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(k.min(counts.len()) + 1);
    for (package, count) in counts {
        let candidate = Ranked(CountPair { package, count });
        if heap.len() < k {
            heap.push(Reverse(candidate));
        } else if let Some(mut weakest) = heap.peek_mut() {
            if candidate > weakest.0 {
                *weakest = Reverse(candidate);
            }
        }
    }
    // `into_sorted_vec` is ascending on `Reverse`, i.e. strongest first.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(Ranked(pair))| pair)
        .collect()
}

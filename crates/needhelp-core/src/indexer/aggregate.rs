//! Per-key count summation, sequential and sharded across a rayon pool.

use rayon::prelude::*;

use crate::indexer::signals::Signal;
use crate::models::{AggregatedMap, CountPair, Record};

/// Add a single pair into `map`.
pub fn accumulate(map: &mut AggregatedMap, pair: CountPair) {
    *map.entry(pair.package).or_insert(0) += pair.count;
}

/// Sum every pair of `pairs` per package.
pub fn aggregate_counts<I>(pairs: I) -> AggregatedMap
where
    I: IntoIterator<Item = CountPair>,
{
    let mut map = AggregatedMap::new();
    for pair in pairs {
        accumulate(&mut map, pair);
    }
    map
}

/// Merge two partial maps with the same summation rule. The larger map is
/// reused as the accumulator.
pub fn merge_counts(a: AggregatedMap, b: AggregatedMap) -> AggregatedMap {
    let (mut into, from) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    for (package, count) in from {
        *into.entry(package).or_insert(0) += count;
    }
    into
}

/// Extract and sum one signal over all records on the calling thread.
pub fn aggregate_records_sequential<S: Signal>(records: &[Record], signal: &S) -> AggregatedMap {
    aggregate_counts(records.iter().flat_map(|record| signal.pairs(record)))
}

/// Extract and sum one signal over all records in parallel.
///
/// Each rayon split folds its records into a private map; the partial maps are
/// then merged pairwise, so no state is shared between workers.
pub fn aggregate_records<S: Signal>(records: &[Record], signal: &S) -> AggregatedMap {
    records
        .par_iter()
        .fold(AggregatedMap::new, |mut map, record| {
            for pair in signal.pairs(record) {
                accumulate(&mut map, pair);
            }
            map
        })
        .reduce(AggregatedMap::new, merge_counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::signals::{NeedsHelp, Popularity};

    fn sample_pairs() -> Vec<CountPair> {
        vec![
            CountPair::new("com", 1),
            CountPair::new("com.foo", 2),
            CountPair::new("org", 3),
            CountPair::new("com", 4),
            CountPair::new("com.foo", 0),
            CountPair::new("net", 1),
            CountPair::new("org", 1),
        ]
    }

    #[test]
    fn test_aggregate_counts_sums_per_key() {
        let map = aggregate_counts(sample_pairs());
        assert_eq!(map.len(), 4);
        assert_eq!(map["com"], 5);
        assert_eq!(map["com.foo"], 2);
        assert_eq!(map["org"], 4);
        assert_eq!(map["net"], 1);
    }

    #[test]
    fn test_aggregate_counts_order_independent() {
        let pairs = sample_pairs();
        let expected = aggregate_counts(pairs.clone());
        // Every rotation and the reversal of the input produce the same map.
        for shift in 0..pairs.len() {
            let mut rotated = pairs.clone();
            rotated.rotate_left(shift);
            assert_eq!(aggregate_counts(rotated.clone()), expected);
            rotated.reverse();
            assert_eq!(aggregate_counts(rotated), expected);
        }
    }

    #[test]
    fn test_merge_counts_matches_single_pass() {
        let pairs = sample_pairs();
        let (left, right) = pairs.split_at(3);
        let merged = merge_counts(
            aggregate_counts(left.to_vec()),
            aggregate_counts(right.to_vec()),
        );
        assert_eq!(merged, aggregate_counts(pairs));
    }

    #[test]
    fn test_merge_counts_with_empty() {
        let map = aggregate_counts(sample_pairs());
        assert_eq!(merge_counts(AggregatedMap::new(), map.clone()), map);
        assert_eq!(merge_counts(map.clone(), AggregatedMap::new()), map);
    }

    #[test]
    fn test_aggregate_records_parallel_matches_sequential() {
        let records: Vec<Record> = (0..64)
            .map(|i| {
                Record::new(format!(
                    "package org.sample{};\nimport java.util.List;\nimport org.sample{}.Thing;\n// TODO {i}\n",
                    i % 4,
                    i % 7
                ))
            })
            .chain(std::iter::once(Record::empty()))
            .collect();

        let popularity = Popularity;
        let popular = aggregate_records(&records, &popularity);
        let sequential = aggregate_counts(records.iter().flat_map(|r| popularity.pairs(r)));
        assert_eq!(popular, sequential);
        assert_eq!(aggregate_records_sequential(&records, &popularity), sequential);
        assert_eq!(popular["java"], 64);
        assert_eq!(popular["java.util.List"], 64);

        let help = aggregate_records(&records, &NeedsHelp);
        assert_eq!(aggregate_records_sequential(&records, &NeedsHelp), help);
        assert_eq!(help["org"], 64);
        assert_eq!(help["org.sample0"], 16);
    }
}

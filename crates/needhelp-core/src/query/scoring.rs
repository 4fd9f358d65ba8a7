//! Help lookup construction and the popularity × needs-help composite score.

use crate::models::{AggregatedMap, CountPair, HelpLookup, ScoredPackage};

/// Drop packages whose summed help count is zero.
pub fn drop_zero(counts: AggregatedMap) -> HelpLookup {
    counts.into_iter().filter(|(_, count)| *count > 0).collect()
}

/// `ln(help) * ln(popularity)`. Both logs are taken on counts, so a count of 1
/// zeroes the product.
pub fn composite(help_count: u64, popularity_count: u64) -> f64 {
    (help_count as f64).ln() * (popularity_count as f64).ln()
}

/// Join the ranked popular packages against the help lookup.
///
/// Output follows the order of `popular`. Packages missing from `help`, and
/// packages whose composite is not strictly positive, are skipped.
pub fn composite_scores(popular: &[CountPair], help: &HelpLookup) -> Vec<ScoredPackage> {
    popular
        .iter()
        .filter_map(|pair| {
            let help_count = help.get(&pair.package).copied().filter(|c| *c > 0)?;
            let score = composite(help_count, pair.count);
            (score > 0.0).then(|| ScoredPackage::new(pair.package.clone(), score))
        })
        .collect()
}

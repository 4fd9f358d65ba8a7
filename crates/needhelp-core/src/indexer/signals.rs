//! Per-record signal extraction: import popularity and FIXME/TODO help markers.
//!
//! Both extractors scan a record line by line with literal prefix checks, so
//! they tolerate any malformed or non-Java text by simply emitting nothing.

use crate::indexer::qualifier::declared_packages;
use crate::models::{CountPair, Record};

pub const IMPORT_KEYWORD: &str = "import";
pub const PACKAGE_KEYWORD: &str = "package";
pub const HELP_MARKERS: &[&str] = &["FIXME", "TODO"];

/// A per-record signal emitting `(package, count)` pairs for aggregation.
pub trait Signal: Sync {
    fn pairs<'r>(&self, record: &'r Record) -> impl Iterator<Item = CountPair> + 'r;
}

/// Import-declaration popularity.
#[derive(Clone, Copy, Debug, Default)]
pub struct Popularity;

/// FIXME/TODO marker lines attributed to the declared package.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeedsHelp;

// ---------------------------------------------------------------------------
// Popularity
// ---------------------------------------------------------------------------

/// Emit `(prefix, 1)` for every prefix of every declaration line that starts
/// with `keyword`.
pub fn package_use<'a>(
    content: Option<&'a str>,
    keyword: &'a str,
) -> impl Iterator<Item = CountPair> + 'a {
    content
        .into_iter()
        .flat_map(|text| text.split('\n'))
        .filter(move |line| line.starts_with(keyword))
        .flat_map(move |line| declared_packages(line, keyword))
        .map(|package| CountPair::new(package, 1))
}

impl Signal for Popularity {
    fn pairs<'r>(&self, record: &'r Record) -> impl Iterator<Item = CountPair> + 'r {
        package_use(record.content(), IMPORT_KEYWORD)
    }
}

// ---------------------------------------------------------------------------
// Needs-help
// ---------------------------------------------------------------------------

fn is_help_line(line: &str) -> bool {
    HELP_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Emit `(prefix, marker_lines)` for every prefix of the record's package.
///
/// Only the last line starting with `keyword` names the package. Each line
/// containing any help marker counts once. A record without a package line
/// emits nothing.
///
/// The count is only known after the whole record is scanned, so the pairs are
/// collected eagerly and returned as an owning iterator.
pub fn package_help(content: Option<&str>, keyword: &str) -> impl Iterator<Item = CountPair> {
    let mut pairs = Vec::new();
    if let Some(text) = content {
        let mut package_line = "";
        let mut count = 0u64;
        for line in text.split('\n') {
            if line.starts_with(keyword) {
                package_line = line;
            }
            if is_help_line(line) {
                count += 1;
            }
        }
        pairs = declared_packages(package_line, keyword)
            .into_iter()
            .map(|package| CountPair::new(package, count))
            .collect();
    }
    pairs.into_iter()
}

impl Signal for NeedsHelp {
    fn pairs<'r>(&self, record: &'r Record) -> impl Iterator<Item = CountPair> + 'r {
        package_help(record.content(), PACKAGE_KEYWORD)
    }
}

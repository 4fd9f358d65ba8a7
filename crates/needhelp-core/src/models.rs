//! Shared typed models used across extraction, scoring, and sink layers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// Package key → summed count, one entry per distinct key.
pub type AggregatedMap = HashMap<String, u64>;

/// Package key → help count. Never holds a zero.
pub type HelpLookup = HashMap<String, u64>;

// ---------------------------------------------------------------------------
// 1. Record
// ---------------------------------------------------------------------------

/// One corpus entry: the text of a single source file, possibly missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub content: Option<String>,
}

impl Record {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn empty() -> Self {
        Self { content: None }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

// ---------------------------------------------------------------------------
// 2. CountPair
// ---------------------------------------------------------------------------

/// A `(package, count)` pair emitted by the extractors and kept by top-K.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountPair {
    pub package: String,
    pub count: u64,
}

impl CountPair {
    pub fn new(package: impl Into<String>, count: u64) -> Self {
        Self {
            package: package.into(),
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// 3. ScoredPackage
// ---------------------------------------------------------------------------

/// Final output row: a package and its strictly positive composite score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredPackage {
    pub package: String,
    pub score: f64,
}

impl ScoredPackage {
    pub fn new(package: impl Into<String>, score: f64) -> Self {
        Self {
            package: package.into(),
            score,
        }
    }
}

// ---------------------------------------------------------------------------
// 4. PipelineStats
// ---------------------------------------------------------------------------

/// Volume counters collected during one pipeline run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub records_read: usize,
    pub popular_packages: usize,
    pub top_packages: usize,
    pub help_packages: usize,
    pub scored_packages: usize,
    pub elapsed_ms: u64,
}

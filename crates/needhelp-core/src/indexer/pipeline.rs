//! Two-branch scoring pipeline with Rayon-based parallelism.
//!
//! The popularity branch (import counts → top-K) and the needs-help branch
//! (marker counts → zero filter) run side by side over the same record slice.
//! The composite join starts once both are fully materialized.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::errors::NeedHelpResult;
use crate::indexer::aggregate::{aggregate_records, aggregate_records_sequential};
use crate::indexer::records::RecordSource;
use crate::indexer::signals::{NeedsHelp, Popularity};
use crate::models::{
    AggregatedMap, CountPair, HelpLookup, PipelineStats, Record, ScoredPackage,
};
use crate::query::scoring::{composite_scores, drop_zero};
use crate::query::topk::select_top_k;
use crate::store::sink::ScoreSink;

/// Result of one pipeline run.
#[derive(Clone, Debug, Default)]
pub struct PipelineOutput {
    pub scores: Vec<ScoredPackage>,
    pub stats: PipelineStats,
}

struct Branches {
    popular: Vec<CountPair>,
    popular_packages: usize,
    help: HelpLookup,
}

fn popularity_branch(counts: AggregatedMap, top_n: usize) -> (Vec<CountPair>, usize) {
    let distinct = counts.len();
    let top = select_top_k(counts, top_n);
    debug!("Popularity: {distinct} packages, kept {}", top.len());
    (top, distinct)
}

fn help_branch(counts: AggregatedMap) -> HelpLookup {
    let help = drop_zero(counts);
    debug!("Needs-help: {} packages with markers", help.len());
    help
}

fn run_branches(records: &[Record], top_n: usize) -> Branches {
    let ((popular, popular_packages), help) = rayon::join(
        || popularity_branch(aggregate_records(records, &Popularity), top_n),
        || help_branch(aggregate_records(records, &NeedsHelp)),
    );
    Branches {
        popular,
        popular_packages,
        help,
    }
}

fn run_branches_sequential(records: &[Record], top_n: usize) -> Branches {
    let (popular, popular_packages) =
        popularity_branch(aggregate_records_sequential(records, &Popularity), top_n);
    let help = help_branch(aggregate_records_sequential(records, &NeedsHelp));
    Branches {
        popular,
        popular_packages,
        help,
    }
}

/// Score an already-loaded record set.
///
/// Work runs on a dedicated pool of `config.workers` threads; if the pool
/// cannot be built both branches run sequentially on the calling thread.
pub fn score_records(records: &[Record], config: &PipelineConfig) -> PipelineOutput {
    let started = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build();

    let branches = match pool {
        Ok(pool) => pool.install(|| run_branches(records, config.top_n)),
        Err(e) => {
            warn!("Thread pool unavailable, scoring sequentially: {e}");
            run_branches_sequential(records, config.top_n)
        }
    };

    let scores = composite_scores(&branches.popular, &branches.help);

    let stats = PipelineStats {
        records_read: records.len(),
        popular_packages: branches.popular_packages,
        top_packages: branches.popular.len(),
        help_packages: branches.help.len(),
        scored_packages: scores.len(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        records = stats.records_read,
        popular = stats.popular_packages,
        top = stats.top_packages,
        help = stats.help_packages,
        scored = stats.scored_packages,
        elapsed_ms = stats.elapsed_ms,
        "Scored packages"
    );

    PipelineOutput { scores, stats }
}

/// Read from `source`, score, and hand the results to `sink`.
pub fn run_pipeline<S, K>(
    source: &mut S,
    sink: &mut K,
    config: &PipelineConfig,
) -> NeedHelpResult<PipelineStats>
where
    S: RecordSource + ?Sized,
    K: ScoreSink + ?Sized,
{
    let records = source.read_records(config.record_limit)?;
    let output = score_records(&records, config);
    sink.write_scores(&output.scores, &output.stats)?;
    Ok(output.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sink::MemorySink;

    fn library(package: &str, todos: usize) -> Record {
        let mut src = format!("package {package};\n\nimport java.util.List;\n");
        for i in 0..todos {
            src.push_str(&format!("// TODO item {i}\n"));
        }
        Record::new(src)
    }

    fn client(imports: &[&str]) -> Record {
        let mut src = String::from("package app.client;\n");
        for import in imports {
            src.push_str(&format!("import {import};\n"));
        }
        Record::new(src)
    }

    fn corpus() -> Vec<Record> {
        vec![
            library("org.widgets", 3),
            library("org.widgets", 1),
            library("org.gadgets", 5),
            library("net.solid", 0),
            client(&["org.widgets.Button", "org.gadgets.Dial"]),
            client(&["org.widgets.Slider", "net.solid.Rock"]),
            client(&["org.widgets.Button", "net.solid.Rock"]),
            Record::empty(),
            Record::new(""),
        ]
    }

    #[test]
    fn test_score_records_end_to_end() {
        let output = score_records(&corpus(), &PipelineConfig::default());
        let expected = [
            // org: help 9 (3 + 1 + 5), popularity 4
            ("org", 9f64.ln() * 4f64.ln()),
            // org.widgets: help 4, popularity 3
            ("org.widgets", 4f64.ln() * 3f64.ln()),
        ];
        assert_eq!(output.scores.len(), expected.len());
        for (scored, (package, score)) in output.scores.iter().zip(expected) {
            assert_eq!(scored.package, package);
            assert_eq!(scored.score, score);
        }
        assert_eq!(output.stats.records_read, 9);
        assert_eq!(output.stats.scored_packages, 2);
    }

    #[test]
    fn test_score_records_top_k_truncation_drops_join_candidates() {
        let output = score_records(&corpus(), &PipelineConfig::default().with_top_n(1));
        // "java", "java.util", "java.util.List" and "org" tie at 4 imports. The
        // name tie-break keeps "java", which no record declares.
        assert_eq!(output.stats.top_packages, 1);
        assert!(output.scores.is_empty());
    }

    #[test]
    fn test_score_records_is_idempotent() {
        let records = corpus();
        let config = PipelineConfig::default().with_workers(3);
        let first = score_records(&records, &config);
        for _ in 0..3 {
            let again = score_records(&records, &config);
            assert_eq!(again.scores, first.scores);
            let bits: Vec<u64> = again.scores.iter().map(|s| s.score.to_bits()).collect();
            let first_bits: Vec<u64> = first.scores.iter().map(|s| s.score.to_bits()).collect();
            assert_eq!(bits, first_bits);
        }
    }

    #[test]
    fn test_sequential_branches_match_parallel() {
        let records = corpus();
        let parallel = run_branches(&records, 5);
        let sequential = run_branches_sequential(&records, 5);
        assert_eq!(sequential.popular, parallel.popular);
        assert_eq!(sequential.popular_packages, parallel.popular_packages);
        assert_eq!(sequential.help, parallel.help);
        assert_eq!(
            composite_scores(&sequential.popular, &sequential.help),
            composite_scores(&parallel.popular, &parallel.help)
        );
    }

    #[test]
    fn test_score_records_empty_input() {
        let output = score_records(&[], &PipelineConfig::default());
        assert!(output.scores.is_empty());
        assert_eq!(
            output.stats,
            PipelineStats {
                elapsed_ms: output.stats.elapsed_ms,
                ..PipelineStats::default()
            }
        );
    }

    #[test]
    fn test_run_pipeline_applies_record_limit_and_writes_sink() {
        let mut source = corpus();
        let mut sink = MemorySink::default();
        let config = PipelineConfig::default().with_record_limit(Some(4));
        let stats = run_pipeline(&mut source, &mut sink, &config).unwrap();
        assert_eq!(stats.records_read, 4);
        // Only the libraries were read. They import nothing but `java.*`, which
        // no record declares, so nothing scores.
        assert!(sink.scores.is_empty());
        assert_eq!(sink.runs, 1);
    }
}

//! Output sinks for scored packages.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::errors::{NeedHelpError, NeedHelpResult};
use crate::models::{PipelineStats, ScoredPackage};

pub const CSV_HEADER: [&str; 2] = ["package", "score"];

/// Destination for the finished, ordered list of scored packages.
pub trait ScoreSink {
    fn write_scores(
        &mut self,
        scores: &[ScoredPackage],
        stats: &PipelineStats,
    ) -> NeedHelpResult<()>;
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Collects every run's scores in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub scores: Vec<ScoredPackage>,
    pub last_stats: Option<PipelineStats>,
    pub runs: usize,
}

impl ScoreSink for MemorySink {
    fn write_scores(
        &mut self,
        scores: &[ScoredPackage],
        stats: &PipelineStats,
    ) -> NeedHelpResult<()> {
        self.scores.extend_from_slice(scores);
        self.last_stats = Some(stats.clone());
        self.runs += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Writes `package,score` rows after a header line.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> NeedHelpResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| NeedHelpError::Sink(e.error().to_string()))
    }
}

impl CsvSink<std::fs::File> {
    pub fn create(path: impl AsRef<Path>) -> NeedHelpResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| {
            NeedHelpError::Sink(format!("cannot create {}: {e}", path.display()))
        })?;
        Ok(Self::new(file))
    }
}

impl<W: Write> ScoreSink for CsvSink<W> {
    fn write_scores(
        &mut self,
        scores: &[ScoredPackage],
        _stats: &PipelineStats,
    ) -> NeedHelpResult<()> {
        self.writer.write_record(CSV_HEADER)?;
        for scored in scores {
            let score = scored.score.to_string();
            self.writer
                .write_record([scored.package.as_str(), score.as_str()])?;
        }
        self.writer.flush()?;
        debug!("Wrote {} CSV rows", scores.len());
        Ok(())
    }
}

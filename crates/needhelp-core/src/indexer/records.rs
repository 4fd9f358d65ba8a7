//! Record sources feeding the pipeline.

use std::io::BufRead;
use std::path::PathBuf;

use tracing::debug;

use crate::errors::{NeedHelpError, NeedHelpResult};
use crate::models::Record;

/// Anything that can hand the pipeline a batch of records.
pub trait RecordSource {
    /// Read up to `limit` records (`None` reads everything).
    fn read_records(&mut self, limit: Option<usize>) -> NeedHelpResult<Vec<Record>>;
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

impl RecordSource for Vec<Record> {
    fn read_records(&mut self, limit: Option<usize>) -> NeedHelpResult<Vec<Record>> {
        let take = limit.unwrap_or(self.len()).min(self.len());
        Ok(self.drain(..take).collect())
    }
}

// ---------------------------------------------------------------------------
// JSON Lines
// ---------------------------------------------------------------------------

/// One JSON object per line, e.g. `{"content": "package a;\n..."}`.
///
/// `content` may be `null` or missing. Blank lines are skipped.
pub struct JsonLinesSource<R> {
    reader: R,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl JsonLinesSource<std::io::BufReader<std::fs::File>> {
    pub fn open(path: impl Into<PathBuf>) -> NeedHelpResult<Self> {
        let path = path.into();
        let file = std::fs::File::open(&path).map_err(|e| {
            NeedHelpError::Source(format!("cannot open {}: {e}", path.display()))
        })?;
        Ok(Self::new(std::io::BufReader::new(file)))
    }
}

impl<R: BufRead> RecordSource for JsonLinesSource<R> {
    fn read_records(&mut self, limit: Option<usize>) -> NeedHelpResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut line = String::new();
        let mut line_number = 0usize;
        while limit.map_or(true, |max| records.len() < max) {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: Record =
                serde_json::from_str(trimmed).map_err(|e| NeedHelpError::Record {
                    line: line_number,
                    message: e.to_string(),
                })?;
            records.push(record);
        }
        debug!("Read {} JSON records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source_respects_limit() {
        let mut source = vec![Record::new("a"), Record::new("b"), Record::empty()];
        let first = source.read_records(Some(2)).unwrap();
        assert_eq!(first, vec![Record::new("a"), Record::new("b")]);
        let rest = source.read_records(Some(10)).unwrap();
        assert_eq!(rest, vec![Record::empty()]);
        assert!(source.read_records(None).unwrap().is_empty());
    }

    #[test]
    fn test_json_lines_source_reads_nullable_content() {
        let data = "{\"content\": \"package a;\\n// TODO\"}\n\n{\"content\": null}\n{}\n";
        let mut source = JsonLinesSource::new(data.as_bytes());
        let records = source.read_records(None).unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("package a;\n// TODO"),
                Record::empty(),
                Record::empty(),
            ]
        );
    }

    #[test]
    fn test_json_lines_source_limit() {
        let data = "{\"content\": \"1\"}\n{\"content\": \"2\"}\n{\"content\": \"3\"}\n";
        let mut source = JsonLinesSource::new(data.as_bytes());
        assert_eq!(source.read_records(Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_json_lines_source_reports_bad_line() {
        let data = "{\"content\": \"ok\"}\nnot json\n";
        let mut source = JsonLinesSource::new(data.as_bytes());
        match source.read_records(None) {
            Err(NeedHelpError::Record { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected record error, got {other:?}"),
        }
    }

    #[test]
    fn test_json_lines_source_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonLinesSource::open(dir.path().join("missing.jsonl"));
        assert!(matches!(result, Err(NeedHelpError::Source(_))));
    }
}

//! Directory-backed record source: one record per source file.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::errors::{NeedHelpError, NeedHelpResult};
use crate::indexer::records::RecordSource;
use crate::models::Record;

const DEFAULT_EXTENSIONS: &[&str] = &["java"];

/// Whether `path` ends in one of `extensions` (compared case-insensitively,
/// without the leading dot).
pub fn has_source_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_lowercase();
    extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
}

/// Collect matching files under `root`, honouring `.gitignore` and skipping
/// hidden entries. Paths are sorted so runs over an unchanged tree read
/// records in the same order.
pub fn iter_source_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {e}", root.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| has_source_extension(path, extensions))
        .collect();
    files.sort();
    files
}

/// Read `paths` in order into records, skipping files that cannot be read.
/// `limit` caps the number of records returned, not the number of paths tried.
pub fn read_source_files(paths: Vec<PathBuf>, limit: Option<usize>) -> Vec<Record> {
    let take = limit.unwrap_or(paths.len());
    let mut records = Vec::with_capacity(take.min(paths.len()));
    for path in paths {
        if records.len() >= take {
            break;
        }
        match std::fs::read(&path) {
            Ok(bytes) => records.push(Record::new(String::from_utf8_lossy(&bytes))),
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
    }
    records
}

/// Walks a source tree and yields each matching file's text as a record.
pub struct DirectorySource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }
}

impl RecordSource for DirectorySource {
    fn read_records(&mut self, limit: Option<usize>) -> NeedHelpResult<Vec<Record>> {
        if !self.root.is_dir() {
            return Err(NeedHelpError::Source(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        let files = iter_source_files(&self.root, &self.extensions);
        let records = read_source_files(files, limit);
        debug!(
            "Read {} source files from {}",
            records.len(),
            self.root.display()
        );
        Ok(records)
    }
}

//! SQLite storage for scored runs.
//!
//! Each write opens its own connection, so a `SqliteSink` can be kept around
//! across runs without holding the database open.

use std::path::PathBuf;

use rusqlite::{params, Connection};
use tracing::info;

use crate::errors::NeedHelpResult;
use crate::models::{PipelineStats, ScoredPackage};
use crate::store::schema;
use crate::store::sink::ScoreSink;

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            let mut expanded = PathBuf::from(home);
            if path.len() > 2 {
                expanded.push(&path[2..]);
            }
            return expanded;
        }
    }
    PathBuf::from(path)
}

/// Persists every run as one `runs` row plus its ordered `package_scores`.
pub struct SqliteSink {
    db_path: PathBuf,
}

impl SqliteSink {
    /// Point at `db_path` and make sure the schema is current.
    pub fn open(db_path: &str) -> NeedHelpResult<Self> {
        let sink = Self {
            db_path: expand_tilde(db_path),
        };
        if let Some(parent) = sink.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = sink.connect()?;
        schema::init_schema(&conn)?;
        Ok(sink)
    }

    fn connect(&self) -> NeedHelpResult<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Scores of run `run_id` in their stored order.
    pub fn load_run(&self, run_id: i64) -> NeedHelpResult<Vec<ScoredPackage>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT package, score FROM package_scores WHERE run_id = ?1 ORDER BY position;",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(ScoredPackage::new(row.get::<_, String>(0)?, row.get(1)?))
        })?;
        let scores = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(scores)
    }

    /// Id of the most recent run, if any.
    pub fn latest_run_id(&self) -> NeedHelpResult<Option<i64>> {
        let conn = self.connect()?;
        let id: Option<i64> = conn.query_row("SELECT MAX(id) FROM runs;", [], |row| row.get(0))?;
        Ok(id)
    }
}

impl ScoreSink for SqliteSink {
    fn write_scores(
        &mut self,
        scores: &[ScoredPackage],
        stats: &PipelineStats,
    ) -> NeedHelpResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO runs(records_read, popular_packages, top_packages, help_packages, \
             scored_packages, elapsed_ms) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                stats.records_read as i64,
                stats.popular_packages as i64,
                stats.top_packages as i64,
                stats.help_packages as i64,
                stats.scored_packages as i64,
                stats.elapsed_ms as i64,
            ],
        )?;
        let run_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO package_scores(run_id, position, package, score) \
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for (position, scored) in scores.iter().enumerate() {
                stmt.execute(params![run_id, position as i64, scored.package, scored.score])?;
            }
        }
        tx.commit()?;
        info!(run_id, rows = scores.len(), "Stored package scores");
        Ok(())
    }
}

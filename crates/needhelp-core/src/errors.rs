//! Error types for the needhelp core library.

/// Top-level error enum for the needhelp core library.
#[derive(Debug, thiserror::Error)]
pub enum NeedHelpError {
    #[error("Record source error: {0}")]
    Source(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Malformed record at line {line}: {message}")]
    Record { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(feature = "python")]
impl From<NeedHelpError> for pyo3::PyErr {
    fn from(err: NeedHelpError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
        match &err {
            NeedHelpError::Source(_) | NeedHelpError::Io(_) => PyIOError::new_err(err.to_string()),
            NeedHelpError::Sink(_) | NeedHelpError::Sqlite(_) | NeedHelpError::Csv(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
            NeedHelpError::Record { .. } | NeedHelpError::Json(_) => {
                PyValueError::new_err(err.to_string())
            }
        }
    }
}

pub type NeedHelpResult<T> = Result<T, NeedHelpError>;

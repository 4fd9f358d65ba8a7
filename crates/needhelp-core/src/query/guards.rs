//! Shared guardrails for pipeline bounds.

/// Canonical top-K bound for the popularity branch.
pub const TOPN: usize = 1000;
pub const MAX_TOPN: usize = 1_000_000;

pub const DEFAULT_WORKERS: usize = 4;
pub const MAX_WORKERS: usize = 256;

/// Record cap applied when running against a local corpus sample.
pub const LOCAL_RECORD_LIMIT: usize = 3000;

#[cfg_attr(feature = "python", pyo3::pyfunction)]
pub fn clamp_int(value: i64, minimum: i64, maximum: i64) -> i64 {
    value.max(minimum).min(maximum)
}

#[cfg_attr(feature = "python", pyo3::pyfunction)]
pub fn clamp_top_n(value: i64) -> usize {
    clamp_int(value, 0, MAX_TOPN as i64) as usize
}

#[cfg_attr(feature = "python", pyo3::pyfunction)]
pub fn clamp_workers(value: i64) -> usize {
    clamp_int(value, 1, MAX_WORKERS as i64) as usize
}

/// Non-positive limits mean "no limit".
pub fn normalize_record_limit(value: Option<i64>) -> Option<usize> {
    value.filter(|v| *v > 0).map(|v| v as usize)
}

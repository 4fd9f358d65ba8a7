//! Pipeline configuration: defaults, the local-sample preset, and env overrides.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::query::guards::{
    clamp_top_n, clamp_workers, normalize_record_limit, DEFAULT_WORKERS, LOCAL_RECORD_LIMIT, TOPN,
};

pub const ENV_TOPN: &str = "NEEDHELP_TOPN";
pub const ENV_WORKERS: &str = "NEEDHELP_WORKERS";
pub const ENV_RECORD_LIMIT: &str = "NEEDHELP_RECORD_LIMIT";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of popular packages carried into the join.
    pub top_n: usize,
    /// Size of the rayon pool used for extraction and aggregation.
    pub workers: usize,
    /// Cap on records read from the source. `None` reads everything.
    pub record_limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: TOPN,
            workers: DEFAULT_WORKERS,
            record_limit: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults with the record cap used for local sample runs.
    pub fn local() -> Self {
        Self {
            record_limit: Some(LOCAL_RECORD_LIMIT),
            ..Self::default()
        }
    }

    pub fn with_top_n(mut self, top_n: i64) -> Self {
        self.top_n = clamp_top_n(top_n);
        self
    }

    pub fn with_workers(mut self, workers: i64) -> Self {
        self.workers = clamp_workers(workers);
        self
    }

    pub fn with_record_limit(mut self, limit: Option<i64>) -> Self {
        self.record_limit = normalize_record_limit(limit);
        self
    }

    /// Defaults overridden by `NEEDHELP_TOPN`, `NEEDHELP_WORKERS` and
    /// `NEEDHELP_RECORD_LIMIT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable lookup.
    /// Unparseable values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| -> Option<i64> {
            let raw = lookup(key)?;
            match raw.trim().parse::<i64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring {key}={raw:?}: not an integer");
                    None
                }
            }
        };

        let mut config = Self::default();
        if let Some(top_n) = read(ENV_TOPN) {
            config = config.with_top_n(top_n);
        }
        if let Some(workers) = read(ENV_WORKERS) {
            config = config.with_workers(workers);
        }
        if let Some(limit) = read(ENV_RECORD_LIMIT) {
            config = config.with_record_limit(Some(limit));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_n, 1000);
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.record_limit, None);
    }

    #[test]
    fn test_local_preset_limits_records() {
        assert_eq!(PipelineConfig::local().record_limit, Some(3000));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (ENV_TOPN, "25"),
            (ENV_WORKERS, " 2 "),
            (ENV_RECORD_LIMIT, "100"),
        ]));
        assert_eq!(
            config,
            PipelineConfig {
                top_n: 25,
                workers: 2,
                record_limit: Some(100),
            }
        );
    }

    #[test]
    fn test_from_lookup_ignores_garbage_and_clamps() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (ENV_TOPN, "lots"),
            (ENV_WORKERS, "0"),
            (ENV_RECORD_LIMIT, "-1"),
        ]));
        assert_eq!(config.top_n, TOPN);
        assert_eq!(config.workers, 1);
        assert_eq!(config.record_limit, None);
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        assert_eq!(
            PipelineConfig::from_lookup(|_| None),
            PipelineConfig::default()
        );
    }
}

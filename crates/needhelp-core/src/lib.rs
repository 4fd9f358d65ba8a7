//! needhelp core library: ranks source packages that are both widely imported
//! and full of FIXME/TODO markers.
//!
//! Records (one source file each) feed two independent branches. The
//! popularity branch counts `import` declarations per package prefix and keeps
//! the top K; the needs-help branch counts marker lines per declared package.
//! The branches are joined into `ln(help) * ln(popularity)` scores and handed
//! to a sink. With the `python` feature the crate also builds the
//! `_needhelp_core` extension module.

pub mod config;
pub mod errors;
pub mod indexer;
pub mod models;
pub mod query;
pub mod store;

#[cfg(feature = "python")]
mod python;

pub use config::PipelineConfig;
pub use errors::{NeedHelpError, NeedHelpResult};
pub use indexer::pipeline::{run_pipeline, score_records, PipelineOutput};
pub use models::{CountPair, PipelineStats, Record, ScoredPackage};

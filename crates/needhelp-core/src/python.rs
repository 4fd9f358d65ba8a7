//! Python extension module `_needhelp_core`.

use pyo3::prelude::*;
use pyo3::types::PyDict;
use pyo3::wrap_pyfunction;

use crate::config::PipelineConfig;
use crate::indexer::filesystem::DirectorySource;
use crate::indexer::pipeline::{run_pipeline, score_records};
use crate::indexer::qualifier;
use crate::models::Record;
use crate::query::guards;
use crate::store::sink::CsvSink;

#[pyfunction]
pub fn split_package_name(package_name: &str) -> Vec<String> {
    qualifier::split_package_name(package_name)
}

/// Score a batch of file contents; `None` entries count as empty records.
#[pyfunction]
#[pyo3(signature = (contents, top_n=1000, workers=4))]
pub fn score_contents(
    py: Python<'_>,
    contents: Vec<Option<String>>,
    top_n: i64,
    workers: i64,
) -> Vec<(String, f64)> {
    let records: Vec<Record> = contents
        .into_iter()
        .map(|content| Record { content })
        .collect();
    let config = PipelineConfig::default()
        .with_top_n(top_n)
        .with_workers(workers);
    let output = py.allow_threads(|| score_records(&records, &config));
    output
        .scores
        .into_iter()
        .map(|scored| (scored.package, scored.score))
        .collect()
}

/// Score every `.java` file under `root` and write `package,score` rows to
/// `output_csv`. Returns the run statistics.
#[pyfunction]
#[pyo3(signature = (root, output_csv, top_n=1000, workers=4, record_limit=None))]
pub fn score_directory(
    py: Python<'_>,
    root: &str,
    output_csv: &str,
    top_n: i64,
    workers: i64,
    record_limit: Option<i64>,
) -> PyResult<PyObject> {
    let config = PipelineConfig::default()
        .with_top_n(top_n)
        .with_workers(workers)
        .with_record_limit(record_limit);
    let mut source = DirectorySource::new(root);
    let mut sink = CsvSink::create(output_csv)?;
    let stats = py.allow_threads(|| run_pipeline(&mut source, &mut sink, &config))?;

    let result = PyDict::new(py);
    result.set_item("records_read", stats.records_read)?;
    result.set_item("popular_packages", stats.popular_packages)?;
    result.set_item("top_packages", stats.top_packages)?;
    result.set_item("help_packages", stats.help_packages)?;
    result.set_item("scored_packages", stats.scored_packages)?;
    result.set_item("elapsed_ms", stats.elapsed_ms)?;
    Ok(result.into())
}

#[pymodule]
fn _needhelp_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("TOPN", guards::TOPN)?;
    m.add("LOCAL_RECORD_LIMIT", guards::LOCAL_RECORD_LIMIT)?;

    m.add_function(wrap_pyfunction!(guards::clamp_int, m)?)?;
    m.add_function(wrap_pyfunction!(guards::clamp_top_n, m)?)?;
    m.add_function(wrap_pyfunction!(guards::clamp_workers, m)?)?;

    m.add_function(wrap_pyfunction!(split_package_name, m)?)?;
    m.add_function(wrap_pyfunction!(score_contents, m)?)?;
    m.add_function(wrap_pyfunction!(score_directory, m)?)?;

    Ok(())
}

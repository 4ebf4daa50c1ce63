//! Python bindings that expose the targeted analysis engine via PyO3.
use std::sync::Arc;

use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    prelude::*,
    types::PyModule,
};

use crate::genomics::{align, Analyzer, KnowledgeBase, ScoringScheme, Sequence};

/// Python-facing handle holding a loaded catalog.
#[pyclass]
#[derive(Debug)]
pub struct PyTraitAnalyzer {
    analyzer: Analyzer,
}

#[pymethods]
impl PyTraitAnalyzer {
    #[new]
    #[pyo3(signature = (catalog_path=None))]
    /// Load the catalog from `catalog_path`, or use the built-in one.
    pub fn new(catalog_path: Option<String>) -> PyResult<Self> {
        let kb = match catalog_path {
            Some(path) => KnowledgeBase::from_path(path),
            None => KnowledgeBase::builtin(),
        }
        .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;
        Ok(Self {
            analyzer: Analyzer::with_defaults(Arc::new(kb)),
        })
    }

    /// List `(trait, gene)` pairs available for analysis.
    pub fn list_traits(&self) -> Vec<(String, String)> {
        self.analyzer
            .knowledge_base()
            .available_traits()
            .into_iter()
            .map(|record| (record.trait_name.clone(), record.gene.clone()))
            .collect()
    }

    /// Globally align two sequences.
    ///
    /// Returns:
    ///     `(score, aligned_query, aligned_reference, match_percentage)`.
    pub fn align(&self, query: &str, reference: &str) -> PyResult<(i32, String, String, f64)> {
        let query = parse(query)?;
        let reference = parse(reference)?;
        let result = align(
            query.as_bytes(),
            reference.as_bytes(),
            &ScoringScheme::default(),
        );
        Ok((
            result.score,
            result.aligned_query,
            result.aligned_reference,
            result.match_percentage,
        ))
    }

    /// Run a targeted analysis.
    ///
    /// Returns:
    ///     `(outcome, report_json)` where `outcome` is one of `matched`,
    ///     `no-entry` or `low-confidence`.
    pub fn analyze(&self, sequence: &str, trait_name: &str, gene: &str) -> PyResult<(String, String)> {
        let sequence = parse(sequence)?;
        let outcome = self
            .analyzer
            .analyze(&sequence, trait_name, gene)
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        let label = outcome.label().to_string();
        let json = serde_json::to_string(outcome.report())
            .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;
        Ok((label, json))
    }
}

fn parse(text: &str) -> PyResult<Sequence> {
    Sequence::parse(text).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Create Python module.
#[pymodule]
pub fn traitseq_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTraitAnalyzer>()?;
    Ok(())
}

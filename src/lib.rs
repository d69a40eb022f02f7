// src/lib.rs

//! # Graph Rank Engine - Rust Core FFI Boundary
//!
//! **Layer:** API / FFI Boundary
//! **Status:** Normative — Strict Mathematical Execution Environment
//!
//! Exposes the batch knowledge-graph ranking pipeline (stake-weighted rank,
//! entropy, light, karma) to Python via PyO3 and rust-numpy.
//!
//! ## Architectural Guarantees:
//! 1. **Zero-Copy Memory**: incoming NumPy arrays are memory-mapped as
//!    contiguous slices. No duplication occurs across the FFI boundary.
//! 2. **GIL Independence**: the nine-stage pipeline unconditionally releases
//!    the Global Interpreter Lock and is distributed across all available
//!    logical cores via `rayon`.
//! 3. **Mathematical Determinism**: a `deterministic` flag forces strictly
//!    ordered sequential karma accumulation, disabling the work-stealing
//!    partial-sum-merge path.
//! 4. **Panic-Free Safety**: every precondition violation, resource ceiling
//!    breach, and numerical degeneracy is trapped and promoted to a Python
//!    `ValueError` or `RuntimeError` before any scratch is allocated.

use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

pub mod compress;
pub mod config;
pub mod edge_weight;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod graph;
pub mod light_karma;
pub mod prefix_sum;
pub mod rank;
pub mod stake;
pub mod stationary;

pub use config::EngineConfig;
pub use error::EngineError;

use engine::GraphRankEngine;
use graph::RawGraph;

/// Macro to securely project flat NumPy arrays into zero-copy, C-contiguous Rust slices.
macro_rules! extract_slice {
    ($array:expr, $name:expr) => {
        $array.as_slice().map_err(|_| {
            PyValueError::new_err(format!(
                "FFI Ingress Violation: Array '{}' is not C-contiguous in memory.",
                $name
            ))
        })?
    };
}

/// Validates tensor dimensionality parity across heterogenous arrays.
#[inline(always)]
fn enforce_equal_lengths(lengths: &[usize]) -> PyResult<usize> {
    if lengths.is_empty() {
        return Ok(0);
    }
    let baseline = lengths[0];
    for &len in lengths.iter().skip(1) {
        if len != baseline {
            return Err(PyValueError::new_err(format!(
                "Dimensionality Violation: Input arrays must have identical lengths. Expected {}, Found {}.",
                baseline, len
            )));
        }
    }
    Ok(baseline)
}

/// Maps an [`EngineError`] to the appropriate Python exception class:
/// `PreconditionViolation`/`NumericalDegeneracy` as `ValueError`,
/// `ResourceExhaustion` as `RuntimeError`.
fn engine_error_to_py(err: EngineError) -> PyErr {
    if err.is_resource_exhaustion() {
        PyRuntimeError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

/// Runs the full nine-stage graph rank pipeline over a batch knowledge
/// graph expressed as dual CSR adjacency arrays.
///
/// **Implements:** SPEC-GRAPH-RANK Section 4 (full pipeline), Section 6 (FFI)
#[pyfunction]
#[pyo3(signature = (
    stakes, out_count, in_count, out_target, out_author, in_source, in_author,
    damping_factor, tolerance, deterministic=false
))]
#[allow(clippy::too_many_arguments)]
pub fn compute_graph_rank_py<'py>(
    py: Python<'py>,
    stakes: PyReadonlyArray1<'py, u64>,
    out_count: PyReadonlyArray1<'py, u32>,
    in_count: PyReadonlyArray1<'py, u32>,
    out_target: PyReadonlyArray1<'py, u64>,
    out_author: PyReadonlyArray1<'py, u64>,
    in_source: PyReadonlyArray1<'py, u64>,
    in_author: PyReadonlyArray1<'py, u64>,
    damping_factor: f64,
    tolerance: f64,
    deterministic: bool,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>, &'py PyArray1<f64>, &'py PyArray1<f64>, PyObject)> {
    let stakes_slice = extract_slice!(stakes, "stakes");
    let out_count_slice = extract_slice!(out_count, "outCount");
    let in_count_slice = extract_slice!(in_count, "inCount");
    let out_target_slice = extract_slice!(out_target, "outTarget");
    let out_author_slice = extract_slice!(out_author, "outAuthor");
    let in_source_slice = extract_slice!(in_source, "inSource");
    let in_author_slice = extract_slice!(in_author, "inAuthor");

    let num_users = stakes_slice.len();
    let num_nodes = enforce_equal_lengths(&[out_count_slice.len(), in_count_slice.len()])?;
    let num_edges = enforce_equal_lengths(&[
        out_target_slice.len(),
        out_author_slice.len(),
        in_source_slice.len(),
        in_author_slice.len(),
    ])?;

    let graph = RawGraph {
        num_users,
        num_nodes,
        num_edges,
        stakes: stakes_slice,
        out_count: out_count_slice,
        in_count: in_count_slice,
        out_target: out_target_slice,
        out_author: out_author_slice,
        in_source: in_source_slice,
        in_author: in_author_slice,
    };

    let engine = GraphRankEngine::new(EngineConfig::default());

    let output = py
        .allow_threads(|| engine.run(&graph, damping_factor, tolerance, deterministic))
        .map_err(engine_error_to_py)?;

    let report = PyDict::new(py);
    report.set_item("iterations", output.report.iterations)?;
    report.set_item("final_delta", output.report.final_delta)?;
    report.set_item("converged", output.report.converged)?;
    report.set_item("dangling_count", output.report.dangling_count)?;

    Ok((
        output.rank.into_pyarray(py),
        output.entropy.into_pyarray(py),
        output.light.into_pyarray(py),
        output.karma.into_pyarray(py),
        report.into(),
    ))
}

/// Loads an [`EngineConfig`] from a TOML file and exposes its tunables as a
/// Python dict, for callers that want to inspect or override defaults
/// before invoking [`compute_graph_rank_py`].
#[pyfunction]
pub fn load_engine_config_py(py: Python, path: String) -> PyResult<PyObject> {
    let config = EngineConfig::load_from_toml(std::path::Path::new(&path))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let dict = PyDict::new(py);
    dict.set_item("max_iterations", config.max_iterations)?;
    dict.set_item("max_scratch_bytes", config.max_scratch_bytes)?;
    dict.set_item("default_damping_factor", config.default_damping_factor)?;
    dict.set_item("default_tolerance", config.default_tolerance)?;
    dict.set_item("default_deterministic_karma", config.default_deterministic_karma)?;
    Ok(dict.into())
}

// ============================================================================
// MODULE EXPORT REGISTRY
// ============================================================================

/// The Graph Rank Engine - Rust Core Python Extension
#[pymodule]
fn graphrank_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_graph_rank_py, m)?)?;
    m.add_function(wrap_pyfunction!(load_engine_config_py, m)?)?;
    Ok(())
}

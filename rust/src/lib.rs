//! CPU-scheduling simulator.
//!
//! Runs a fully known batch of processes through one of five classical
//! disciplines (FCFS, SPN, static Priority, Round-Robin, predictive SRT) and
//! reports per-process timings plus averaged wait, turnaround and response.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod config;
pub mod engine;
pub mod logging;
pub mod metrics;
mod models;
pub mod ordering;
pub mod prediction;
pub mod report;
pub mod workload;

pub use config::{SimulationConfig, DEFAULT_INITIAL_PREDICTION};
pub use engine::{simulate, Policy, PolicyEngine, SimulationError, Stepping};
pub use models::{Averages, ProcessRecord, ProcessSpec, SimulationResult, TimingRow};
pub use workload::{parse_workload, ParseError};

/// Simulate a scheduling policy over a batch of processes.
///
/// # Arguments
/// * `policy` - Policy name: "FCFS", "SJF" (or "SPN"), "Priority", "RR" or "SRT"
/// * `processes` - Workload rows, in any order
/// * `config` - Quantum (RR), alpha (SRT), stepping mode and verbosity
///
/// # Returns
/// * SimulationResult with records, completion sequence, canonical rows and averages
///
/// # Raises
/// * ValueError if the policy is unknown, a parameter is missing or out of
///   range, or the workload is invalid
#[pyfunction]
#[pyo3(name = "simulate", signature = (policy, processes, config=None))]
fn py_simulate(
    policy: &str,
    processes: Vec<ProcessSpec>,
    config: Option<SimulationConfig>,
) -> PyResult<SimulationResult> {
    let config = config.unwrap_or_default();
    let result = policy
        .parse::<Policy>()
        .and_then(|policy| simulate(policy, &processes, &config));

    match result {
        Ok(result) => Ok(result),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Parse a workload listing: a header line, then `pid,arrival,first_response,burst` rows.
///
/// # Raises
/// * ValueError with the offending line number on malformed rows
#[pyfunction]
#[pyo3(name = "parse_workload")]
fn py_parse_workload(text: &str) -> PyResult<Vec<ProcessSpec>> {
    parse_workload(text).map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Render the sequence line, timing table and averages as text.
#[pyfunction]
#[pyo3(name = "render_report")]
fn py_render_report(result: &SimulationResult) -> String {
    report::render_report(result)
}

/// The cpusched Python module.
#[pymodule]
fn cpusched(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Data types
    m.add_class::<ProcessSpec>()?;
    m.add_class::<ProcessRecord>()?;
    m.add_class::<TimingRow>()?;
    m.add_class::<Averages>()?;
    m.add_class::<SimulationResult>()?;

    // Config
    m.add_class::<SimulationConfig>()?;

    // Simulation and reporting
    m.add_function(wrap_pyfunction!(py_simulate, m)?)?;
    m.add_function(wrap_pyfunction!(py_parse_workload, m)?)?;
    m.add_function(wrap_pyfunction!(py_render_report, m)?)?;

    Ok(())
}

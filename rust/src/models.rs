//! Core data types for the scheduling simulator.

use pyo3::prelude::*;
use std::collections::HashMap;

// Note: We use std HashMap here for PyO3 interface compatibility

/// One row of the input workload.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessSpec {
    #[pyo3(get, set)]
    pub id: u32,
    #[pyo3(get, set)]
    pub arrival_time: i64,
    /// Delay between dispatch and the first observable output.
    #[pyo3(get, set)]
    pub time_until_first_response: i64,
    #[pyo3(get, set)]
    pub burst_time: i64,
}

impl ProcessSpec {
    pub fn new(id: u32, arrival_time: i64, time_until_first_response: i64, burst_time: i64) -> Self {
        Self {
            id,
            arrival_time,
            time_until_first_response,
            burst_time,
        }
    }
}

#[pymethods]
impl ProcessSpec {
    /// `ProcessSpec(id, arrival_time, burst_time, *, time_until_first_response=0)`.
    ///
    /// The offset is keyword-only: a workload row lists it before the burst,
    /// so a positional fourth argument would be ambiguous.
    #[new]
    #[pyo3(signature = (id, arrival_time, burst_time, *, time_until_first_response=0))]
    fn py_new(id: u32, arrival_time: i64, burst_time: i64, time_until_first_response: i64) -> Self {
        Self::new(id, arrival_time, time_until_first_response, burst_time)
    }

    fn __repr__(&self) -> String {
        format!(
            "ProcessSpec(id={}, arrival={}, burst={}, first_response={})",
            self.id, self.arrival_time, self.burst_time, self.time_until_first_response
        )
    }
}

/// Simulation state of one workload row.
///
/// A single type serves every policy; fields that only one engine uses
/// (`priority`, the prediction pair, `first_response`) stay at their
/// neutral value elsewhere. Records are owned and mutated by exactly one
/// engine during a run and are read-only once `completed` is set.
#[pyclass(get_all)]
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub id: u32,
    pub arrival_time: i64,
    pub burst_time: i64,
    pub remaining_time: i64,
    /// Clock value at first dispatch; `None` until then.
    pub start_time: Option<i64>,
    pub finish_time: Option<i64>,
    pub waiting_time: i64,
    pub turnaround_time: i64,
    /// Raw, policy-specific response value (see `metrics`).
    pub response_time: Option<i64>,
    pub time_until_first_response: i64,
    /// Static priority, lower runs first (Priority engine only).
    pub priority: Option<f64>,
    /// Smoothed burst estimate (SRT only).
    pub predicted_burst: Option<f64>,
    /// Estimate of remaining service (SRT only).
    pub predicted_remaining_time: Option<f64>,
    pub completed: bool,
    /// Whether the response latch has fired (Round-Robin only).
    pub first_response: bool,
}

impl ProcessRecord {
    /// Fresh record for an input row.
    pub fn from_spec(spec: &ProcessSpec) -> Self {
        Self {
            id: spec.id,
            arrival_time: spec.arrival_time,
            burst_time: spec.burst_time,
            remaining_time: spec.burst_time,
            start_time: None,
            finish_time: None,
            waiting_time: 0,
            turnaround_time: 0,
            response_time: None,
            time_until_first_response: spec.time_until_first_response,
            priority: None,
            predicted_burst: None,
            predicted_remaining_time: None,
            completed: false,
            first_response: false,
        }
    }

    /// Arrived and still needs CPU time.
    #[inline]
    pub fn is_ready(&self, clock: i64) -> bool {
        !self.completed && self.arrival_time <= clock
    }

    /// CPU time consumed so far.
    #[inline]
    pub fn elapsed(&self) -> i64 {
        self.burst_time - self.remaining_time
    }

    /// Latch `start_time` on the first dispatch. Returns true if this was it.
    pub fn dispatch(&mut self, clock: i64) -> bool {
        if self.start_time.is_some() {
            return false;
        }
        self.start_time = Some(clock);
        true
    }

    /// Consume `units` of CPU time.
    pub fn run_for(&mut self, units: i64) {
        debug_assert!(units > 0 && units <= self.remaining_time);
        self.remaining_time -= units;
    }

    /// Mark finished at `clock` and derive turnaround and waiting time.
    pub fn complete(&mut self, clock: i64) {
        debug_assert!(!self.completed, "process {} completed twice", self.id);
        self.remaining_time = 0;
        self.finish_time = Some(clock);
        self.turnaround_time = clock - self.arrival_time;
        self.waiting_time = self.turnaround_time - self.burst_time;
        self.completed = true;
    }
}

#[pymethods]
impl ProcessRecord {
    fn __repr__(&self) -> String {
        format!(
            "ProcessRecord(id={}, arrival={}, burst={}, start={:?}, finish={:?}, completed={})",
            self.id,
            self.arrival_time,
            self.burst_time,
            self.start_time,
            self.finish_time,
            self.completed
        )
    }
}

/// Canonical timing row for one id, merged over all rows sharing that id.
#[pyclass(get_all)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingRow {
    pub id: u32,
    pub arrival: i64,
    pub burst: i64,
    pub start: i64,
    pub finish: i64,
    pub wait: i64,
    pub turnaround: i64,
    pub response: i64,
}

#[pymethods]
impl TimingRow {
    fn __repr__(&self) -> String {
        format!(
            "TimingRow(id={}, wait={}, turnaround={}, response={})",
            self.id, self.wait, self.turnaround, self.response
        )
    }
}

/// Mean wait, turnaround and response over all distinct ids.
#[pyclass(get_all)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Averages {
    pub waiting_time: f64,
    pub turnaround_time: f64,
    pub response_time: f64,
}

#[pymethods]
impl Averages {
    fn __repr__(&self) -> String {
        format!(
            "Averages(waiting={:.2}, turnaround={:.2}, response={:.2})",
            self.waiting_time, self.turnaround_time, self.response_time
        )
    }
}

/// Everything a single simulation run produces.
#[pyclass(get_all)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationResult {
    /// Completed records in arrival order.
    pub records: Vec<ProcessRecord>,
    /// Ids in completion order.
    pub sequence: Vec<u32>,
    /// One canonical row per distinct id, ascending by id.
    pub rows: Vec<TimingRow>,
    pub averages: Averages,
    /// Per-id burst predictions after the run (SRT only, empty otherwise).
    pub predictions: HashMap<u32, f64>,
    pub metadata: HashMap<String, String>,
}

#[pymethods]
impl SimulationResult {
    fn __repr__(&self) -> String {
        format!(
            "SimulationResult(policy={:?}, processes={}, sequence={:?})",
            self.metadata.get("policy").map(String::as_str).unwrap_or(""),
            self.records.len(),
            self.sequence
        )
    }
}

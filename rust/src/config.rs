//! Configuration types for the simulator.

use pyo3::prelude::*;
use std::collections::HashMap;

/// Burst estimate a process starts with under SRT when nothing better is known.
pub const DEFAULT_INITIAL_PREDICTION: f64 = 10.0;

/// Parameters shared by all policy engines.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Round-Robin time slice (required for RR, must be > 0)
    #[pyo3(get, set)]
    pub quantum: Option<i64>,
    /// Exponential averaging weight for SRT (required for SRT, 0 <= alpha <= 1)
    #[pyo3(get, set)]
    pub alpha: Option<f64>,
    /// Seed burst estimate for SRT
    #[pyo3(get, set)]
    pub initial_prediction: f64,
    /// Per-id estimates carried over from an earlier SRT run
    #[pyo3(get, set)]
    pub seed_predictions: HashMap<u32, f64>,
    /// Jump between decision points instead of stepping one tick at a time
    #[pyo3(get, set)]
    pub event_driven: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            quantum: None,
            alpha: None,
            initial_prediction: DEFAULT_INITIAL_PREDICTION,
            seed_predictions: HashMap::new(),
            event_driven: true,
            verbosity: 0,
        }
    }
}

impl SimulationConfig {
    pub fn with_quantum(quantum: i64) -> Self {
        Self {
            quantum: Some(quantum),
            ..Self::default()
        }
    }

    pub fn with_alpha(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            ..Self::default()
        }
    }

    /// Name of the stepping mode, as recorded in result metadata.
    pub fn stepping(&self) -> &'static str {
        if self.event_driven {
            "event"
        } else {
            "tick"
        }
    }
}

#[pymethods]
impl SimulationConfig {
    #[new]
    #[pyo3(signature = (
        quantum=None,
        alpha=None,
        initial_prediction=None,
        seed_predictions=None,
        event_driven=None,
        verbosity=None
    ))]
    fn new(
        quantum: Option<i64>,
        alpha: Option<f64>,
        initial_prediction: Option<f64>,
        seed_predictions: Option<HashMap<u32, f64>>,
        event_driven: Option<bool>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            quantum,
            alpha,
            initial_prediction: initial_prediction.unwrap_or(defaults.initial_prediction),
            seed_predictions: seed_predictions.unwrap_or(defaults.seed_predictions),
            event_driven: event_driven.unwrap_or(defaults.event_driven),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationConfig(quantum={:?}, alpha={:?}, initial_prediction={}, stepping={:?})",
            self.quantum,
            self.alpha,
            self.initial_prediction,
            self.stepping()
        )
    }
}

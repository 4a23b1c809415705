//! Per-id burst prediction by exponential averaging.
//!
//! Predictions belong to a process id, not to a single occurrence of it.
//! When an occurrence completes, its smoothed estimate is stored under the
//! id; later occurrences of that id start from it instead of the global seed.

use rustc_hash::FxHashMap;
use std::collections::HashMap;

/// tau_next = alpha * actual + (1 - alpha) * previous
#[inline]
pub fn exponential_average(alpha: f64, actual_burst: i64, previous: f64) -> f64 {
    alpha * actual_burst as f64 + (1.0 - alpha) * previous
}

/// Learned burst estimates keyed by process id.
#[derive(Debug, Clone)]
pub struct PredictionStore {
    initial: f64,
    learned: FxHashMap<u32, f64>,
}

impl PredictionStore {
    /// Store with a global seed and optional per-id estimates from an earlier run.
    pub fn new(initial: f64, seeds: &HashMap<u32, f64>) -> Self {
        Self {
            initial,
            learned: seeds.iter().map(|(&id, &tau)| (id, tau)).collect(),
        }
    }

    /// Current estimate for `id`, falling back to the global seed.
    pub fn estimate(&self, id: u32) -> f64 {
        self.learned.get(&id).copied().unwrap_or(self.initial)
    }

    /// Fold an observed burst into the estimate for `id`. Returns the new estimate.
    pub fn observe(&mut self, id: u32, alpha: f64, actual_burst: i64, previous: f64) -> f64 {
        let tau = exponential_average(alpha, actual_burst, previous);
        self.learned.insert(id, tau);
        tau
    }

    /// Snapshot for the Python interface and result reporting.
    pub fn to_map(&self) -> HashMap<u32, f64> {
        // Convert FxHashMap to std HashMap for Python interface
        self.learned.iter().map(|(&id, &tau)| (id, tau)).collect()
    }
}

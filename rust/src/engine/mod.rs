//! Policy engines and the simulation entry point.
//!
//! Each engine consumes records that already went through the ordering pass,
//! drives its own simulated clock to completion of every record, and returns
//! the ids in completion order. [`simulate`] wires validation, the ordering
//! pass, the chosen engine and the metrics aggregator together.

mod fcfs;
mod priority;
mod round_robin;
mod spn;
mod srt;

pub use fcfs::FcfsEngine;
pub use priority::PriorityEngine;
pub use round_robin::RoundRobinEngine;
pub use spn::SpnEngine;
pub use srt::SrtEngine;

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::metrics::aggregate;
use crate::models::{ProcessRecord, ProcessSpec, SimulationResult};
use crate::ordering::next_arrival_after;
use crate::workload::{prepare, ParseError};

/// Errors that can occur before or during a simulation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid workload: {0}")]
    InvalidWorkload(String),
    #[error("Unsupported scheduling policy: {0}")]
    UnsupportedPolicy(String),
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<ParseError> for SimulationError {
    fn from(err: ParseError) -> Self {
        SimulationError::InvalidWorkload(err.to_string())
    }
}

/// Scheduling discipline to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Fcfs,
    Spn,
    Priority,
    RoundRobin,
    Srt,
}

impl Policy {
    pub const ALL: [Policy; 5] = [
        Policy::Fcfs,
        Policy::Spn,
        Policy::Priority,
        Policy::RoundRobin,
        Policy::Srt,
    ];

    /// Canonical short name.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Spn => "SJF",
            Policy::Priority => "Priority",
            Policy::RoundRobin => "RR",
            Policy::Srt => "SRT",
        }
    }

    /// Build the engine for this policy, checking the parameters it needs.
    pub fn engine(self, config: &SimulationConfig) -> Result<Box<dyn PolicyEngine>, SimulationError> {
        let stepping = Stepping::from_config(config);
        let verbosity = config.verbosity;

        Ok(match self {
            Policy::Fcfs => Box::new(FcfsEngine::new(verbosity)),
            Policy::Spn => Box::new(SpnEngine::new(stepping, verbosity)),
            Policy::Priority => Box::new(PriorityEngine::new(stepping, verbosity)),
            Policy::RoundRobin => {
                let quantum = config
                    .quantum
                    .ok_or(SimulationError::MissingParameter("quantum"))?;
                if quantum <= 0 {
                    return Err(SimulationError::InvalidParameter(format!(
                        "quantum must be positive, got {}",
                        quantum
                    )));
                }
                Box::new(RoundRobinEngine::new(quantum, stepping, verbosity))
            }
            Policy::Srt => {
                let alpha = config
                    .alpha
                    .ok_or(SimulationError::MissingParameter("alpha"))?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(SimulationError::InvalidParameter(format!(
                        "alpha must be within [0, 1], got {}",
                        alpha
                    )));
                }
                if !config.initial_prediction.is_finite() {
                    return Err(SimulationError::InvalidParameter(format!(
                        "initial prediction must be finite, got {}",
                        config.initial_prediction
                    )));
                }
                if let Some((id, tau)) = config
                    .seed_predictions
                    .iter()
                    .find(|(_, tau)| !tau.is_finite())
                {
                    return Err(SimulationError::InvalidParameter(format!(
                        "seed prediction for process {} must be finite, got {}",
                        id, tau
                    )));
                }
                Box::new(SrtEngine::new(
                    alpha,
                    config.initial_prediction,
                    &config.seed_predictions,
                    stepping,
                    verbosity,
                ))
            }
        })
    }
}

impl FromStr for Policy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Policy::Fcfs),
            "SJF" | "SPN" => Ok(Policy::Spn),
            "PRIORITY" => Ok(Policy::Priority),
            "RR" => Ok(Policy::RoundRobin),
            "SRT" => Ok(Policy::Srt),
            _ => Err(SimulationError::UnsupportedPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How an engine moves its clock between decision points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stepping {
    /// One time unit per iteration.
    Tick,
    /// Straight to the next point where a decision can change.
    Event,
}

impl Stepping {
    pub fn from_config(config: &SimulationConfig) -> Self {
        if config.event_driven {
            Stepping::Event
        } else {
            Stepping::Tick
        }
    }

    /// New clock value when no record is ready at `clock`.
    ///
    /// `Tick` advances by one unit and lets the caller re-scan; `Event`
    /// jumps to the next arrival, which is the first instant a re-scan could
    /// find something.
    pub fn idle(self, records: &[ProcessRecord], clock: i64) -> i64 {
        match self {
            Stepping::Tick => clock + 1,
            Stepping::Event => next_arrival_after(records, clock).unwrap_or(clock + 1),
        }
    }
}

/// A scheduling discipline over a fully known, arrival-ordered batch.
pub trait PolicyEngine {
    /// Canonical policy name.
    fn name(&self) -> &'static str;

    /// Run every record to completion. Returns ids in completion order.
    fn run(&mut self, records: &mut [ProcessRecord]) -> Vec<u32>;

    /// Per-id burst predictions learned during the run.
    fn predictions(&self) -> HashMap<u32, f64> {
        HashMap::new()
    }
}

/// Simulate `policy` over `specs`.
///
/// Parameters and workload are validated before the first tick; once the
/// engine starts it always runs to completion.
pub fn simulate(
    policy: Policy,
    specs: &[ProcessSpec],
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    let mut engine = policy.engine(config)?;
    let mut records = prepare(specs)?;

    let sequence = engine.run(&mut records);
    debug_assert_eq!(sequence.len(), records.len());

    let (rows, averages) = aggregate(&records);

    let mut metadata = HashMap::new();
    metadata.insert("policy".to_string(), engine.name().to_string());
    metadata.insert("stepping".to_string(), config.stepping().to_string());
    if let Some(quantum) = config.quantum.filter(|_| policy == Policy::RoundRobin) {
        metadata.insert("quantum".to_string(), quantum.to_string());
    }
    if let Some(alpha) = config.alpha.filter(|_| policy == Policy::Srt) {
        metadata.insert("alpha".to_string(), alpha.to_string());
    }

    Ok(SimulationResult {
        records,
        sequence,
        rows,
        averages,
        predictions: engine.predictions(),
        metadata,
    })
}

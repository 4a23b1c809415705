//! Workload validation, record construction and text parsing.

use crate::engine::SimulationError;
use crate::models::{ProcessRecord, ProcessSpec};
use crate::ordering::order_by_arrival;

/// Errors that can occur while parsing workload text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A data line did not have exactly four comma-separated fields.
    FieldCount { line: usize, found: usize },
    /// A field was not an integer of the expected range.
    InvalidNumber { line: usize, field: &'static str },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount { line, found } => {
                write!(f, "line {}: expected 4 fields, found {}", line, found)
            }
            Self::InvalidNumber { line, field } => {
                write!(f, "line {}: invalid value for {}", line, field)
            }
        }
    }
}

impl std::error::Error for ParseError {}

const FIELD_NAMES: [&str; 4] = ["pid", "arrival", "first_response", "burst"];

/// Parse `pid,arrival,first_response,burst` rows.
///
/// The first line is a header and is skipped. Blank lines are ignored.
pub fn parse_workload(text: &str) -> Result<Vec<ProcessSpec>, ParseError> {
    let mut specs = Vec::new();

    for (index, raw) in text.lines().enumerate().skip(1) {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != FIELD_NAMES.len() {
            return Err(ParseError::FieldCount {
                line,
                found: fields.len(),
            });
        }

        let id = fields[0]
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidNumber {
                line,
                field: FIELD_NAMES[0],
            })?;
        let mut numbers = [0i64; 3];
        for (slot, (value, name)) in numbers
            .iter_mut()
            .zip(fields[1..].iter().zip(&FIELD_NAMES[1..]))
        {
            *slot = value
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidNumber { line, field: *name })?;
        }

        specs.push(ProcessSpec::new(id, numbers[0], numbers[1], numbers[2]));
    }

    Ok(specs)
}

/// Reject rows no engine can simulate.
pub fn validate(specs: &[ProcessSpec]) -> Result<(), SimulationError> {
    for spec in specs {
        if spec.id == 0 {
            return Err(SimulationError::InvalidWorkload(
                "process id must be positive".to_string(),
            ));
        }
        if spec.arrival_time < 0 {
            return Err(SimulationError::InvalidWorkload(format!(
                "process {} has negative arrival time {}",
                spec.id, spec.arrival_time
            )));
        }
        if spec.burst_time <= 0 {
            return Err(SimulationError::InvalidWorkload(format!(
                "process {} has non-positive burst time {}",
                spec.id, spec.burst_time
            )));
        }
        if spec.time_until_first_response < 0 {
            return Err(SimulationError::InvalidWorkload(format!(
                "process {} has negative time until first response {}",
                spec.id, spec.time_until_first_response
            )));
        }
    }
    check_horizon(specs)
}

/// Reject workloads whose clock or metric sums could overflow `i64`.
///
/// The clock never passes the sum of every arrival, burst and offset, and
/// each derived metric is at most twice that, so summing one per row for the
/// averages stays in range when `2 * rows * total` does.
fn check_horizon(specs: &[ProcessSpec]) -> Result<(), SimulationError> {
    let total = specs.iter().try_fold(0i64, |acc, spec| {
        acc.checked_add(spec.arrival_time)?
            .checked_add(spec.burst_time)?
            .checked_add(spec.time_until_first_response)
    });
    let fits = total
        .and_then(|total| total.checked_mul(2))
        .and_then(|total| total.checked_mul(specs.len() as i64));
    if fits.is_none() {
        return Err(SimulationError::InvalidWorkload(
            "arrival, burst and response times are too large to simulate".to_string(),
        ));
    }
    Ok(())
}

/// Validate, build one record per row, and apply the ordering pass.
pub fn prepare(specs: &[ProcessSpec]) -> Result<Vec<ProcessRecord>, SimulationError> {
    validate(specs)?;
    let mut records: Vec<ProcessRecord> = specs.iter().map(ProcessRecord::from_spec).collect();
    order_by_arrival(&mut records);
    Ok(records)
}

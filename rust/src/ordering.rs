//! Ordering pass and ready-set selection.
//!
//! Every engine starts from records sorted by `(arrival_time, id)`. The
//! scanning engines then pick among arrived, unfinished records with a
//! [`SelectionRule`]:
//! - `ShortestBurst`: smallest total burst (SPN)
//! - `HighestPriority`: largest static priority weight (Priority)
//! - `ShortestPredictedRemaining`: smallest forecast of remaining work (SRT)
//!
//! Ties always go to the lowest index, i.e. the earliest arrival and then
//! the smallest id, because the scan only replaces its candidate on a strict
//! improvement.

use std::cmp::Ordering;

use crate::models::ProcessRecord;

/// Sort records by arrival time, then id.
///
/// `sort_by` is stable, so rows sharing both keys keep their input order.
pub fn order_by_arrival(records: &mut [ProcessRecord]) {
    records.sort_by(|a, b| {
        a.arrival_time
            .cmp(&b.arrival_time)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Compare f64 values, treating NaN as equal so a scan never switches on it.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Per-policy strategy for choosing the next process to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    ShortestBurst,
    HighestPriority,
    ShortestPredictedRemaining,
}

impl SelectionRule {
    /// Selection key for a record; lower is dispatched first.
    ///
    /// Fields a policy has not initialized sort last.
    pub fn key(self, record: &ProcessRecord) -> f64 {
        match self {
            Self::ShortestBurst => record.burst_time as f64,
            Self::HighestPriority => record.priority.map_or(f64::INFINITY, |p| -p),
            Self::ShortestPredictedRemaining => {
                record.predicted_remaining_time.unwrap_or(f64::INFINITY)
            }
        }
    }
}

/// Index of the ready record with the smallest key, first index on ties.
///
/// Returns `None` if nothing has arrived by `clock` or everything that has
/// is already complete.
pub fn select_ready(records: &[ProcessRecord], clock: i64, rule: SelectionRule) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, record) in records.iter().enumerate() {
        if !record.is_ready(clock) {
            continue;
        }
        let key = rule.key(record);
        match best {
            Some((_, best_key)) if cmp_f64(key, best_key) != Ordering::Less => {}
            _ => best = Some((index, key)),
        }
    }

    best.map(|(index, _)| index)
}

/// Earliest arrival strictly after `clock` among unfinished records.
///
/// This is the next point at which the ready set can grow.
pub fn next_arrival_after(records: &[ProcessRecord], clock: i64) -> Option<i64> {
    records
        .iter()
        .filter(|r| !r.completed && r.arrival_time > clock)
        .map(|r| r.arrival_time)
        .min()
}

//! Canonical per-id timing rows and averages.
//!
//! A workload may list the same id on several rows. Each row runs as its own
//! execution fragment, and the aggregator folds them back together per id:
//! earliest arrival and start, latest finish, minimum response, summed burst
//! and wait.

use rustc_hash::FxHashMap;

use crate::models::{Averages, ProcessRecord, TimingRow};

/// Running extrema for one id while folding its fragments.
#[derive(Debug, Clone, Copy)]
struct Fold {
    arrival: i64,
    start: i64,
    finish: i64,
    burst: i64,
    wait: i64,
    raw_response: i64,
}

impl Fold {
    fn from_record(record: &ProcessRecord) -> Self {
        let finish = record.finish_time.unwrap_or(record.arrival_time);
        Self {
            arrival: record.arrival_time,
            start: record.start_time.unwrap_or(record.arrival_time),
            finish,
            burst: record.burst_time,
            wait: record.waiting_time,
            raw_response: record.response_time.unwrap_or(finish),
        }
    }

    fn merge(&mut self, other: Fold) {
        self.arrival = self.arrival.min(other.arrival);
        self.start = self.start.min(other.start);
        self.finish = self.finish.max(other.finish);
        self.burst += other.burst;
        self.wait += other.wait;
        self.raw_response = self.raw_response.min(other.raw_response);
    }

    fn into_row(self, id: u32) -> TimingRow {
        TimingRow {
            id,
            arrival: self.arrival,
            burst: self.burst,
            start: self.start,
            finish: self.finish,
            wait: self.wait,
            turnaround: self.finish - self.arrival,
            response: self.raw_response - self.arrival,
        }
    }
}

/// Merge completed records into one row per distinct id, ascending by id.
pub fn canonical_rows(records: &[ProcessRecord]) -> Vec<TimingRow> {
    let mut folds: FxHashMap<u32, Fold> = FxHashMap::default();
    for record in records {
        let fold = Fold::from_record(record);
        folds
            .entry(record.id)
            .and_modify(|existing| existing.merge(fold))
            .or_insert(fold);
    }

    let mut rows: Vec<TimingRow> = folds
        .into_iter()
        .map(|(id, fold)| fold.into_row(id))
        .collect();
    rows.sort_by_key(|row| row.id);
    rows
}

/// Mean wait, turnaround and response over the given canonical rows.
pub fn averages(rows: &[TimingRow]) -> Averages {
    if rows.is_empty() {
        return Averages::default();
    }
    let count = rows.len() as f64;
    let sum = |metric: fn(&TimingRow) -> i64| rows.iter().map(metric).sum::<i64>() as f64;

    Averages {
        waiting_time: sum(|row| row.wait) / count,
        turnaround_time: sum(|row| row.turnaround) / count,
        response_time: sum(|row| row.response) / count,
    }
}

/// Canonical rows plus their averages.
pub fn aggregate(records: &[ProcessRecord]) -> (Vec<TimingRow>, Averages) {
    let rows = canonical_rows(records);
    let averages = averages(&rows);
    (rows, averages)
}

//! Preemptive Shortest-Remaining-Time on predicted, not actual, service time.
//!
//! The scheduler never looks at a process's true burst when choosing. It
//! ranks ready processes by `predicted_remaining_time`, which starts at the
//! id's current estimate and drops by one per tick of service. Completing an
//! occurrence folds its actual burst into the id's estimate, and the new
//! estimate is applied to every occurrence of that id still in flight.

use std::collections::HashMap;

use crate::models::ProcessRecord;
use crate::ordering::{next_arrival_after, select_ready, SelectionRule};
use crate::prediction::PredictionStore;
use crate::{log_changes, log_checks, log_debug};

use super::{PolicyEngine, Stepping};

pub struct SrtEngine {
    alpha: f64,
    store: PredictionStore,
    stepping: Stepping,
    verbosity: u8,
}

impl SrtEngine {
    pub fn new(
        alpha: f64,
        initial_prediction: f64,
        seeds: &HashMap<u32, f64>,
        stepping: Stepping,
        verbosity: u8,
    ) -> Self {
        Self {
            alpha,
            store: PredictionStore::new(initial_prediction, seeds),
            stepping,
            verbosity,
        }
    }

    /// Ticks to run the selected process before the selection can change.
    ///
    /// Between arrivals the running process's prediction only shrinks while
    /// every other prediction stays put, so it keeps winning until it
    /// finishes or a new process shows up.
    fn run_length(&self, records: &[ProcessRecord], index: usize, clock: i64) -> i64 {
        let remaining = records[index].remaining_time;
        match self.stepping {
            Stepping::Tick => 1,
            Stepping::Event => next_arrival_after(records, clock)
                .map_or(remaining, |arrival| remaining.min(arrival - clock)),
        }
    }

    /// Update the estimate for the id of the occurrence that just completed.
    fn learn(&mut self, records: &mut [ProcessRecord], index: usize) {
        let finished = &records[index];
        let id = finished.id;
        let previous = finished.predicted_burst.unwrap_or_else(|| self.store.estimate(id));
        let tau = self
            .store
            .observe(id, self.alpha, finished.burst_time, previous);
        log_debug!(
            self.verbosity,
            "  prediction for {}: {:.3} -> {:.3} (actual={})",
            id,
            previous,
            tau,
            finished.burst_time
        );

        for (i, record) in records.iter_mut().enumerate() {
            if record.id != id || (record.completed && i != index) {
                continue;
            }
            record.predicted_burst = Some(tau);
            record.predicted_remaining_time = Some(tau - record.elapsed() as f64);
        }
    }
}

impl PolicyEngine for SrtEngine {
    fn name(&self) -> &'static str {
        "SRT"
    }

    fn run(&mut self, records: &mut [ProcessRecord]) -> Vec<u32> {
        let verbosity = self.verbosity;
        for record in records.iter_mut() {
            let tau = self.store.estimate(record.id);
            record.predicted_burst = Some(tau);
            record.predicted_remaining_time = Some(tau);
        }

        let mut clock = 0;
        let mut current: Option<usize> = None;
        let mut sequence = Vec::with_capacity(records.len());

        while sequence.len() < records.len() {
            let Some(index) =
                select_ready(records, clock, SelectionRule::ShortestPredictedRemaining)
            else {
                log_checks!(verbosity, "Time {}: nothing ready", clock);
                clock = self.stepping.idle(records, clock);
                continue;
            };

            if current != Some(index) {
                if let Some(previous) = current {
                    log_changes!(
                        verbosity,
                        "Time {}: preempt {} for {}",
                        clock,
                        records[previous].id,
                        records[index].id
                    );
                }
                current = Some(index);
                if records[index].dispatch(clock) {
                    log_changes!(verbosity, "Time {}: first dispatch {}", clock, records[index].id);
                }
            }

            let units = self.run_length(records, index, clock);
            let record = &mut records[index];
            record.run_for(units);
            if let Some(predicted) = record.predicted_remaining_time.as_mut() {
                // One subtraction per tick keeps the float identical to stepping.
                for _ in 0..units {
                    *predicted -= 1.0;
                }
            }
            clock += units;

            if record.remaining_time == 0 {
                record.complete(clock);
                record.response_time = Some(record.waiting_time + record.time_until_first_response);
                log_changes!(verbosity, "Time {}: complete {}", clock, record.id);
                sequence.push(record.id);
                self.learn(records, index);
                current = None;
            }
        }

        sequence
    }

    fn predictions(&self) -> HashMap<u32, f64> {
        self.store.to_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessSpec;
    use crate::workload::prepare;

    fn run_with(
        rows: &[(u32, i64, i64, i64)],
        alpha: f64,
        seeds: &HashMap<u32, f64>,
        stepping: Stepping,
    ) -> (Vec<ProcessRecord>, Vec<u32>, HashMap<u32, f64>) {
        let specs: Vec<ProcessSpec> = rows
            .iter()
            .map(|&(id, arrival, tfr, burst)| ProcessSpec::new(id, arrival, tfr, burst))
            .collect();
        let mut records = prepare(&specs).unwrap();
        let mut engine = SrtEngine::new(alpha, 10.0, seeds, stepping, 0);
        let sequence = engine.run(&mut records);
        (records, sequence, engine.predictions())
    }

    fn run(rows: &[(u32, i64, i64, i64)], alpha: f64) -> (Vec<ProcessRecord>, Vec<u32>, HashMap<u32, f64>) {
        run_with(rows, alpha, &HashMap::new(), Stepping::Tick)
    }

    #[test]
    fn test_alpha_zero_keeps_prediction() {
        let (records, _, predictions) = run(&[(1, 0, 0, 4), (2, 1, 0, 13)], 0.0);
        for record in &records {
            assert_eq!(record.predicted_burst, Some(10.0));
        }
        assert_eq!(predictions.get(&1), Some(&10.0));
        assert_eq!(predictions.get(&2), Some(&10.0));
    }

    #[test]
    fn test_completion_updates_estimate() {
        let (records, _, predictions) = run(&[(1, 0, 0, 4)], 0.5);
        // 0.5 * 4 + 0.5 * 10
        assert_eq!(records[0].predicted_burst, Some(7.0));
        assert_eq!(records[0].predicted_remaining_time, Some(3.0));
        assert_eq!(predictions.get(&1), Some(&7.0));
    }

    #[test]
    fn test_metrics() {
        let (records, sequence, _) = run(&[(1, 0, 2, 3), (2, 1, 1, 2)], 0.5);
        assert_eq!(sequence, vec![1, 2]);
        let second = &records[1];
        assert_eq!(second.start_time, Some(3));
        assert_eq!(second.finish_time, Some(5));
        assert_eq!(second.turnaround_time, 4);
        assert_eq!(second.waiting_time, 2);
        assert_eq!(second.response_time, Some(2 + 1));
    }

    #[test]
    fn test_preemption_by_shorter_prediction() {
        let mut seeds = HashMap::new();
        seeds.insert(2, 1.0);
        for stepping in [Stepping::Tick, Stepping::Event] {
            let (records, sequence, _) = run_with(&[(1, 0, 0, 6), (2, 2, 0, 3)], 0.5, &seeds, stepping);
            assert_eq!(sequence, vec![2, 1]);
            assert_eq!(records[0].start_time, Some(0));
            assert_eq!(records[1].start_time, Some(2));
            assert_eq!(records[1].finish_time, Some(5));
            assert_eq!(records[0].finish_time, Some(9));
        }
    }

    #[test]
    fn test_equal_predictions_do_not_preempt() {
        let (records, sequence, _) = run(&[(1, 0, 0, 6), (2, 2, 0, 3)], 0.5);
        assert_eq!(sequence, vec![1, 2]);
        assert_eq!(records[0].finish_time, Some(6));
    }

    #[test]
    fn test_later_occurrence_starts_from_learned_estimate() {
        let (records, _, predictions) = run(&[(1, 0, 0, 4), (1, 10, 0, 6)], 0.5);
        // First occurrence: 0.5 * 4 + 0.5 * 10 = 7, second: 0.5 * 6 + 0.5 * 7 = 6.5
        assert_eq!(records[0].predicted_burst, Some(7.0));
        assert_eq!(records[1].predicted_burst, Some(6.5));
        assert_eq!(predictions.get(&1), Some(&6.5));
    }

    #[test]
    fn test_learned_estimate_reorders_pending_occurrence() {
        // After 1 completes with a short burst, its second occurrence drops
        // below 2's untouched seed and jumps ahead of it.
        let (_, sequence, _) = run(&[(1, 0, 0, 1), (2, 0, 0, 2), (1, 1, 0, 2)], 1.0);
        assert_eq!(sequence, vec![1, 1, 2]);
        let (_, sequence, _) = run(&[(1, 0, 0, 1), (2, 0, 0, 2), (1, 1, 0, 2)], 0.0);
        assert_eq!(sequence, vec![1, 2, 1]);
    }

    #[test]
    fn test_tick_and_event_agree() {
        let rows = [
            (1, 0, 1, 7),
            (2, 1, 0, 2),
            (1, 3, 2, 3),
            (3, 4, 1, 12),
            (2, 9, 0, 1),
            (4, 30, 2, 5),
        ];
        let mut seeds = HashMap::new();
        seeds.insert(3, 2.3);
        for alpha in [0.0, 0.3, 0.5, 0.9, 1.0] {
            assert_eq!(
                run_with(&rows, alpha, &seeds, Stepping::Tick),
                run_with(&rows, alpha, &seeds, Stepping::Event),
                "alpha {}",
                alpha
            );
        }
    }
}

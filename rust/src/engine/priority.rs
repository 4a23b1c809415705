//! Static-priority, non-preemptive scheduling.

use crate::models::ProcessRecord;
use crate::ordering::{select_ready, SelectionRule};
use crate::{log_changes, log_checks, log_debug};

use super::{PolicyEngine, Stepping};

/// Static priority weight for a process id.
///
/// The weight shrinks as the id grows, and the heaviest ready process runs
/// first, so smaller ids are dispatched ahead of larger ones.
#[inline]
pub fn priority_for(id: u32) -> f64 {
    1.0 / id as f64
}

/// Dispatches the ready process with the highest priority weight and runs it
/// to completion.
pub struct PriorityEngine {
    stepping: Stepping,
    verbosity: u8,
}

impl PriorityEngine {
    pub fn new(stepping: Stepping, verbosity: u8) -> Self {
        Self {
            stepping,
            verbosity,
        }
    }
}

impl PolicyEngine for PriorityEngine {
    fn name(&self) -> &'static str {
        "Priority"
    }

    fn run(&mut self, records: &mut [ProcessRecord]) -> Vec<u32> {
        let verbosity = self.verbosity;
        for record in records.iter_mut() {
            record.priority = Some(priority_for(record.id));
        }

        let mut clock = 0;
        let mut sequence = Vec::with_capacity(records.len());

        while sequence.len() < records.len() {
            let Some(index) = select_ready(records, clock, SelectionRule::HighestPriority) else {
                log_checks!(verbosity, "Time {}: nothing ready", clock);
                clock = self.stepping.idle(records, clock);
                continue;
            };

            let record = &mut records[index];
            record.dispatch(clock);
            log_changes!(
                verbosity,
                "Time {}: dispatch {} (priority={:.4})",
                clock,
                record.id,
                record.priority.unwrap_or_default()
            );

            match self.stepping {
                Stepping::Tick => {
                    while record.remaining_time > 0 {
                        record.run_for(1);
                        clock += 1;
                        log_debug!(verbosity, "Time {}: {} ran one unit", clock, record.id);
                    }
                }
                Stepping::Event => {
                    let units = record.remaining_time;
                    record.run_for(units);
                    clock += units;
                }
            }

            record.complete(clock);
            record.response_time = Some(record.waiting_time + record.time_until_first_response);
            log_changes!(verbosity, "Time {}: complete {}", clock, record.id);

            sequence.push(record.id);
        }

        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessSpec;
    use crate::workload::prepare;

    fn run(rows: &[(u32, i64, i64, i64)], stepping: Stepping) -> (Vec<ProcessRecord>, Vec<u32>) {
        let specs: Vec<ProcessSpec> = rows
            .iter()
            .map(|&(id, arrival, tfr, burst)| ProcessSpec::new(id, arrival, tfr, burst))
            .collect();
        let mut records = prepare(&specs).unwrap();
        let sequence = PriorityEngine::new(stepping, 0).run(&mut records);
        (records, sequence)
    }

    #[test]
    fn test_priority_for() {
        assert!((priority_for(1) - 1.0).abs() < 1e-12);
        assert!((priority_for(4) - 0.25).abs() < 1e-12);
        assert!(priority_for(1) > priority_for(2));
    }

    #[test]
    fn test_simultaneous_arrivals() {
        // Bursts do not matter, only ids.
        let (records, sequence) = run(&[(3, 0, 0, 4), (1, 0, 0, 9), (2, 0, 0, 1)], Stepping::Tick);
        assert_eq!(sequence, vec![1, 2, 3]);
        assert!(records.iter().all(|r| r.priority == Some(priority_for(r.id))));
    }

    #[test]
    fn test_no_preemption() {
        let (records, sequence) = run(&[(1, 0, 0, 5), (4, 1, 0, 2)], Stepping::Event);
        assert_eq!(sequence, vec![1, 4]);
        assert_eq!(records[1].start_time, Some(5));
        assert_eq!(records[1].finish_time, Some(7));
    }

    #[test]
    fn test_response_has_no_arrival_offset() {
        let (records, _) = run(&[(2, 0, 0, 3), (1, 1, 2, 2)], Stepping::Tick);
        let late = records.iter().find(|r| r.id == 1).unwrap();
        assert_eq!(late.start_time, Some(3));
        assert_eq!(late.waiting_time, 2);
        assert_eq!(late.response_time, Some(2 + 2));
    }

    #[test]
    fn test_tick_and_event_agree() {
        let rows = [(1, 5, 1, 3), (2, 0, 0, 2), (3, 1, 1, 6), (4, 30, 0, 1), (2, 2, 2, 2)];
        assert_eq!(run(&rows, Stepping::Tick), run(&rows, Stepping::Event));
    }
}

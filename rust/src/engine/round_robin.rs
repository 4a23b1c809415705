//! Preemptive Round-Robin with a fixed quantum.

use crate::models::ProcessRecord;
use crate::{log_changes, log_checks, log_debug};

use super::{PolicyEngine, Stepping};

/// Ready set as an admission window over the arrival-ordered records plus a
/// cursor that cycles through it.
///
/// The window `records[..admitted]` only grows, so processes keep their
/// admission order. A process admitted during a slice lands ahead of the
/// cursor's wrap point and runs before the ones cycled past earlier.
#[derive(Debug, Default)]
struct ReadyRing {
    admitted: usize,
    cursor: usize,
}

impl ReadyRing {
    /// Grow the window over every record that has arrived by `clock`.
    fn admit(&mut self, records: &[ProcessRecord], clock: i64, verbosity: u8) {
        while let Some(record) = records.get(self.admitted) {
            if record.arrival_time > clock {
                break;
            }
            log_checks!(verbosity, "Time {}: admit {}", clock, record.id);
            self.admitted += 1;
        }
    }

    /// First unfinished record at or after the cursor, wrapping to the front
    /// of the window. Returns `None` if every admitted record is complete.
    fn next(&mut self, records: &[ProcessRecord]) -> Option<usize> {
        let window = self.admitted;
        let found = (0..window)
            .map(|offset| (self.cursor + offset) % window)
            .find(|&index| !records[index].completed)?;
        self.cursor = found;
        Some(found)
    }

    /// Move past the record that just ran.
    fn advance(&mut self) {
        self.cursor = if self.cursor + 1 >= self.admitted {
            0
        } else {
            self.cursor + 1
        };
    }
}

/// Fire the response latch if the process has just run exactly its
/// time-until-first-response.
fn latch_response(record: &mut ProcessRecord, clock: i64) {
    if record.first_response || record.elapsed() != record.time_until_first_response {
        return;
    }
    let wait_before_response =
        (clock - record.arrival_time) - record.time_until_first_response;
    record.response_time =
        Some(wait_before_response + record.time_until_first_response + record.arrival_time);
    record.first_response = true;
}

/// Round-Robin over a cyclic ready window.
///
/// Processes that arrive while a slice runs join the cycle in arrival order.
/// When every admitted process has finished, the clock moves on to the next
/// arrival instead of spinning on the finished ones.
pub struct RoundRobinEngine {
    quantum: i64,
    stepping: Stepping,
    verbosity: u8,
}

impl RoundRobinEngine {
    pub fn new(quantum: i64, stepping: Stepping, verbosity: u8) -> Self {
        debug_assert!(quantum > 0);
        Self {
            quantum,
            stepping,
            verbosity,
        }
    }

    /// Run one slice of `records[index]` starting at `clock`. Returns the
    /// clock at the end of the slice.
    fn run_slice(
        &self,
        records: &mut [ProcessRecord],
        index: usize,
        ready: &mut ReadyRing,
        mut clock: i64,
    ) -> i64 {
        let verbosity = self.verbosity;
        let slice = self.quantum.min(records[index].remaining_time);

        match self.stepping {
            Stepping::Tick => {
                for _ in 0..slice {
                    records[index].run_for(1);
                    clock += 1;
                    ready.admit(records, clock, verbosity);
                    latch_response(&mut records[index], clock);
                    log_debug!(
                        verbosity,
                        "Time {}: {} remaining={}",
                        clock,
                        records[index].id,
                        records[index].remaining_time
                    );
                }
            }
            Stepping::Event => {
                let record = &mut records[index];
                let until_response = record.time_until_first_response - record.elapsed();
                if !record.first_response && until_response > 0 && until_response <= slice {
                    record.run_for(until_response);
                    latch_response(record, clock + until_response);
                    if slice > until_response {
                        record.run_for(slice - until_response);
                    }
                } else {
                    record.run_for(slice);
                }

                clock += slice;
                ready.admit(records, clock, verbosity);
            }
        }

        clock
    }
}

impl PolicyEngine for RoundRobinEngine {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn run(&mut self, records: &mut [ProcessRecord]) -> Vec<u32> {
        let verbosity = self.verbosity;
        let mut clock = 0;
        let mut ready = ReadyRing::default();
        let mut sequence = Vec::with_capacity(records.len());

        while sequence.len() < records.len() {
            ready.admit(records, clock, verbosity);

            let Some(index) = ready.next(records) else {
                log_checks!(verbosity, "Time {}: nothing ready", clock);
                clock = self.stepping.idle(records, clock);
                continue;
            };

            let record = &mut records[index];
            if record.dispatch(clock) {
                log_changes!(verbosity, "Time {}: first dispatch {}", clock, record.id);
            } else {
                log_changes!(verbosity, "Time {}: dispatch {}", clock, record.id);
            }
            latch_response(record, clock);

            clock = self.run_slice(records, index, &mut ready, clock);

            let record = &mut records[index];
            if record.remaining_time == 0 {
                record.complete(clock);
                if !record.first_response {
                    // First output would come after exit; count the exit itself.
                    record.response_time = Some(clock);
                }
                log_changes!(verbosity, "Time {}: complete {}", clock, record.id);
                sequence.push(record.id);
            } else {
                log_changes!(
                    verbosity,
                    "Time {}: preempt {} (remaining={})",
                    clock,
                    record.id,
                    record.remaining_time
                );
            }
            ready.advance();
        }

        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessSpec;
    use crate::workload::prepare;

    fn run(
        rows: &[(u32, i64, i64, i64)],
        quantum: i64,
        stepping: Stepping,
    ) -> (Vec<ProcessRecord>, Vec<u32>) {
        let specs: Vec<ProcessSpec> = rows
            .iter()
            .map(|&(id, arrival, tfr, burst)| ProcessSpec::new(id, arrival, tfr, burst))
            .collect();
        let mut records = prepare(&specs).unwrap();
        let sequence = RoundRobinEngine::new(quantum, stepping, 0).run(&mut records);
        (records, sequence)
    }

    fn get(records: &[ProcessRecord], id: u32) -> &ProcessRecord {
        records.iter().find(|r| r.id == id).unwrap()
    }

    #[test]
    fn test_alternating_slices() {
        for stepping in [Stepping::Tick, Stepping::Event] {
            let (records, sequence) = run(&[(1, 0, 0, 5), (2, 0, 0, 3)], 2, stepping);
            assert_eq!(sequence, vec![2, 1]);
            assert_eq!(get(&records, 2).finish_time, Some(7));
            assert_eq!(get(&records, 1).finish_time, Some(8));
            assert_eq!(get(&records, 1).start_time, Some(0));
            assert_eq!(get(&records, 2).start_time, Some(2));
        }
    }

    #[test]
    fn test_arrival_during_slice_runs_next() {
        let (records, sequence) = run(&[(1, 0, 0, 6), (2, 1, 0, 2)], 3, Stepping::Tick);
        assert_eq!(sequence, vec![2, 1]);
        assert_eq!(get(&records, 2).start_time, Some(3));
        assert_eq!(get(&records, 2).finish_time, Some(5));
        assert_eq!(get(&records, 1).finish_time, Some(8));
    }

    #[test]
    fn test_arrival_joins_cycle_in_admission_order() {
        for stepping in [Stepping::Tick, Stepping::Event] {
            // 3 arrives while 2 runs and is dispatched before 1 comes round again.
            let (records, sequence) = run(&[(1, 0, 0, 6), (2, 0, 0, 6), (3, 3, 0, 2)], 2, stepping);
            assert_eq!(sequence, vec![3, 1, 2]);
            assert_eq!(get(&records, 3).start_time, Some(4));
            assert_eq!(get(&records, 3).finish_time, Some(6));
            assert_eq!(get(&records, 3).waiting_time, 1);
            assert_eq!(get(&records, 1).finish_time, Some(12));
            assert_eq!(get(&records, 2).finish_time, Some(14));
        }
    }

    #[test]
    fn test_arrival_at_slice_boundary() {
        let (records, _) = run(&[(1, 0, 0, 4), (2, 2, 0, 2)], 2, Stepping::Event);
        assert_eq!(get(&records, 2).start_time, Some(2));
        assert_eq!(get(&records, 2).finish_time, Some(4));
        assert_eq!(get(&records, 1).finish_time, Some(6));
    }

    #[test]
    fn test_idle_gap_after_every_admitted_process_finishes() {
        for stepping in [Stepping::Tick, Stepping::Event] {
            let (records, sequence) = run(&[(1, 0, 0, 1), (2, 5, 0, 2)], 4, stepping);
            assert_eq!(sequence, vec![1, 2]);
            assert_eq!(get(&records, 2).start_time, Some(5));
            assert_eq!(get(&records, 2).finish_time, Some(7));
            assert_eq!(get(&records, 2).waiting_time, 0);
        }
    }

    #[test]
    fn test_response_latch_mid_slice() {
        for stepping in [Stepping::Tick, Stepping::Event] {
            let (records, _) = run(&[(1, 0, 3, 5), (2, 0, 1, 3)], 2, stepping);
            // 1 runs 0-2, 2 runs 2-4, 1 reaches three units at t=5.
            assert_eq!(get(&records, 1).response_time, Some(5));
            assert_eq!(get(&records, 2).response_time, Some(3));
            assert!(records.iter().all(|r| r.first_response));
        }
    }

    #[test]
    fn test_response_latch_edges() {
        for stepping in [Stepping::Tick, Stepping::Event] {
            // Offset 0 latches at dispatch; an offset beyond the burst falls
            // back to the completion time.
            let (records, _) = run(&[(1, 0, 0, 3), (2, 1, 9, 2)], 2, stepping);
            assert_eq!(get(&records, 1).response_time, Some(0));
            assert_eq!(get(&records, 2).response_time, get(&records, 2).finish_time);
            assert!(!get(&records, 2).first_response);
        }
    }

    #[test]
    fn test_quantum_larger_than_bursts_is_fcfs() {
        let (records, sequence) = run(&[(2, 0, 0, 3), (1, 1, 0, 2), (3, 1, 0, 1)], 10, Stepping::Event);
        assert_eq!(sequence, vec![2, 1, 3]);
        assert_eq!(get(&records, 3).finish_time, Some(6));
    }

    #[test]
    fn test_tick_and_event_agree() {
        let rows = [
            (1, 0, 4, 7),
            (2, 1, 1, 3),
            (3, 1, 0, 9),
            (4, 6, 2, 2),
            (2, 7, 5, 4),
            (5, 40, 3, 5),
        ];
        for quantum in 1..6 {
            assert_eq!(
                run(&rows, quantum, Stepping::Tick),
                run(&rows, quantum, Stepping::Event),
                "quantum {}",
                quantum
            );
        }
    }
}

//! First-Come-First-Served.

use crate::log_changes;
use crate::models::ProcessRecord;

use super::PolicyEngine;

/// Non-preemptive, strict arrival order.
///
/// The ordering pass already fixed the dispatch order, so the clock only
/// ever jumps forward over idle gaps and by whole bursts.
pub struct FcfsEngine {
    verbosity: u8,
}

impl FcfsEngine {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }
}

impl PolicyEngine for FcfsEngine {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn run(&mut self, records: &mut [ProcessRecord]) -> Vec<u32> {
        let verbosity = self.verbosity;
        let mut clock = 0;
        let mut sequence = Vec::with_capacity(records.len());

        for record in records.iter_mut() {
            if clock < record.arrival_time {
                log_changes!(verbosity, "Time {}: idle until {}", clock, record.arrival_time);
                clock = record.arrival_time;
            }

            record.dispatch(clock);
            log_changes!(verbosity, "Time {}: dispatch {}", clock, record.id);
            record.run_for(record.burst_time);
            clock += record.burst_time;
            record.complete(clock);
            record.response_time = Some(
                record.waiting_time + record.time_until_first_response + record.arrival_time,
            );
            log_changes!(verbosity, "Time {}: complete {}", clock, record.id);

            sequence.push(record.id);
        }

        sequence
    }
}

//! Shortest Process Next (non-preemptive shortest job first).

use crate::models::ProcessRecord;
use crate::ordering::{select_ready, SelectionRule};
use crate::{log_changes, log_checks};

use super::{PolicyEngine, Stepping};

/// At each decision point, dispatch the ready process with the smallest
/// burst and run it to completion.
pub struct SpnEngine {
    stepping: Stepping,
    verbosity: u8,
}

impl SpnEngine {
    pub fn new(stepping: Stepping, verbosity: u8) -> Self {
        Self {
            stepping,
            verbosity,
        }
    }
}

impl PolicyEngine for SpnEngine {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn run(&mut self, records: &mut [ProcessRecord]) -> Vec<u32> {
        let verbosity = self.verbosity;
        let mut clock = 0;
        let mut sequence = Vec::with_capacity(records.len());

        while sequence.len() < records.len() {
            let Some(index) = select_ready(records, clock, SelectionRule::ShortestBurst) else {
                log_checks!(verbosity, "Time {}: nothing ready", clock);
                clock = self.stepping.idle(records, clock);
                continue;
            };

            let record = &mut records[index];
            record.dispatch(clock);
            log_changes!(
                verbosity,
                "Time {}: dispatch {} (burst={})",
                clock,
                record.id,
                record.burst_time
            );

            record.run_for(record.burst_time);
            clock += record.burst_time;
            record.complete(clock);
            record.response_time = Some(
                record.arrival_time + record.waiting_time + record.time_until_first_response,
            );
            log_changes!(verbosity, "Time {}: complete {}", clock, record.id);

            sequence.push(record.id);
        }

        sequence
    }
}

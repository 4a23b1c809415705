//! Plain-text rendering of a simulation result.

use crate::models::{Averages, SimulationResult, TimingRow};

const RULE: &str =
    "+----+---------+-------+-------+--------+---------+----------------+---------------+";
const HEADER: &str =
    "| Id | Arrival | Burst | Start | Finish |    Wait |   Turnaround   | Response Time |";

/// Completion order as `seq = [2,1,3]`.
pub fn render_sequence(sequence: &[u32]) -> String {
    let ids: Vec<String> = sequence.iter().map(u32::to_string).collect();
    format!("seq = [{}]", ids.join(","))
}

/// Bordered table with one line per canonical row.
pub fn render_table(rows: &[TimingRow]) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "| {:<2} | {:<7} | {:<5} | {:<5} | {:<6} | {:<7} | {:<14} | {:<13} |\n",
            row.id,
            row.arrival,
            row.burst,
            row.start,
            row.finish,
            row.wait,
            row.turnaround,
            row.response
        ));
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

pub fn render_averages(averages: &Averages) -> String {
    format!(
        "Average Waiting Time: {:.2} ms\nAverage Turnaround Time: {:.2} ms\nAverage Response Time: {:.2} ms\n",
        averages.waiting_time, averages.turnaround_time, averages.response_time
    )
}

/// Sequence, table and averages, in that order.
pub fn render_report(result: &SimulationResult) -> String {
    format!(
        "{}\n{}\n{}",
        render_sequence(&result.sequence),
        render_table(&result.rows),
        render_averages(&result.averages)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(id: u32) -> TimingRow {
        TimingRow {
            id,
            arrival: 0,
            burst: 5,
            start: 3,
            finish: 8,
            wait: 3,
            turnaround: 8,
            response: 3,
        }
    }

    #[test]
    fn test_render_sequence() {
        assert_eq!(render_sequence(&[2, 1, 3]), "seq = [2,1,3]");
        assert_eq!(render_sequence(&[]), "seq = []");
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[make_row(1), make_row(12)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], HEADER);
        assert_eq!(
            lines[3],
            "| 1  | 0       | 5     | 3     | 8      | 3       | 8              | 3             |"
        );
        assert!(lines[4].starts_with("| 12 |"));
        assert!(lines.iter().all(|line| line.len() == RULE.len()));
    }

    #[test]
    fn test_render_averages() {
        let text = render_averages(&Averages {
            waiting_time: 10.0 / 3.0,
            turnaround_time: 9.0,
            response_time: -0.5,
        });
        assert_eq!(
            text,
            "Average Waiting Time: 3.33 ms\nAverage Turnaround Time: 9.00 ms\nAverage Response Time: -0.50 ms\n"
        );
    }

    #[test]
    fn test_render_report_sections() {
        let result = SimulationResult {
            sequence: vec![1],
            rows: vec![make_row(1)],
            ..SimulationResult::default()
        };
        let report = render_report(&result);
        assert!(report.starts_with("seq = [1]\n+----"));
        assert!(report.contains("\nAverage Waiting Time: 0.00 ms"));
    }
}

//! Command-line front end: read a workload, run one policy, print the report.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cpusched::report::render_report;
use cpusched::{parse_workload, simulate, Policy, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "cpusched")]
#[command(about = "Simulate CPU scheduling policies over a batch workload", long_about = None)]
struct Args {
    /// Policy: FCFS, SJF (or SPN), Priority, RR, SRT
    policy: String,

    /// Quantum for RR, alpha for SRT
    param: Option<String>,

    /// Workload file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Step the clock one tick at a time instead of jumping between events
    #[arg(long, default_value_t = false)]
    tick: bool,

    /// Trace scheduling decisions on stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_input(path: Option<&PathBuf>) -> Result<String, String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            Ok(text)
        }
    }
}

fn build_config(policy: Policy, args: &Args) -> Result<SimulationConfig, String> {
    let mut config = SimulationConfig {
        event_driven: !args.tick,
        verbosity: args.verbose,
        ..SimulationConfig::default()
    };

    let Some(param) = args.param.as_deref() else {
        return Ok(config);
    };
    match policy {
        Policy::RoundRobin => {
            let quantum = param
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid quantum '{}'", param))?;
            config.quantum = Some(quantum);
        }
        Policy::Srt => {
            let alpha = param
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid alpha '{}'", param))?;
            config.alpha = Some(alpha);
        }
        _ => {}
    }
    Ok(config)
}

fn run(args: &Args) -> Result<String, String> {
    let policy: Policy = args.policy.parse().map_err(|e| format!("{}", e))?;
    let config = build_config(policy, args)?;
    let text = read_input(args.input.as_ref())?;
    let specs = parse_workload(&text).map_err(|e| e.to_string())?;
    let result = simulate(policy, &specs, &config).map_err(|e| e.to_string())?;
    Ok(render_report(&result))
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

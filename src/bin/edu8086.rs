use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use edu8086::{Engine, SegmentInit, StepOutcome};

/// Assembles and runs an 8086-class real-mode program, printing its
/// architectural state as JSON.
#[derive(Parser)]
#[command(name = "edu8086", version, about)]
struct Cli {
    /// Path to the assembly source file.
    path: String,

    /// Initial code segment value.
    #[arg(long)]
    cs: Option<u16>,

    /// Initial data segment value.
    #[arg(long)]
    ds: Option<u16>,

    /// Initial stack segment value.
    #[arg(long)]
    ss: Option<u16>,

    /// Initial extra segment value.
    #[arg(long)]
    es: Option<u16>,

    /// Emit a bus-level trace in addition to the snapshot.
    #[arg(long)]
    trace: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Run to completion or until the instruction cap is hit (default).
    Run,
    /// Execute exactly one instruction and report its outcome.
    Step,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read {}: {}", cli.path, err);
            return ExitCode::FAILURE;
        }
    };

    let mut engine = Engine::new(1 << 20);
    engine.set_trace_enabled(cli.trace);

    let segments = SegmentInit {
        cs: cli.cs,
        ds: cli.ds,
        ss: cli.ss,
        es: cli.es,
    };

    if let Err(err) = engine.load(&source, segments) {
        eprintln!("error: {}", err);
        return ExitCode::FAILURE;
    }

    match cli.mode.unwrap_or(Mode::Run) {
        Mode::Run => engine.run(),
        Mode::Step => match engine.step() {
            StepOutcome::Ok => println!("OK"),
            StepOutcome::End => println!("END"),
            StepOutcome::Err(message) => println!("ERR: {}", message),
        },
    }

    let snapshot = engine.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("error: could not serialize snapshot: {}", err);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

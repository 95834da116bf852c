//! Replacement policy trace replay CLI.
//!
//! This binary drives the hybrid LFU policy from a recorded controller trace:
//! 1. **Replay:** Load an optional JSON configuration, parse the trace, and replay it.
//! 2. **Report:** Print each miss's victim and the policy statistics, or emit JSON.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lfurp_core::ReplacementConfig;
use lfurp_core::common::Result;
use lfurp_core::trace::{self, ReplayReport};

#[derive(Parser, Debug)]
#[command(
    name = "lfurp",
    author,
    version,
    about = "Hybrid recency/frequency replacement policy replayer",
    long_about = "Replay a cache controller event trace against the hybrid LFU replacement policy.\n\nTrace lines: fill <set> <way> | hit <set> <way> <r|w> | inv <set> <way> | miss <set> | tick <n>\n\nExamples:\n  lfurp replay traces/l1d.trace\n  lfurp replay traces/l1d.trace --config l1d.json --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace file and report victims and statistics.
    Replay {
        /// Trace file to replay.
        trace: PathBuf,

        /// JSON configuration (sets, ways, start_tick, tick_per_event).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit the report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Replay {
            trace,
            config,
            json,
        } => cmd_replay(&trace, config.as_deref(), json),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Replays `trace_path` under the given (or default) configuration and prints the report.
fn cmd_replay(trace_path: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = match config {
        Some(path) => ReplacementConfig::from_path(path)?,
        None => ReplacementConfig::default(),
    };
    let events = trace::parse_file(trace_path)?;
    info!(trace = %trace_path.display(), events = events.len(), "replaying trace");
    let report = trace::replay_lfu(&config, &events)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&config, &report);
    }
    Ok(())
}

/// Prints the miss log and statistics in human-readable form.
fn print_report(config: &ReplacementConfig, report: &ReplayReport) {
    println!(
        "Configuration: {} sets x {} ways, start tick {}, {} tick(s) per event",
        config.sets, config.ways, config.start_tick, config.tick_per_event
    );
    println!();
    for miss in &report.misses {
        let how = match miss.reason {
            None => "fill invalid way".to_string(),
            Some(reason) if miss.tied => format!("evict, {reason:?}, tied"),
            Some(reason) => format!("evict, {reason:?}"),
        };
        println!(
            "[line {:>5}] miss set {:>4} -> way {:>2} ({how})",
            miss.line, miss.set, miss.way
        );
    }
    println!();
    report.stats.print();
    println!("final tick               {}", report.final_tick);
}

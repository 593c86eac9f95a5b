//! Offline scenario runner for the EscortGroup behavior.
//!
//! Loads a RON scenario, builds the simulated world it describes and ticks
//! the behavior until it finishes or the tick budget runs out.
//! Run with: `cargo run -p escort-sim -- <scenario.ron>`

mod logging;
mod runner;
mod scenario;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use quest_behaviors::Outcome;

use scenario::Scenario;

/// Runs an escort scenario against the in-memory world
#[derive(Parser)]
#[command(name = "escort-sim")]
#[command(about = "Offline runner for EscortGroup scenarios", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (RON)
    scenario: PathBuf,

    /// Override the scenario's tick budget
    #[arg(long)]
    ticks: Option<usize>,

    /// Override the scenario's tick length in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for gossip pacing
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut scenario = Scenario::load(&cli.scenario)?;
    if let Some(ticks) = cli.ticks {
        scenario.ticks = ticks;
    }
    if let Some(tick_ms) = cli.tick_ms {
        scenario.tick_ms = tick_ms;
    }

    let report = runner::run(&scenario, cli.seed)?;

    println!("Ticks:     {} ({:.1}s simulated)", report.ticks, report.elapsed.as_secs_f32());
    println!("Agent at:  {}", report.agent_location);
    let escorted: Vec<String> = report.escorted.iter().map(ToString::to_string).collect();
    println!("Escorted:  [{}]", escorted.join(", "));
    println!("States:");
    for (tick, state) in &report.transitions {
        println!("  {tick:>5}  {state}");
    }
    println!("{}", report.goal);
    if let Some(reason) = &report.stop_reason {
        println!("Stopped:   {reason}");
    }

    match report.outcome {
        Some(Outcome::Done(reason)) => {
            println!("Outcome:   {reason}");
            Ok(())
        }
        Some(Outcome::Fatal(err)) => bail!("escort stopped: {err}"),
        None => bail!("escort did not finish within {} ticks", report.ticks),
    }
}
